//! HTTP request handlers.

pub mod health;
pub mod home;
pub mod whoami;

pub use health::health_check;
pub use home::home;
pub use whoami::whoami;
