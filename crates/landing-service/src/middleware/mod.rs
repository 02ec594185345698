//! Request-pipeline middleware.

pub mod auth;

pub use auth::{authenticate, AuthState};
