//! Landing service library.
//!
//! A small HTTP service exposing a hypermedia (HAL) home document and
//! accepting bearer-token authenticated requests. Tokens are validated
//! against the trust domain's published JWKS; the service never issues or
//! stores tokens itself.
//!
//! # Request flow
//!
//! ```text
//! inbound request
//!   -> middleware::auth (authentication gate)
//!        -> auth::validator (signature + claim checks)
//!             -> auth::jwks (key set fetch/cache)
//!   -> handlers (read the attached Authorization)
//! ```
//!
//! # Modules
//!
//! - `auth` - trust domain, key set client, token validator, security context
//! - `config` - service configuration from environment
//! - `errors` - API error responses
//! - `hal` - HAL document shaping
//! - `handlers` - HTTP request handlers
//! - `middleware` - the authentication gate
//! - `routes` - Axum router setup

pub mod auth;
pub mod config;
pub mod errors;
pub mod hal;
pub mod handlers;
pub mod middleware;
pub mod routes;
