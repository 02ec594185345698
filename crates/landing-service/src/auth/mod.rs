//! Access token authorization.
//!
//! Fetches and caches the trust domain's signing keys, verifies presented
//! bearer tokens against them, validates the standard claims, and produces
//! the [`SecurityContext`] that is threaded to request handlers.

pub mod claims;
pub mod context;
pub mod domain;
pub mod jwks;
pub mod validator;

pub use context::{Authorization, Principal, SecurityContext};
pub use domain::TrustDomain;
pub use jwks::JwksClient;
pub use validator::{AccessTokenValidator, Authorizer};

use thiserror::Error;

/// Authorization failures.
///
/// Messages are intentionally generic; the detailed cause is logged
/// server-side and never returned to clients.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The signing key set could not be fetched or parsed.
    #[error("the signing key set is unavailable")]
    KeySetUnavailable,

    /// Any structural, signature or claim failure. Deliberately
    /// coarse-grained so rejection reasons cannot be probed.
    #[error("the access token is invalid or expired")]
    InvalidToken,
}
