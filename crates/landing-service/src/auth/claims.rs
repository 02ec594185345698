//! Decoded access token claims.
//!
//! These are the unvalidated fields of a presented token, produced by
//! signature verification and consumed by the claim checks. They live only
//! for the duration of a single validation call. The `sub` field is
//! redacted in Debug output to keep identities out of logs.

use serde::Deserialize;
use std::fmt;

/// The `aud` claim, which may be a single value or a list.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    Single(String),
    Multiple(Vec<String>),
}

impl Audience {
    /// Whether the audience contains the given value.
    pub fn contains(&self, audience: &str) -> bool {
        match self {
            Audience::Single(value) => value == audience,
            Audience::Multiple(values) => values.iter().any(|v| v == audience),
        }
    }
}

/// Claims decoded from a presented access token.
///
/// All fields are required; a token missing any of them fails decoding and
/// is rejected as invalid.
#[derive(Clone, Deserialize)]
pub struct Claims {
    /// Subject - the opaque identity the token was issued to.
    pub sub: String,

    /// Issuer URL the token claims to come from.
    pub iss: String,

    /// Audience(s) the token was issued for.
    pub aud: Audience,

    /// Issued-at timestamp (Unix epoch seconds).
    pub iat: i64,

    /// Expiration timestamp (Unix epoch seconds).
    pub exp: i64,
}

/// Custom Debug implementation that redacts the `sub` field.
impl fmt::Debug for Claims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Claims")
            .field("sub", &"[REDACTED]")
            .field("iss", &self.iss)
            .field("aud", &self.aud)
            .field("iat", &self.iat)
            .field("exp", &self.exp)
            .finish()
    }
}
