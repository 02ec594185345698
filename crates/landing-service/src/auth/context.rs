//! Authenticated identity attached to a request.
//!
//! A `SecurityContext` is produced only by a successful token validation
//! and lives for the single request it was produced for. Handlers read it
//! through the `Authorization` sum type stored in request extensions; they
//! never write it.

use chrono::{DateTime, Utc};
use std::fmt;

/// Opaque identity handle taken from the token's subject claim.
///
/// Not parsed or interpreted further by this service.
#[derive(Clone, PartialEq, Eq)]
pub struct Principal(String);

impl Principal {
    pub fn new<S>(subject: S) -> Self
    where
        S: Into<String>,
    {
        Self(subject.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Redacted in Debug output so identities do not leak into logs.
impl fmt::Debug for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Principal([REDACTED])")
    }
}

/// The validated identity and validity window derived from a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityContext {
    /// The authorized principal.
    pub principal: Principal,

    /// When the token was issued (UTC, second precision).
    pub issued_at: DateTime<Utc>,

    /// When the token expires (UTC, second precision).
    pub expires_at: DateTime<Utc>,
}

/// Authorization state of a request, assigned once by the gate.
///
/// Requests that present no credential at all are `Anonymous`; requests
/// that presented a credential which validated are `Authenticated`.
/// Requests with a credential that failed validation never reach a handler.
#[derive(Debug, Clone)]
pub enum Authorization {
    /// No credential was presented.
    Anonymous,

    /// A credential was presented and validated.
    Authenticated(SecurityContext),
}

impl Authorization {
    /// The security context, if the request is authenticated.
    pub fn security_context(&self) -> Option<&SecurityContext> {
        match self {
            Authorization::Anonymous => None,
            Authorization::Authenticated(sc) => Some(sc),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn security_context() -> SecurityContext {
        SecurityContext {
            principal: Principal::new("auth0|abc123"),
            issued_at: Utc.timestamp_opt(1_234_567_800, 0).unwrap(),
            expires_at: Utc.timestamp_opt(1_234_567_890, 0).unwrap(),
        }
    }

    #[test]
    fn test_anonymous_has_no_security_context() {
        assert!(Authorization::Anonymous.security_context().is_none());
    }

    #[test]
    fn test_authenticated_exposes_security_context() {
        let sc = security_context();
        let authorization = Authorization::Authenticated(sc.clone());

        assert_eq!(authorization.security_context(), Some(&sc));
    }

    #[test]
    fn test_security_context_equality() {
        assert_eq!(security_context(), security_context());
    }

    #[test]
    fn test_principal_debug_is_redacted() {
        let sc = security_context();
        let debug_str = format!("{:?}", sc);

        assert!(!debug_str.contains("abc123"));
        assert!(debug_str.contains("[REDACTED]"));
    }
}
