//! Trust domain for the identity provider.
//!
//! The trust domain is the base URL of the identity provider. It is the
//! single source for both the JWKS discovery URL and the expected issuer
//! claim, so the two can never drift apart.

/// Base URL of the identity provider that tokens are trusted from.
///
/// Created once at startup from configuration and never mutated. Any
/// trailing slash on the configured value is stripped on construction so
/// that derived URLs are well-formed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustDomain(String);

impl TrustDomain {
    /// Create a new trust domain from the configured base URL.
    pub fn new<S>(domain: S) -> Self
    where
        S: Into<String>,
    {
        let domain = domain.into();
        Self(domain.trim_end_matches('/').to_string())
    }

    /// The JWKS discovery URL for this trust domain.
    pub fn jwks_url(&self) -> String {
        format!("{}/.well-known/jwks.json", self.0)
    }

    /// The issuer URL that tokens from this trust domain must carry.
    ///
    /// Issuer comparison is exact; no normalization happens beyond the
    /// trailing slash encoded here.
    pub fn issuer(&self) -> String {
        format!("{}/", self.0)
    }
}
