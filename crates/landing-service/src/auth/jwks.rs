//! JWKS client for fetching and caching public keys from the trust domain.
//!
//! Keys are fetched from the `/.well-known/jwks.json` discovery endpoint and
//! cached with a configurable TTL so that key rotations are picked up
//! without hammering the identity provider on every request.
//!
//! A fetched key set is handed out as an immutable snapshot (`Arc<KeySet>`).
//! A successful refresh replaces the cached snapshot wholesale; concurrent
//! refreshes are allowed to race with last-writer-wins semantics.

use super::domain::TrustDomain;
use crate::auth::AuthError;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::instrument;

/// Default cache TTL in seconds (5 minutes).
pub const DEFAULT_CACHE_TTL_SECONDS: u64 = 300;

/// Request timeout for the JWKS fetch.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// JSON Web Key from the JWKS endpoint.
///
/// Carries the fields needed to verify signatures with either an Ed25519
/// (`kty = "OKP"`) or RSA (`kty = "RSA"`) public key.
#[derive(Debug, Clone, Deserialize)]
pub struct Jwk {
    /// Key type ("OKP" or "RSA").
    pub kty: String,

    /// Key ID - used to select the correct key for verification.
    pub kid: String,

    /// Algorithm the key is used with (e.g. "EdDSA", "RS256").
    #[serde(default)]
    pub alg: Option<String>,

    /// Curve name for OKP keys (always "Ed25519" here).
    #[serde(default)]
    pub crv: Option<String>,

    /// Public key value for OKP keys (base64url encoded).
    #[serde(default)]
    pub x: Option<String>,

    /// RSA modulus (base64url encoded).
    #[serde(default)]
    pub n: Option<String>,

    /// RSA public exponent (base64url encoded).
    #[serde(default)]
    pub e: Option<String>,

    /// Key use (should be "sig" for signing keys).
    #[serde(default, rename = "use")]
    pub key_use: Option<String>,
}

/// JWKS document as published by the trust domain.
#[derive(Debug, Clone, Deserialize)]
struct JwksResponse {
    keys: Vec<Jwk>,
}

/// An immutable set of verification keys, indexed by key ID.
///
/// Never mutated after construction; callers receive it behind an `Arc` and
/// a refresh swaps the whole set rather than patching it.
#[derive(Debug, Default)]
pub struct KeySet {
    keys: HashMap<String, Jwk>,
}

impl KeySet {
    /// Look up a key by its ID.
    pub fn find(&self, kid: &str) -> Option<&Jwk> {
        self.keys.get(kid)
    }

    /// Number of keys in the set.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the set contains no keys.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl From<Vec<Jwk>> for KeySet {
    fn from(keys: Vec<Jwk>) -> Self {
        let keys = keys.into_iter().map(|key| (key.kid.clone(), key)).collect();
        Self { keys }
    }
}

/// Cached key set snapshot with its expiry time.
struct CachedKeySet {
    keys: Arc<KeySet>,
    expires_at: Instant,
}

/// Client that fetches and caches the trust domain's key set.
///
/// Safe for concurrent use: reads take a shared lock on the cache, and a
/// completed fetch atomically replaces the cached snapshot.
pub struct JwksClient {
    /// URL of the JWKS discovery endpoint.
    jwks_url: String,

    /// HTTP client for fetching the key set.
    http_client: reqwest::Client,

    /// Cached key set snapshot.
    cache: RwLock<Option<CachedKeySet>>,

    /// How long a fetched key set is reused before refreshing.
    cache_ttl: Duration,
}

impl JwksClient {
    /// Create a new JWKS client for a trust domain with the default TTL.
    pub fn new(domain: &TrustDomain) -> Self {
        Self::with_ttl(domain, Duration::from_secs(DEFAULT_CACHE_TTL_SECONDS))
    }

    /// Create a new JWKS client with a custom cache TTL.
    pub fn with_ttl(domain: &TrustDomain, cache_ttl: Duration) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(target: "landing.auth.jwks", error = %e, "Failed to build HTTP client with custom config, using defaults");
                reqwest::Client::new()
            });

        Self {
            jwks_url: domain.jwks_url(),
            http_client,
            cache: RwLock::new(None),
            cache_ttl,
        }
    }

    /// Get the current key set, fetching it from the trust domain if the
    /// cache is empty or expired.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::KeySetUnavailable` if the key set cannot be
    /// fetched or parsed. A previously cached set is left untouched on
    /// failure, but is not served automatically in its place.
    #[instrument(skip(self))]
    pub async fn fetch_keys(&self) -> Result<Arc<KeySet>, AuthError> {
        {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if cached.expires_at > Instant::now() {
                    tracing::debug!(target: "landing.auth.jwks", "Key set cache hit");
                    return Ok(cached.keys.clone());
                }
            }
        }

        self.refresh().await
    }

    /// Fetch the key set from the trust domain and replace the cache.
    #[instrument(skip(self))]
    async fn refresh(&self) -> Result<Arc<KeySet>, AuthError> {
        tracing::debug!(target: "landing.auth.jwks", url = %self.jwks_url, "Fetching JWKS from trust domain");

        // Per-request timeout, so the bound holds even if the client was
        // built without one
        let response = self
            .http_client
            .get(&self.jwks_url)
            .timeout(FETCH_TIMEOUT)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(target: "landing.auth.jwks", error = %e, "Failed to fetch JWKS");
                AuthError::KeySetUnavailable
            })?;

        if !response.status().is_success() {
            tracing::error!(
                target: "landing.auth.jwks",
                status = %response.status(),
                "JWKS endpoint returned error"
            );
            return Err(AuthError::KeySetUnavailable);
        }

        let jwks: JwksResponse = response.json().await.map_err(|e| {
            tracing::error!(target: "landing.auth.jwks", error = %e, "Failed to parse JWKS response");
            AuthError::KeySetUnavailable
        })?;

        let keys = Arc::new(KeySet::from(jwks.keys));

        tracing::info!(
            target: "landing.auth.jwks",
            key_count = keys.len(),
            "Key set cache refreshed"
        );

        // Wholesale replace; the last completed fetch wins
        let mut cache = self.cache.write().await;
        *cache = Some(CachedKeySet {
            keys: keys.clone(),
            expires_at: Instant::now() + self.cache_ttl,
        });

        Ok(keys)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_jwk_deserialization_okp() {
        let json = r#"{
            "kty": "OKP",
            "kid": "test-key-01",
            "crv": "Ed25519",
            "x": "dGVzdC1wdWJsaWMta2V5LWRhdGE",
            "alg": "EdDSA",
            "use": "sig"
        }"#;

        let jwk: Jwk = serde_json::from_str(json).unwrap();

        assert_eq!(jwk.kty, "OKP");
        assert_eq!(jwk.kid, "test-key-01");
        assert_eq!(jwk.crv, Some("Ed25519".to_string()));
        assert_eq!(jwk.x, Some("dGVzdC1wdWJsaWMta2V5LWRhdGE".to_string()));
        assert_eq!(jwk.alg, Some("EdDSA".to_string()));
        assert_eq!(jwk.key_use, Some("sig".to_string()));
        assert!(jwk.n.is_none());
        assert!(jwk.e.is_none());
    }

    #[test]
    fn test_jwk_deserialization_rsa() {
        let json = r#"{
            "kty": "RSA",
            "kid": "rsa-key-01",
            "alg": "RS256",
            "n": "0vx7agoebGcQSuuPiLJXZpt",
            "e": "AQAB"
        }"#;

        let jwk: Jwk = serde_json::from_str(json).unwrap();

        assert_eq!(jwk.kty, "RSA");
        assert_eq!(jwk.n, Some("0vx7agoebGcQSuuPiLJXZpt".to_string()));
        assert_eq!(jwk.e, Some("AQAB".to_string()));
        assert!(jwk.x.is_none());
    }

    #[test]
    fn test_jwk_deserialization_minimal() {
        let json = r#"{
            "kty": "OKP",
            "kid": "test-key-02"
        }"#;

        let jwk: Jwk = serde_json::from_str(json).unwrap();

        assert_eq!(jwk.kty, "OKP");
        assert_eq!(jwk.kid, "test-key-02");
        assert!(jwk.crv.is_none());
        assert!(jwk.x.is_none());
        assert!(jwk.alg.is_none());
        assert!(jwk.key_use.is_none());
    }

    #[test]
    fn test_key_set_find() {
        let keys: Vec<Jwk> = serde_json::from_str(
            r#"[
                {"kty": "OKP", "kid": "key-1"},
                {"kty": "OKP", "kid": "key-2"}
            ]"#,
        )
        .unwrap();
        let key_set = KeySet::from(keys);

        assert_eq!(key_set.len(), 2);
        assert!(!key_set.is_empty());
        assert_eq!(key_set.find("key-1").unwrap().kid, "key-1");
        assert_eq!(key_set.find("key-2").unwrap().kid, "key-2");
        assert!(key_set.find("key-3").is_none());
    }

    #[test]
    fn test_empty_key_set() {
        let key_set = KeySet::default();
        assert!(key_set.is_empty());
        assert!(key_set.find("anything").is_none());
    }

    #[test]
    fn test_client_derives_discovery_url() {
        let domain = TrustDomain::new("http://localhost:8082");
        let client = JwksClient::new(&domain);
        assert_eq!(client.jwks_url, "http://localhost:8082/.well-known/jwks.json");
    }

    #[test]
    fn test_client_custom_ttl() {
        let domain = TrustDomain::new("http://localhost:8082");
        let client = JwksClient::with_ttl(&domain, Duration::from_secs(60));
        assert_eq!(client.cache_ttl, Duration::from_secs(60));
    }
}
