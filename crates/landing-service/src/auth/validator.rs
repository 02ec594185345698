//! Access token validation.
//!
//! Validates presented tokens against public keys fetched from the trust
//! domain's JWKS endpoint, then checks issuer, audience and time claims.
//! All failures after the key fetch collapse into a single `InvalidToken`
//! error so that clients cannot distinguish why a token was rejected.

use super::claims::Claims;
use super::context::{Principal, SecurityContext};
use super::domain::TrustDomain;
use super::jwks::{Jwk, JwksClient};
use super::AuthError;
use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use std::sync::Arc;
use tracing::instrument;

/// Maximum allowed token size in bytes (8KB).
///
/// Oversized tokens are rejected before any base64 or cryptographic work
/// is done on them.
pub const MAX_TOKEN_SIZE_BYTES: usize = 8192;

/// Anything that can turn a bearer token into a security context.
///
/// The gate depends on this trait rather than on the concrete validator,
/// so tests can swap in a double that needs no key set or network.
#[async_trait]
pub trait Authorizer: Send + Sync {
    /// Validate a bearer token and produce the security context it proves.
    ///
    /// # Errors
    ///
    /// - `AuthError::KeySetUnavailable` if the verification keys cannot be
    ///   obtained.
    /// - `AuthError::InvalidToken` for any structural, signature or claim
    ///   failure.
    async fn parse_access_token(&self, token: &str) -> Result<SecurityContext, AuthError>;
}

/// Validator for access tokens issued by a trust domain.
///
/// Validation is a pure function of the token, the current key set and the
/// current time; no state is retained between calls beyond the JWKS cache.
pub struct AccessTokenValidator {
    /// Client for fetching verification keys.
    jwks: Arc<JwksClient>,

    /// Issuer URL that tokens must carry, derived from the trust domain.
    issuer: String,

    /// Audience value that tokens must be issued for.
    audience: String,

    /// Leeway in seconds applied to time claims (0 unless configured).
    leeway_seconds: i64,
}

impl AccessTokenValidator {
    /// Create a new validator.
    pub fn new<A>(
        jwks: Arc<JwksClient>,
        domain: &TrustDomain,
        audience: A,
        leeway_seconds: i64,
    ) -> Self
    where
        A: Into<String>,
    {
        Self {
            jwks,
            issuer: domain.issuer(),
            audience: audience.into(),
            leeway_seconds,
        }
    }
}

#[async_trait]
impl Authorizer for AccessTokenValidator {
    /// Validate a token, short-circuiting on the first failure:
    ///
    /// 1. Obtain the current key set.
    /// 2. Verify the signature with the key named by the token's `kid`.
    /// 3. Check issuer, audience, issued-at and expiration claims.
    /// 4. Build the security context from the subject and validity window.
    #[instrument(skip_all)]
    async fn parse_access_token(&self, token: &str) -> Result<SecurityContext, AuthError> {
        let keys = self.jwks.fetch_keys().await?;

        let kid = extract_kid(token)?;
        let jwk = keys.find(&kid).ok_or_else(|| {
            tracing::warn!(target: "landing.auth.validator", kid = %kid, "Token signed with unknown key");
            AuthError::InvalidToken
        })?;

        let claims = verify_signature(token, jwk)?;

        check_claims(
            &claims,
            &self.issuer,
            &self.audience,
            self.leeway_seconds,
            Utc::now().timestamp(),
        )?;

        let issued_at = timestamp_utc(claims.iat)?;
        let expires_at = timestamp_utc(claims.exp)?;

        tracing::debug!(target: "landing.auth.validator", "Token validated successfully");

        Ok(SecurityContext {
            principal: Principal::new(claims.sub),
            issued_at,
            expires_at,
        })
    }
}

/// Extract the `kid` from a token's unverified header.
///
/// The token size is capped before any parsing, and the signature is NOT
/// verified here; the `kid` is only used to look up a key in a trusted set.
fn extract_kid(token: &str) -> Result<String, AuthError> {
    if token.len() > MAX_TOKEN_SIZE_BYTES {
        tracing::debug!(
            target: "landing.auth.validator",
            token_size = token.len(),
            max_size = MAX_TOKEN_SIZE_BYTES,
            "Token rejected: size exceeds maximum allowed"
        );
        return Err(AuthError::InvalidToken);
    }

    // Compact JWS format: header.payload.signature
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        tracing::debug!(
            target: "landing.auth.validator",
            parts = parts.len(),
            "Token rejected: not compact JWS format"
        );
        return Err(AuthError::InvalidToken);
    }

    let header_part = parts.first().ok_or(AuthError::InvalidToken)?;
    let header_bytes = URL_SAFE_NO_PAD.decode(header_part).map_err(|e| {
        tracing::debug!(target: "landing.auth.validator", error = %e, "Failed to decode token header base64");
        AuthError::InvalidToken
    })?;

    let header: serde_json::Value = serde_json::from_slice(&header_bytes).map_err(|e| {
        tracing::debug!(target: "landing.auth.validator", error = %e, "Failed to parse token header JSON");
        AuthError::InvalidToken
    })?;

    // The kid must be a non-empty string
    header
        .get("kid")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .ok_or(AuthError::InvalidToken)
}

/// Verify the token signature against a single JWK and decode its claims.
fn verify_signature(token: &str, jwk: &Jwk) -> Result<Claims, AuthError> {
    let (decoding_key, algorithm) = decoding_key_for(jwk)?;

    // Claim checks happen separately against an explicit clock, so only the
    // signature and algorithm are verified here.
    let mut validation = Validation::new(algorithm);
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let token_data = decode::<Claims>(token, &decoding_key, &validation).map_err(|e| {
        tracing::debug!(target: "landing.auth.validator", error = %e, "Token signature verification failed");
        AuthError::InvalidToken
    })?;

    Ok(token_data.claims)
}

/// Build a decoding key and expected algorithm from a JWK.
fn decoding_key_for(jwk: &Jwk) -> Result<(DecodingKey, Algorithm), AuthError> {
    match jwk.kty.as_str() {
        "OKP" => {
            if let Some(alg) = &jwk.alg {
                if alg != "EdDSA" {
                    tracing::warn!(target: "landing.auth.validator", alg = %alg, "Unexpected algorithm for OKP key");
                    return Err(AuthError::InvalidToken);
                }
            }

            let x = jwk.x.as_ref().ok_or_else(|| {
                tracing::error!(target: "landing.auth.validator", kid = %jwk.kid, "OKP key missing x field");
                AuthError::InvalidToken
            })?;

            let public_key_bytes = URL_SAFE_NO_PAD.decode(x).map_err(|e| {
                tracing::error!(target: "landing.auth.validator", error = %e, "Invalid public key encoding");
                AuthError::InvalidToken
            })?;

            Ok((
                DecodingKey::from_ed_der(&public_key_bytes),
                Algorithm::EdDSA,
            ))
        }
        "RSA" => {
            let algorithm = match jwk.alg.as_deref() {
                Some("RS256") | None => Algorithm::RS256,
                Some("RS384") => Algorithm::RS384,
                Some("RS512") => Algorithm::RS512,
                Some(alg) => {
                    tracing::warn!(target: "landing.auth.validator", alg = %alg, "Unexpected algorithm for RSA key");
                    return Err(AuthError::InvalidToken);
                }
            };

            let (n, e) = match (&jwk.n, &jwk.e) {
                (Some(n), Some(e)) => (n, e),
                _ => {
                    tracing::error!(target: "landing.auth.validator", kid = %jwk.kid, "RSA key missing n or e field");
                    return Err(AuthError::InvalidToken);
                }
            };

            let decoding_key = DecodingKey::from_rsa_components(n, e).map_err(|e| {
                tracing::error!(target: "landing.auth.validator", error = %e, "Invalid RSA key components");
                AuthError::InvalidToken
            })?;

            Ok((decoding_key, algorithm))
        }
        other => {
            tracing::warn!(target: "landing.auth.validator", kty = %other, "Unsupported key type");
            Err(AuthError::InvalidToken)
        }
    }
}

/// Check the decoded claims against the expected issuer, audience and the
/// given clock.
///
/// Boundary-exact times are valid: a token is accepted when
/// `iat <= now + leeway` and `exp >= now - leeway`.
fn check_claims(
    claims: &Claims,
    issuer: &str,
    audience: &str,
    leeway_seconds: i64,
    now: i64,
) -> Result<(), AuthError> {
    if claims.iss != issuer {
        tracing::debug!(target: "landing.auth.validator", iss = %claims.iss, "Token rejected: issuer mismatch");
        return Err(AuthError::InvalidToken);
    }

    if !claims.aud.contains(audience) {
        tracing::debug!(target: "landing.auth.validator", aud = ?claims.aud, "Token rejected: audience mismatch");
        return Err(AuthError::InvalidToken);
    }

    if claims.iat > now + leeway_seconds {
        tracing::debug!(
            target: "landing.auth.validator",
            iat = claims.iat,
            now = now,
            "Token rejected: issued in the future"
        );
        return Err(AuthError::InvalidToken);
    }

    if claims.exp < now - leeway_seconds {
        tracing::debug!(
            target: "landing.auth.validator",
            exp = claims.exp,
            now = now,
            "Token rejected: expired"
        );
        return Err(AuthError::InvalidToken);
    }

    Ok(())
}

/// Convert an epoch-seconds claim into a UTC timestamp.
fn timestamp_utc(seconds: i64) -> Result<DateTime<Utc>, AuthError> {
    DateTime::from_timestamp(seconds, 0).ok_or_else(|| {
        tracing::debug!(target: "landing.auth.validator", seconds = seconds, "Token rejected: timestamp out of range");
        AuthError::InvalidToken
    })
}
