//! Service configuration.
//!
//! Configuration is loaded from environment variables at startup. The trust
//! domain and audience are required; a missing value aborts startup rather
//! than entering the per-request error path.

use crate::auth::jwks::DEFAULT_CACHE_TTL_SECONDS;
use std::collections::HashMap;
use std::env;
use thiserror::Error;

/// Default HTTP bind address.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8000";

/// Maximum allowed leeway for time-claim validation (10 minutes).
///
/// Prevents a misconfiguration from effectively disabling expiry checks.
pub const MAX_AUTH_LEEWAY_SECONDS: i64 = 600;

/// Service configuration, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (default: "0.0.0.0:8000").
    pub bind_address: String,

    /// Base URL of the identity provider that tokens are trusted from.
    pub trust_domain: String,

    /// Audience value that presented tokens must be issued for.
    pub audience: String,

    /// How long fetched signing keys are cached, in seconds.
    pub jwks_cache_ttl_seconds: u64,

    /// Leeway applied to time-claim validation, in seconds (default: 0).
    pub auth_leeway_seconds: i64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid JWKS cache TTL configuration: {0}")]
    InvalidCacheTtl(String),

    #[error("Invalid auth leeway configuration: {0}")]
    InvalidAuthLeeway(String),
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if a required variable is missing or an
    /// optional one fails validation. These errors are fatal to startup.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a map (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let trust_domain = vars
            .get("TRUST_DOMAIN")
            .ok_or_else(|| ConfigError::MissingEnvVar("TRUST_DOMAIN".to_string()))?
            .clone();

        let audience = vars
            .get("AUDIENCE")
            .ok_or_else(|| ConfigError::MissingEnvVar("AUDIENCE".to_string()))?
            .clone();

        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let jwks_cache_ttl_seconds = if let Some(value_str) = vars.get("JWKS_CACHE_TTL_SECONDS") {
            let value: u64 = value_str.parse().map_err(|e| {
                ConfigError::InvalidCacheTtl(format!(
                    "JWKS_CACHE_TTL_SECONDS must be a valid positive integer, got '{}': {}",
                    value_str, e
                ))
            })?;

            if value == 0 {
                return Err(ConfigError::InvalidCacheTtl(
                    "JWKS_CACHE_TTL_SECONDS must be greater than 0".to_string(),
                ));
            }

            value
        } else {
            DEFAULT_CACHE_TTL_SECONDS
        };

        let auth_leeway_seconds = if let Some(value_str) = vars.get("AUTH_LEEWAY_SECONDS") {
            let value: i64 = value_str.parse().map_err(|e| {
                ConfigError::InvalidAuthLeeway(format!(
                    "AUTH_LEEWAY_SECONDS must be a valid integer, got '{}': {}",
                    value_str, e
                ))
            })?;

            if value < 0 {
                return Err(ConfigError::InvalidAuthLeeway(format!(
                    "AUTH_LEEWAY_SECONDS must not be negative, got {}",
                    value
                )));
            }

            if value > MAX_AUTH_LEEWAY_SECONDS {
                return Err(ConfigError::InvalidAuthLeeway(format!(
                    "AUTH_LEEWAY_SECONDS must not exceed {} seconds, got {}",
                    MAX_AUTH_LEEWAY_SECONDS, value
                )));
            }

            value
        } else {
            0
        };

        Ok(Config {
            bind_address,
            trust_domain,
            audience,
            jwks_cache_ttl_seconds,
            auth_leeway_seconds,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn base_vars() -> HashMap<String, String> {
        HashMap::from([
            (
                "TRUST_DOMAIN".to_string(),
                "https://example.eu.auth0.com".to_string(),
            ),
            (
                "AUDIENCE".to_string(),
                "https://api.example.com/".to_string(),
            ),
        ])
    }

    #[test]
    fn test_from_vars_success_with_defaults() {
        let config = Config::from_vars(&base_vars()).expect("Config should load successfully");

        assert_eq!(config.trust_domain, "https://example.eu.auth0.com");
        assert_eq!(config.audience, "https://api.example.com/");
        assert_eq!(config.bind_address, DEFAULT_BIND_ADDRESS);
        assert_eq!(config.jwks_cache_ttl_seconds, DEFAULT_CACHE_TTL_SECONDS);
        assert_eq!(config.auth_leeway_seconds, 0);
    }

    #[test]
    fn test_from_vars_success_with_custom_values() {
        let mut vars = base_vars();
        vars.insert("BIND_ADDRESS".to_string(), "127.0.0.1:9000".to_string());
        vars.insert("JWKS_CACHE_TTL_SECONDS".to_string(), "60".to_string());
        vars.insert("AUTH_LEEWAY_SECONDS".to_string(), "30".to_string());

        let config = Config::from_vars(&vars).expect("Config should load successfully");

        assert_eq!(config.bind_address, "127.0.0.1:9000");
        assert_eq!(config.jwks_cache_ttl_seconds, 60);
        assert_eq!(config.auth_leeway_seconds, 30);
    }

    #[test]
    fn test_missing_trust_domain() {
        let mut vars = base_vars();
        vars.remove("TRUST_DOMAIN");

        let result = Config::from_vars(&vars);
        assert!(matches!(result, Err(ConfigError::MissingEnvVar(v)) if v == "TRUST_DOMAIN"));
    }

    #[test]
    fn test_missing_audience() {
        let mut vars = base_vars();
        vars.remove("AUDIENCE");

        let result = Config::from_vars(&vars);
        assert!(matches!(result, Err(ConfigError::MissingEnvVar(v)) if v == "AUDIENCE"));
    }

    #[test]
    fn test_cache_ttl_rejects_zero() {
        let mut vars = base_vars();
        vars.insert("JWKS_CACHE_TTL_SECONDS".to_string(), "0".to_string());

        let result = Config::from_vars(&vars);
        assert!(
            matches!(result, Err(ConfigError::InvalidCacheTtl(msg)) if msg.contains("greater than 0"))
        );
    }

    #[test]
    fn test_cache_ttl_rejects_non_numeric() {
        let mut vars = base_vars();
        vars.insert("JWKS_CACHE_TTL_SECONDS".to_string(), "five".to_string());

        let result = Config::from_vars(&vars);
        assert!(matches!(result, Err(ConfigError::InvalidCacheTtl(_))));
    }

    #[test]
    fn test_leeway_rejects_negative() {
        let mut vars = base_vars();
        vars.insert("AUTH_LEEWAY_SECONDS".to_string(), "-5".to_string());

        let result = Config::from_vars(&vars);
        assert!(
            matches!(result, Err(ConfigError::InvalidAuthLeeway(msg)) if msg.contains("negative"))
        );
    }

    #[test]
    fn test_leeway_rejects_too_large() {
        let mut vars = base_vars();
        vars.insert("AUTH_LEEWAY_SECONDS".to_string(), "601".to_string());

        let result = Config::from_vars(&vars);
        assert!(
            matches!(result, Err(ConfigError::InvalidAuthLeeway(msg)) if msg.contains("must not exceed 600"))
        );
    }

    #[test]
    fn test_leeway_accepts_max() {
        let mut vars = base_vars();
        vars.insert("AUTH_LEEWAY_SECONDS".to_string(), "600".to_string());

        let config = Config::from_vars(&vars).expect("Config should load successfully");
        assert_eq!(config.auth_leeway_seconds, 600);
    }
}
