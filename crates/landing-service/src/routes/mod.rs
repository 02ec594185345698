//! Router assembly.
//!
//! Wires handlers, the authentication gate and the shared middleware stack
//! into the Axum router.

use crate::handlers;
use crate::middleware::{authenticate, AuthState};
use axum::{routing::get, Router};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

/// Build the application routes.
///
/// Every route sits behind the authentication gate; the gate itself only
/// rejects requests whose credentials fail validation, so `/` and `/health`
/// remain publicly reachable.
///
/// Layer order (bottom-to-top execution):
/// 1. `authenticate` - resolve the request's authorization state
/// 2. `TimeoutLayer` - 30 second request timeout
/// 3. `TraceLayer` - request logging
pub fn build_routes(auth_state: Arc<AuthState>) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/whoami", get(handlers::whoami))
        .route("/health", get(handlers::health_check))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            authenticate,
        ))
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_state_is_clone() {
        // Required for Axum's State extractor
        fn assert_clone<T: Clone>() {}
        assert_clone::<AuthState>();
    }
}
