//! Health check handler.

use axum::Json;
use serde::Serialize;
use tracing::instrument;

/// Response for `GET /health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Always "healthy"; the service has no backing stores to probe.
    pub status: String,

    /// Running service version.
    pub version: String,
}

/// Liveness probe. Always returns 200.
#[instrument(name = "landing.handlers.health")]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
