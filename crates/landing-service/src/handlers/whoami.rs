//! Authenticated identity handler.
//!
//! Returns the security context attached by the authentication gate. The
//! gate lets anonymous requests through, so requiring an identity is this
//! route's own responsibility.

use crate::auth::Authorization;
use crate::errors::ApiError;
use axum::{Extension, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::instrument;

/// Response for `GET /whoami`.
#[derive(Debug, Clone, Serialize)]
pub struct WhoamiResponse {
    /// The authenticated principal.
    pub principal: String,

    /// When the presented token was issued.
    pub issued_at: DateTime<Utc>,

    /// When the presented token expires.
    pub expires_at: DateTime<Utc>,
}

/// Handler for `GET /whoami`.
///
/// Returns 401 for anonymous requests; otherwise echoes the validated
/// identity and its validity window.
#[instrument(skip_all, name = "landing.handlers.whoami")]
pub async fn whoami(
    Extension(authorization): Extension<Authorization>,
) -> Result<Json<WhoamiResponse>, ApiError> {
    let security_context = authorization
        .security_context()
        .ok_or(ApiError::Unauthorized)?;

    Ok(Json(WhoamiResponse {
        principal: security_context.principal.as_str().to_string(),
        issued_at: security_context.issued_at,
        expires_at: security_context.expires_at,
    }))
}
