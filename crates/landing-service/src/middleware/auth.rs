//! Authentication gate for inbound requests.
//!
//! Every request passes through here before reaching a route handler. The
//! gate never blocks anonymous requests: a request with no `Authorization`
//! header proceeds without a security context, and routes that require an
//! identity check for its presence themselves. Requests that claim to be
//! authenticated but fail validation are rejected before any handler runs.

use crate::auth::{Authorization, Authorizer};
use crate::errors::ApiError;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::instrument;

/// State for the authentication gate.
#[derive(Clone)]
pub struct AuthState {
    /// Capability for turning a bearer token into a security context.
    pub authorizer: Arc<dyn Authorizer>,
}

/// Authentication middleware.
///
/// Per-request state machine:
/// - no (or empty) `Authorization` header: proceed as [`Authorization::Anonymous`];
/// - header present but not `Bearer <token>`: reject with 401;
/// - bearer token present: validate, attaching
///   [`Authorization::Authenticated`] on success and rejecting with 401 on
///   failure.
#[instrument(skip_all, name = "landing.middleware.auth")]
pub async fn authenticate(
    State(state): State<Arc<AuthState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .map(|h| h.to_str().map_err(|_| ApiError::Unauthorized))
        .transpose()?;

    let Some(header_value) = header_value.filter(|h| !h.is_empty()) else {
        tracing::debug!(target: "landing.middleware.auth", "No credential presented");
        req.extensions_mut().insert(Authorization::Anonymous);
        return Ok(next.run(req).await);
    };

    let token = header_value.strip_prefix("Bearer ").ok_or_else(|| {
        tracing::warn!(target: "landing.middleware.auth", "Authorization header is not a bearer token");
        ApiError::Unauthorized
    })?;

    let security_context = state.authorizer.parse_access_token(token).await?;

    tracing::debug!(target: "landing.middleware.auth", security_context = ?security_context, "Parsed security context");

    req.extensions_mut()
        .insert(Authorization::Authenticated(security_context));

    Ok(next.run(req).await)
}
