//! API error responses.
//!
//! Every authentication failure is converted into the same uniform
//! unauthorized response at the gate boundary, so clients cannot tell a
//! signature failure from a claim failure or an unavailable key set. The
//! actual cause is logged server-side.

use crate::auth::AuthError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Errors surfaced to API clients.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The request claimed to be authenticated but could not be authorized.
    #[error("unauthorized")]
    Unauthorized,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "The request could not be authorized",
            ),
        };

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: message.to_string(),
            },
        };

        (status, Json(error_response)).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        // Log the real cause; the client sees only the uniform response
        match &err {
            AuthError::KeySetUnavailable => {
                tracing::warn!(target: "landing.errors", error = %err, "Rejecting request: key set unavailable");
            }
            AuthError::InvalidToken => {
                tracing::debug!(target: "landing.errors", error = %err, "Rejecting request: invalid token");
            }
        }

        ApiError::Unauthorized
    }
}
