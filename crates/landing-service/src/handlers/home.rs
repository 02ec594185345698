//! Home document handler.
//!
//! Serves the hypermedia entry point of the service: a HAL document naming
//! the service and linking to everything a client can reach from here.

use crate::hal::HalDocument;
use axum::http::header;
use axum::response::IntoResponse;
use serde_json::json;
use tracing::instrument;

/// Handler for `GET /`.
///
/// Public; no authentication required. The document is stable per build, so
/// clients may cache it for an hour.
#[instrument(name = "landing.handlers.home")]
pub async fn home() -> impl IntoResponse {
    let document = HalDocument::new(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
    .with_link("self", "/")
    .with_link("whoami", "/whoami");

    (
        [(header::CACHE_CONTROL, "public, max-age=3600")],
        document,
    )
}
