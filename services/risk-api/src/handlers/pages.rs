//! Index page and favicon.

use axum::{
    extract::Extension,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use geo_protocol::ExceptionResponse;
use tracing::warn;

use super::error_response;
use crate::state::AppState;

/// GET / and /index.html - The map page from the static directory
pub async fn index_handler(Extension(state): Extension<AppState>) -> Response {
    let path = state.static_dir.join("index.html");
    match tokio::fs::read_to_string(&path).await {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "index.html unavailable");
            error_response(
                StatusCode::NOT_FOUND,
                ExceptionResponse::not_found("index.html not found").with_instance("/"),
            )
        }
    }
}

/// GET /favicon.ico - No icon is served
pub async fn favicon_handler() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Fallback for unknown routes.
pub async fn not_found_handler() -> Response {
    error_response(
        StatusCode::NOT_FOUND,
        ExceptionResponse::not_found("No such resource"),
    )
}
