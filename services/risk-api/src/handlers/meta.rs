//! Metadata handler.

use axum::{extract::Extension, response::Response};

use super::json_response;
use crate::state::AppState;

/// GET /api/meta - Grid shape, region, date axis and data source
pub async fn meta_handler(Extension(state): Extension<AppState>) -> Response {
    json_response(&state.dataset.meta())
}
