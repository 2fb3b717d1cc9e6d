//! HTTP request handlers for the risk API.

pub mod geo;
pub mod health;
pub mod meta;
pub mod pages;

use axum::{
    http::{header, StatusCode},
    response::Response,
};
use geo_protocol::{media_types, ExceptionResponse};

/// Render an exception body with the given status.
pub(crate) fn error_response(status: StatusCode, exc: ExceptionResponse) -> Response {
    let json = serde_json::to_string(&exc).unwrap_or_default();
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, media_types::JSON)
        .body(json.into())
        .unwrap_or_else(|_| Response::new(Default::default()))
}

/// Serialize `body` as compact JSON with a 200 status.
pub(crate) fn json_response<T: serde::Serialize>(body: &T) -> Response {
    match serde_json::to_vec(body) {
        Ok(bytes) => Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, media_types::JSON)
            .body(bytes.into())
            .unwrap_or_else(|_| Response::new(Default::default())),
        Err(e) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            ExceptionResponse::internal_error(format!("Failed to serialize response: {}", e)),
        ),
    }
}
