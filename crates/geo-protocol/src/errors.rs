//! API error types.

use thiserror::Error;

use crate::responses::ExceptionResponse;

/// Errors raised while interpreting a request.
///
/// All of them are client errors; none touches shared state.
#[derive(Debug, Error, PartialEq)]
pub enum QueryError {
    /// Geo layer name not recognised.
    #[error("Unknown layer: {0} (expected past, now, forecast or delta)")]
    UnknownLayer(String),

    /// Stride is not a positive integer.
    #[error("Invalid stride: {0} (expected an integer >= 1)")]
    InvalidStride(String),

    /// Minimum value is not a finite number.
    #[error("Invalid min: {0} (expected a finite number)")]
    InvalidMin(String),

    /// Query string could not be decoded at all.
    #[error("Malformed query string: {0}")]
    MalformedQuery(String),
}

impl QueryError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            QueryError::UnknownLayer(_) => 404,
            QueryError::InvalidStride(_) => 400,
            QueryError::InvalidMin(_) => 400,
            QueryError::MalformedQuery(_) => 400,
        }
    }

    /// Convert to an ExceptionResponse.
    pub fn to_exception(&self) -> ExceptionResponse {
        match self {
            QueryError::UnknownLayer(_) => ExceptionResponse::not_found(self.to_string()),
            QueryError::InvalidStride(_)
            | QueryError::InvalidMin(_)
            | QueryError::MalformedQuery(_) => {
                ExceptionResponse::bad_request(self.to_string())
            }
        }
    }
}
