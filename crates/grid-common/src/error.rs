//! Error types for grid configuration.

use thiserror::Error;

/// Result type alias using GridError.
pub type GridResult<T> = Result<T, GridError>;

/// Configuration errors. Any of these is fatal at startup: the service must
/// not begin serving with an invalid grid.
#[derive(Debug, Error, PartialEq)]
pub enum GridError {
    #[error("Invalid region: {0}")]
    InvalidRegion(String),

    #[error("Invalid grid step: {0}")]
    InvalidStep(String),

    #[error("Invalid date window: {0}")]
    InvalidWindow(String),

    #[error("Invalid coordinate precision: {0} (expected 0..=10)")]
    InvalidPrecision(u32),
}
