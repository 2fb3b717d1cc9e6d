//! Error types for data loading and dataset assembly.

use grid_common::GridError;
use thiserror::Error;

/// Errors that abort dataset construction.
///
/// Only configuration problems end up here; data-source problems are
/// absorbed by falling back to the synthetic model.
#[derive(Error, Debug)]
pub enum ProcessorError {
    /// Invalid region, grid step or date window.
    #[error("configuration error: {0}")]
    Config(#[from] GridError),
}

/// Reasons a tabular source is abandoned.
#[derive(Error, Debug)]
pub enum SourceError {
    /// No path was given and none of the default names exist.
    #[error("no tabular source configured")]
    NotConfigured,

    /// The configured file does not exist.
    #[error("file not found: {0}")]
    NotFound(String),

    /// Failed to open or read (including decompression) the file.
    #[error("failed to read source: {0}")]
    Io(#[from] std::io::Error),

    /// CSV stream could not be decoded.
    #[error("failed to decode CSV: {0}")]
    Csv(#[from] csv::Error),

    /// The header matches neither accepted shape.
    #[error("header not recognized: [{0}]")]
    UnrecognizedHeader(String),

    /// No record carried a usable date.
    #[error("no dated records in source")]
    NoDates,
}
