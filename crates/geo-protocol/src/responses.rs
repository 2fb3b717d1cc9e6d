//! API response types.
//!
//! This module contains the metadata document, the health body and the
//! exception body returned for client and server errors.

use serde::{Deserialize, Serialize};

/// Metadata describing the grid, the date axis and the active data source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetaResponse {
    /// Nominal cell side length in kilometres.
    pub grid_km: f64,

    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,

    /// Grid shape.
    pub rows: usize,
    pub cols: usize,

    /// The date the past/now/forecast split is made against (ISO-8601).
    pub today: String,

    /// Full date axis (ISO-8601).
    pub dates: Vec<String>,

    /// Human-readable description of the data source.
    pub data_note: String,

    /// Path of the loaded tabular source, null for synthetic data.
    pub csv_file: Option<String>,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// Exception response for errors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExceptionResponse {
    /// Exception type identifier.
    #[serde(rename = "type")]
    pub type_: String,

    /// Human-readable title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// HTTP status code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,

    /// Detailed error message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// URI of the request that caused the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
}

impl ExceptionResponse {
    /// Create a new exception response.
    pub fn new(type_: impl Into<String>, status: u16, detail: impl Into<String>) -> Self {
        Self {
            type_: type_.into(),
            title: None,
            status: Some(status),
            detail: Some(detail.into()),
            instance: None,
        }
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the instance URI.
    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }

    /// Create a 404 Not Found exception.
    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new("/errors/not-found", 404, detail).with_title("Not Found")
    }

    /// Create a 400 Bad Request exception.
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new("/errors/invalid-parameter-value", 400, detail).with_title("Bad Request")
    }

    /// Create a 500 Internal Server Error exception.
    pub fn internal_error(detail: impl Into<String>) -> Self {
        Self::new("/errors/server-error", 500, detail).with_title("Internal Server Error")
    }
}
