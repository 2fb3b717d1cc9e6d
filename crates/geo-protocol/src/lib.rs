//! Risk-grid API protocol
//!
//! Wire types shared by the data layer and the HTTP service: GeoJSON
//! feature collections of grid cells, the metadata document, geo query
//! parameters and the JSON exception body.
//!
//! # Example
//!
//! ```rust
//! use geo_protocol::{CellFeature, CellProperties, FeatureCollection};
//!
//! let ring = vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]];
//! let props = CellProperties {
//!     time: "2024-01-15".to_string(),
//!     cell_id: "r0c0".to_string(),
//!     row: 0,
//!     col: 0,
//!     center_lat: 0.5,
//!     center_lon: 0.5,
//!     value: 1.25,
//! };
//! let fc = FeatureCollection::new().with_feature(CellFeature::polygon(ring, props));
//! assert_eq!(fc.features.len(), 1);
//! ```

pub mod errors;
pub mod geojson;
pub mod queries;
pub mod responses;

// Re-export commonly used types
pub use errors::QueryError;
pub use geojson::{CellFeature, CellProperties, FeatureCollection, Geometry};
pub use queries::{GeoQuery, GeoQueryParams, Layer, Metric};
pub use responses::{ExceptionResponse, HealthResponse, MetaResponse};

/// Media types used in API responses
pub mod media_types {
    /// JSON media type
    pub const JSON: &str = "application/json";
    /// Prometheus text exposition format
    pub const PROMETHEUS_TEXT: &str = "text/plain; version=0.0.4";
}
