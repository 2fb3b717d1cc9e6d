//! GeoJSON types for grid-cell responses.
//!
//! Every feature is a single grid cell: a polygon with one closed ring of
//! five `[longitude, latitude]` pairs, plus the properties of that cell on
//! one date. Field order is fixed by the struct definitions, so serialized
//! output is byte-for-byte reproducible for the same inputs.
//!
//! See: <https://datatracker.ietf.org/doc/html/rfc7946>

use serde::{Deserialize, Serialize};

/// A GeoJSON FeatureCollection of grid cells.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureCollection {
    /// Type identifier (always "FeatureCollection").
    #[serde(rename = "type")]
    pub type_: String,

    /// Array of features.
    pub features: Vec<CellFeature>,
}

impl FeatureCollection {
    /// Create a new empty FeatureCollection.
    pub fn new() -> Self {
        Self {
            type_: "FeatureCollection".to_string(),
            features: Vec::new(),
        }
    }

    /// Create an empty FeatureCollection with room for `capacity` features.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            type_: "FeatureCollection".to_string(),
            features: Vec::with_capacity(capacity),
        }
    }

    /// Add a feature to the collection.
    pub fn with_feature(mut self, feature: CellFeature) -> Self {
        self.features.push(feature);
        self
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl Default for FeatureCollection {
    fn default() -> Self {
        Self::new()
    }
}

/// A GeoJSON Feature describing one cell on one date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CellFeature {
    /// Type identifier (always "Feature").
    #[serde(rename = "type")]
    pub type_: String,

    /// The cell outline.
    pub geometry: Geometry,

    /// Cell identity, date and metric value.
    pub properties: CellProperties,
}

impl CellFeature {
    /// Create a feature from a single exterior ring.
    pub fn polygon(ring: Vec<[f64; 2]>, properties: CellProperties) -> Self {
        Self {
            type_: "Feature".to_string(),
            geometry: Geometry::polygon(vec![ring]),
            properties,
        }
    }
}

/// GeoJSON geometry types emitted by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Geometry {
    /// A polygon geometry.
    Polygon {
        /// Array of linear rings; grid cells only ever carry the exterior ring.
        /// Each ring is an array of [longitude, latitude] coordinate pairs.
        coordinates: Vec<Vec<[f64; 2]>>,
    },
}

impl Geometry {
    /// Create a polygon geometry.
    pub fn polygon(coordinates: Vec<Vec<[f64; 2]>>) -> Self {
        Geometry::Polygon { coordinates }
    }

    /// The exterior ring.
    pub fn exterior(&self) -> Option<&[[f64; 2]]> {
        match self {
            Geometry::Polygon { coordinates } => coordinates.first().map(Vec::as_slice),
        }
    }
}

/// Properties carried by each cell feature.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CellProperties {
    /// ISO-8601 date.
    pub time: String,
    pub cell_id: String,
    pub row: usize,
    pub col: usize,
    pub center_lat: f64,
    pub center_lon: f64,
    /// Metric value (raw value or day-over-day delta).
    pub value: f64,
}
