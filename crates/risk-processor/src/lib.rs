//! Spatiotemporal risk aggregation
//!
//! This crate turns a region, a cell size and an optional tabular source
//! into a date × cell matrix of risk values, and renders slices of it as
//! GeoJSON feature collections. It provides:
//!
//! - **Tabular loading**: cell-keyed or point-keyed CSV, optionally gzipped
//! - **Synthetic fallback**: a deterministic model used when no source works
//! - **Deltas**: day-over-day differences of the value matrix
//! - **Decimation**: stride and threshold filtering at render time
//!
//! # Architecture
//!
//! ```text
//! DatasetConfig
//!      │
//!      ▼
//! RiskDataset::build
//!      │
//!      ├─► Grid::from_km (region + km → cells)
//!      │
//!      ├─► load_source(csv_path)
//!      │         │
//!      │         ├─► Loaded: bin records, merge duplicates → ValueMatrix
//!      │         │
//!      │         └─► Fallback: SyntheticModel::generate → ValueMatrix
//!      │
//!      └─► DeltaMatrix::from_values
//!               │
//!               ▼
//!     RiskDataset::features(layer, query)   (per request, read-only)
//! ```
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use geo_protocol::{GeoQuery, Layer};
//! use risk_processor::{DatasetConfig, RiskDataset};
//!
//! let today = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
//! let mut config = DatasetConfig::new(today);
//! config.grid_km = 50.0;
//!
//! let dataset = RiskDataset::build(&config).unwrap();
//! let query = GeoQuery { stride: 2, min_value: None };
//! let now = dataset.features(Layer::Now, &query);
//! assert!(!now.is_empty());
//! ```

pub mod config;
pub mod dataset;
pub mod error;
pub mod features;
pub mod matrix;
pub mod source;
pub mod synthetic;

// Re-export commonly used types at crate root
pub use config::{resolve_csv_path, DateAxisMode, DatasetConfig, DEFAULT_CSV_NAMES};
pub use dataset::{DataOrigin, RiskDataset};
pub use error::{ProcessorError, SourceError};
pub use features::{cell_ring, round_to, FeatureCollectionBuilder, MetricRows};
pub use matrix::{DeltaMatrix, ValueMatrix};
pub use source::{
    load_source, open_maybe_gzip, read_records, LoadStats, LoadedSource, RecordShape,
    SourceOutcome, TabularData,
};
pub use synthetic::{stable_noise, SyntheticModel};
