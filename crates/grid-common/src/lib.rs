//! Common types and utilities shared across all risk-grid crates.

pub mod error;
pub mod grid;
pub mod region;
pub mod time;

pub use error::{GridError, GridResult};
pub use grid::{Grid, GridCell, KM_PER_DEG_LAT, KM_PER_DEG_LON};
pub use region::Region;
pub use time::{DateAxis, TimePartition};
