//! Configuration for dataset construction.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::NaiveDate;
use grid_common::{GridError, GridResult, Region};
use serde::{Deserialize, Serialize};

/// File names probed in the data directory when no source is configured,
/// in priority order.
pub const DEFAULT_CSV_NAMES: [&str; 4] = [
    "risk_daily.csv.gz",
    "risk_daily.csv",
    "risk_daily_cells.csv.gz",
    "risk_daily_cells.csv",
];

/// Highest coordinate rounding precision accepted.
pub const MAX_COORD_DECIMALS: u32 = 10;

/// How the date axis is chosen when a tabular source is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DateAxisMode {
    /// Distinct dates found in the source become the axis.
    #[default]
    Source,
    /// The configured window is the axis; records outside it are dropped.
    Window,
}

impl FromStr for DateAxisMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "source" => Ok(DateAxisMode::Source),
            "window" => Ok(DateAxisMode::Window),
            other => Err(format!(
                "unknown date axis mode '{}' (expected 'source' or 'window')",
                other
            )),
        }
    }
}

impl fmt::Display for DateAxisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateAxisMode::Source => f.write_str("source"),
            DateAxisMode::Window => f.write_str("window"),
        }
    }
}

/// Inputs for [`crate::RiskDataset::build`].
#[derive(Debug, Clone)]
pub struct DatasetConfig {
    /// Bounding region of the grid.
    pub region: Region,

    /// Nominal cell side length in kilometres.
    pub grid_km: f64,

    /// Days before today in the default window.
    pub days_back: u32,

    /// Days after today in the default window.
    pub days_fwd: u32,

    /// Decimal places kept on emitted coordinates.
    pub coord_decimals: u32,

    /// Tabular source, if any. A path that does not exist is not an error.
    pub csv_path: Option<PathBuf>,

    /// Date axis policy for tabular sources.
    pub date_axis: DateAxisMode,

    /// The date past/now/forecast is split against.
    pub today: NaiveDate,
}

impl DatasetConfig {
    /// Default configuration (Thailand, 10 km, two weeks either side of
    /// `today`, synthetic data).
    pub fn new(today: NaiveDate) -> Self {
        Self {
            region: Region {
                lat_min: 5.6,
                lat_max: 20.7,
                lon_min: 97.0,
                lon_max: 105.9,
            },
            grid_km: 10.0,
            days_back: 14,
            days_fwd: 14,
            coord_decimals: 4,
            csv_path: None,
            date_axis: DateAxisMode::Source,
            today,
        }
    }

    /// Validate the parts of the configuration not covered by the grid
    /// constructors.
    pub fn validate(&self) -> GridResult<()> {
        if self.coord_decimals > MAX_COORD_DECIMALS {
            return Err(GridError::InvalidPrecision(self.coord_decimals));
        }
        // Re-run region validation in case the struct was built literally
        Region::new(
            self.region.lat_min,
            self.region.lat_max,
            self.region.lon_min,
            self.region.lon_max,
        )?;
        Ok(())
    }
}

/// Pick the tabular source: the explicit path if given, otherwise the first
/// of [`DEFAULT_CSV_NAMES`] present in `data_dir`.
pub fn resolve_csv_path(explicit: Option<&Path>, data_dir: &Path) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    DEFAULT_CSV_NAMES
        .iter()
        .map(|name| data_dir.join(name))
        .find(|candidate| candidate.is_file())
}
