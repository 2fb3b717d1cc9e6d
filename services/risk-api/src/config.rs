//! Command-line and environment configuration.

use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::Parser;
use grid_common::time::parse_iso_date;
use grid_common::{GridError, Region};
use risk_processor::{resolve_csv_path, DateAxisMode, DatasetConfig};
use thiserror::Error;

/// Risk grid API server
#[derive(Parser, Debug, Clone)]
#[command(name = "risk-api")]
#[command(about = "Serves a daily risk grid as GeoJSON layers")]
pub struct ServiceArgs {
    /// Preferred bind host
    #[arg(long, default_value = "127.0.0.1", env = "HOST")]
    pub host: String,

    /// Preferred port; 8010-8039 and an ephemeral port are tried next
    #[arg(long, default_value_t = 8000, env = "PORT")]
    pub port: u16,

    #[arg(long, default_value_t = 5.6, env = "LAT_MIN", allow_hyphen_values = true)]
    pub lat_min: f64,

    #[arg(long, default_value_t = 20.7, env = "LAT_MAX", allow_hyphen_values = true)]
    pub lat_max: f64,

    #[arg(long, default_value_t = 97.0, env = "LON_MIN", allow_hyphen_values = true)]
    pub lon_min: f64,

    #[arg(long, default_value_t = 105.9, env = "LON_MAX", allow_hyphen_values = true)]
    pub lon_max: f64,

    /// Cell side length in kilometres
    #[arg(long, default_value_t = 10.0, env = "GRID_KM")]
    pub grid_km: f64,

    /// Days before today in the date window
    #[arg(long, default_value_t = 14, env = "DAYS_BACK")]
    pub days_back: u32,

    /// Days after today in the date window
    #[arg(long, default_value_t = 14, env = "DAYS_FWD")]
    pub days_fwd: u32,

    /// Decimal places kept on emitted coordinates
    #[arg(long, default_value_t = 4, env = "COORD_DEC")]
    pub coord_dec: u32,

    /// Tabular source (plain or gzipped CSV)
    #[arg(long, env = "CSV_FILE")]
    pub csv_file: Option<PathBuf>,

    /// Directory searched for the default CSV names
    #[arg(long, default_value = ".", env = "DATA_DIR")]
    pub data_dir: PathBuf,

    /// Date axis: "source" (dates found in the CSV) or "window"
    #[arg(long, default_value = "source", env = "DATE_AXIS")]
    pub date_axis: DateAxisMode,

    /// Override for today's date (YYYY-MM-DD)
    #[arg(long, env = "TODAY")]
    pub today: Option<String>,

    /// Stride used when a geo query does not give one
    #[arg(long, default_value_t = 2, env = "DEFAULT_STRIDE")]
    pub default_stride: usize,

    /// Directory holding index.html and static assets
    #[arg(long, default_value = "static", env = "STATIC_DIR")]
    pub static_dir: PathBuf,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    pub log_level: String,

    /// Number of worker threads
    #[arg(long, env = "RISK_WORKER_THREADS")]
    pub worker_threads: Option<usize>,
}

/// Problems with the service configuration. All are fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid TODAY '{0}' (expected YYYY-MM-DD)")]
    InvalidToday(String),

    #[error("default stride must be at least 1")]
    InvalidStride,

    #[error(transparent)]
    Grid(#[from] GridError),
}

impl ServiceArgs {
    /// The date the past/now/forecast split is made against.
    pub fn today(&self) -> Result<NaiveDate, ConfigError> {
        match self.today.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(s) => parse_iso_date(s).ok_or_else(|| ConfigError::InvalidToday(s.to_string())),
            None => Ok(Local::now().date_naive()),
        }
    }

    /// Validated dataset configuration.
    pub fn dataset_config(&self) -> Result<DatasetConfig, ConfigError> {
        if self.default_stride == 0 {
            return Err(ConfigError::InvalidStride);
        }

        let region = Region::new(self.lat_min, self.lat_max, self.lon_min, self.lon_max)?;

        let config = DatasetConfig {
            region,
            grid_km: self.grid_km,
            days_back: self.days_back,
            days_fwd: self.days_fwd,
            coord_decimals: self.coord_dec,
            csv_path: resolve_csv_path(self.csv_file.as_deref(), &self.data_dir),
            date_axis: self.date_axis,
            today: self.today()?,
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> ServiceArgs {
        let mut argv = vec!["risk-api"];
        argv.extend_from_slice(args);
        ServiceArgs::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["--today", "2024-01-15", "--data-dir", "/nonexistent"]);
        assert_eq!(args.default_stride, 2);

        let config = args.dataset_config().unwrap();
        assert_eq!(config.region.lat_min, 5.6);
        assert_eq!(config.region.lon_max, 105.9);
        assert_eq!(config.grid_km, 10.0);
        assert_eq!(config.coord_decimals, 4);
        assert_eq!(config.date_axis, DateAxisMode::Source);
        assert!(config.csv_path.is_none());
    }

    #[test]
    fn test_negative_bounds_and_window_mode() {
        let args = parse(&[
            "--lat-min", "-10", "--lat-max", "-5", "--lon-min", "-3", "--lon-max", "2",
            "--date-axis", "window", "--today", "2024-01-15",
        ]);
        let config = args.dataset_config().unwrap();
        assert_eq!(config.region.lat_min, -10.0);
        assert_eq!(config.date_axis, DateAxisMode::Window);
    }

    #[test]
    fn test_invalid_today() {
        let args = parse(&["--today", "15/01/2024"]);
        assert!(matches!(args.dataset_config(), Err(ConfigError::InvalidToday(_))));
    }

    #[test]
    fn test_inverted_region_rejected() {
        let args = parse(&["--lat-min", "20", "--lat-max", "10", "--today", "2024-01-15"]);
        assert!(matches!(
            args.dataset_config(),
            Err(ConfigError::Grid(GridError::InvalidRegion(_)))
        ));
    }

    #[test]
    fn test_precision_rejected() {
        let args = parse(&["--coord-dec", "12", "--today", "2024-01-15"]);
        assert!(matches!(
            args.dataset_config(),
            Err(ConfigError::Grid(GridError::InvalidPrecision(12)))
        ));
    }

    #[test]
    fn test_zero_default_stride_rejected() {
        let args = parse(&["--default-stride", "0", "--today", "2024-01-15"]);
        assert!(matches!(args.dataset_config(), Err(ConfigError::InvalidStride)));
    }

    #[test]
    fn test_unknown_date_axis_rejected() {
        let argv = ["risk-api", "--date-axis", "fixed"];
        assert!(ServiceArgs::try_parse_from(argv).is_err());
    }
}
