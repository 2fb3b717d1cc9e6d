//! One-shot dataset initialization.
//!
//! [`RiskDataset::build`] runs every stage (grid, date axis, source or
//! synthetic values, deltas) synchronously and returns a value that is only
//! ever read afterwards. The HTTP layer shares it behind an `Arc`.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use geo_protocol::{FeatureCollection, GeoQuery, Layer, MetaResponse, Metric};
use grid_common::{DateAxis, Grid, TimePartition};
use tracing::{debug, info, warn};

use crate::config::DatasetConfig;
use crate::error::{ProcessorError, SourceError};
use crate::features::{FeatureCollectionBuilder, MetricRows};
use crate::matrix::{DeltaMatrix, ValueMatrix};
use crate::source::{load_source, LoadStats, SourceOutcome};
use crate::synthetic::SyntheticModel;

/// Where the value matrix came from.
#[derive(Debug, Clone, PartialEq)]
pub enum DataOrigin {
    Synthetic,
    Tabular { path: PathBuf, stats: LoadStats },
}

/// Grid, date axis and both matrices, built once.
#[derive(Debug)]
pub struct RiskDataset {
    grid: Grid,
    grid_km: f64,
    axis: DateAxis,
    today: NaiveDate,
    partition: TimePartition,
    values: ValueMatrix,
    deltas: DeltaMatrix,
    origin: DataOrigin,
    builder: FeatureCollectionBuilder,
}

impl RiskDataset {
    /// Build the dataset described by `config`.
    ///
    /// Only configuration errors are returned. Any problem with the tabular
    /// source is logged and replaced by the synthetic model.
    pub fn build(config: &DatasetConfig) -> Result<Self, ProcessorError> {
        config.validate()?;

        let grid = Grid::from_km(config.region, config.grid_km)?;
        info!(
            rows = grid.rows(),
            cols = grid.cols(),
            cells = grid.len(),
            grid_km = config.grid_km,
            "Grid built"
        );

        let window = DateAxis::window(config.today, config.days_back, config.days_fwd)?;

        let (axis, values, origin) = match load_source(
            config.csv_path.as_deref(),
            &grid,
            config.date_axis,
            &window,
        ) {
            SourceOutcome::Loaded(loaded) => {
                info!(
                    path = %loaded.path.display(),
                    shape = %loaded.shape,
                    date_axis = %config.date_axis,
                    rows = loaded.stats.rows,
                    accepted = loaded.stats.accepted,
                    dropped = loaded.stats.dropped(),
                    "Loaded tabular source"
                );
                log_drops(&loaded.stats);
                let origin = DataOrigin::Tabular {
                    path: loaded.path,
                    stats: loaded.stats,
                };
                (loaded.axis, loaded.values, origin)
            }
            SourceOutcome::Fallback { reason } => {
                match &reason {
                    SourceError::NotConfigured => {
                        info!("No tabular source configured, using synthetic data")
                    }
                    other => warn!(reason = %other, "Tabular source unusable, using synthetic data"),
                }
                let model = SyntheticModel::new(config.region, config.days_back, config.days_fwd);
                let values = model.generate(&grid, &window);
                (window, values, DataOrigin::Synthetic)
            }
        };

        let deltas = DeltaMatrix::from_values(&values);
        let partition = axis.partition(config.today);
        info!(
            days = axis.len(),
            past = partition.past.len(),
            now = partition.now.len(),
            forecast = partition.forecast.len(),
            "Date axis ready"
        );

        let builder = FeatureCollectionBuilder::new(&grid, config.coord_decimals);

        Ok(Self {
            grid,
            grid_km: config.grid_km,
            axis,
            today: config.today,
            partition,
            values,
            deltas,
            origin,
            builder,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn axis(&self) -> &DateAxis {
        &self.axis
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn values(&self) -> &ValueMatrix {
        &self.values
    }

    pub fn deltas(&self) -> &DeltaMatrix {
        &self.deltas
    }

    pub fn origin(&self) -> &DataOrigin {
        &self.origin
    }

    /// Path of the loaded tabular source.
    pub fn csv_file(&self) -> Option<&Path> {
        match &self.origin {
            DataOrigin::Tabular { path, .. } => Some(path),
            DataOrigin::Synthetic => None,
        }
    }

    /// Human-readable description of the active source.
    pub fn data_note(&self) -> String {
        match &self.origin {
            DataOrigin::Synthetic => "synthetic demo data".to_string(),
            DataOrigin::Tabular { path, .. } => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                format!("loaded: {}", name)
            }
        }
    }

    /// Date indices served by `layer`.
    pub fn indices(&self, layer: Layer) -> &[usize] {
        match layer {
            Layer::Past => &self.partition.past,
            Layer::Now => &self.partition.now,
            Layer::Forecast => &self.partition.forecast,
            Layer::Delta => &self.partition.all,
        }
    }

    /// Render `layer` as a feature collection.
    pub fn features(&self, layer: Layer, query: &GeoQuery) -> FeatureCollection {
        let rows = match layer.metric() {
            Metric::Delta => MetricRows::Delta(&self.deltas),
            Metric::Value => MetricRows::Value(&self.values),
        };
        self.builder
            .build(&self.axis, rows, self.indices(layer), query)
    }

    pub fn meta(&self) -> MetaResponse {
        let region = self.grid.region();
        MetaResponse {
            grid_km: self.grid_km,
            lat_min: region.lat_min,
            lat_max: region.lat_max,
            lon_min: region.lon_min,
            lon_max: region.lon_max,
            rows: self.grid.rows(),
            cols: self.grid.cols(),
            today: self.today.format("%Y-%m-%d").to_string(),
            dates: self.axis.iso_strings().to_vec(),
            data_note: self.data_note(),
            csv_file: self.csv_file().map(|p| p.display().to_string()),
        }
    }
}

fn log_drops(stats: &LoadStats) {
    if stats.dropped() == 0 {
        return;
    }
    debug!(
        blank_date = stats.blank_date,
        bad_date = stats.bad_date,
        out_of_window = stats.out_of_window,
        bad_value = stats.bad_value,
        unknown_cell = stats.unknown_cell,
        bad_coordinates = stats.bad_coordinates,
        out_of_region = stats.out_of_region,
        malformed = stats.malformed,
        "Dropped records"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DateAxisMode;
    use grid_common::Region;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn small_config() -> DatasetConfig {
        let mut config = DatasetConfig::new(ymd(2024, 1, 15));
        config.region = Region::new(15.6, 18.2, 97.5, 99.4).unwrap();
        config.grid_km = 25.0;
        config.days_back = 3;
        config.days_fwd = 2;
        config
    }

    #[test]
    fn test_synthetic_dataset() {
        let ds = RiskDataset::build(&small_config()).unwrap();
        assert_eq!(ds.origin(), &DataOrigin::Synthetic);
        assert_eq!(ds.axis().len(), 6);
        assert_eq!(ds.indices(Layer::Past), &[0, 1, 2]);
        assert_eq!(ds.indices(Layer::Now), &[3]);
        assert_eq!(ds.indices(Layer::Forecast), &[4, 5]);
        assert_eq!(ds.indices(Layer::Delta).len(), 6);
        assert_eq!(ds.data_note(), "synthetic demo data");
        assert!(ds.csv_file().is_none());
    }

    #[test]
    fn test_missing_file_falls_back() {
        let mut config = small_config();
        config.csv_path = Some(PathBuf::from("/nonexistent/risk_daily.csv"));
        let ds = RiskDataset::build(&config).unwrap();
        assert_eq!(ds.origin(), &DataOrigin::Synthetic);
    }

    #[test]
    fn test_invalid_config_is_fatal() {
        let mut config = small_config();
        config.grid_km = 0.0;
        assert!(matches!(
            RiskDataset::build(&config),
            Err(ProcessorError::Config(_))
        ));
    }

    #[test]
    fn test_meta_describes_dataset() {
        let ds = RiskDataset::build(&small_config()).unwrap();
        let meta = ds.meta();
        assert_eq!(meta.rows, ds.grid().rows());
        assert_eq!(meta.today, "2024-01-15");
        assert_eq!(meta.dates.first().map(String::as_str), Some("2024-01-12"));
        assert_eq!(meta.csv_file, None);
        assert_eq!(meta.grid_km, 25.0);
    }

    #[test]
    fn test_delta_layer_uses_delta_matrix() {
        let ds = RiskDataset::build(&small_config()).unwrap();
        let q = GeoQuery {
            stride: 1,
            min_value: None,
        };
        let fc = ds.features(Layer::Delta, &q);
        assert_eq!(fc.len(), 6 * ds.grid().len());
        assert!(fc.features[..ds.grid().len()]
            .iter()
            .all(|f| f.properties.value == 0.0));
    }

    #[test]
    fn test_window_mode_axis_equals_window() {
        let mut config = small_config();
        config.date_axis = DateAxisMode::Window;
        let ds = RiskDataset::build(&config).unwrap();
        assert_eq!(ds.axis().len(), 6);
    }
}
