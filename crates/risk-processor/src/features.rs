//! Feature-collection rendering.

use geo_protocol::{CellFeature, CellProperties, FeatureCollection, GeoQuery, Metric};
use grid_common::{DateAxis, Grid, GridCell};

use crate::matrix::{DeltaMatrix, ValueMatrix};

/// Decimal places kept on emitted metric values.
pub const VALUE_DECIMALS: u32 = 4;

/// Round `x` to `decimals` places. Negative zero is normalized to zero.
pub fn round_to(x: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    let r = (x * scale).round() / scale;
    if r == 0.0 {
        0.0
    } else {
        r
    }
}

/// Closed exterior ring of a cell in `[lon, lat]` order, counter-clockwise
/// from the south-west corner.
pub fn cell_ring(cell: &GridCell, decimals: u32) -> Vec<[f64; 2]> {
    let (w, e) = (round_to(cell.lon_min, decimals), round_to(cell.lon_max, decimals));
    let (s, n) = (round_to(cell.lat_min, decimals), round_to(cell.lat_max, decimals));
    vec![[w, s], [e, s], [e, n], [w, n], [w, s]]
}

/// Matrix a collection reads its values from.
#[derive(Debug, Clone, Copy)]
pub enum MetricRows<'a> {
    Value(&'a ValueMatrix),
    Delta(&'a DeltaMatrix),
}

impl MetricRows<'_> {
    pub fn metric(&self) -> Metric {
        match self {
            MetricRows::Value(_) => Metric::Value,
            MetricRows::Delta(_) => Metric::Delta,
        }
    }

    fn days(&self) -> usize {
        match self {
            MetricRows::Value(m) => m.days(),
            MetricRows::Delta(m) => m.days(),
        }
    }

    fn row(&self, day: usize) -> &[f64] {
        match self {
            MetricRows::Value(m) => m.row(day),
            MetricRows::Delta(m) => m.row(day),
        }
    }
}

/// Cell geometry rounded once, reused for every date.
#[derive(Debug, Clone)]
struct CellShape {
    id: String,
    row: usize,
    col: usize,
    ring: Vec<[f64; 2]>,
    center_lat: f64,
    center_lon: f64,
}

/// Renders (date, cell, metric) triples as GeoJSON polygons.
///
/// Features are emitted with the supplied date indices as the outer loop
/// and the grid's row-major cell order as the inner loop.
#[derive(Debug, Clone)]
pub struct FeatureCollectionBuilder {
    shapes: Vec<CellShape>,
}

impl FeatureCollectionBuilder {
    pub fn new(grid: &Grid, coord_decimals: u32) -> Self {
        let shapes = grid
            .cells()
            .iter()
            .map(|cell| CellShape {
                id: cell.id.clone(),
                row: cell.row,
                col: cell.col,
                ring: cell_ring(cell, coord_decimals),
                center_lat: round_to(cell.lat_c, coord_decimals),
                center_lon: round_to(cell.lon_c, coord_decimals),
            })
            .collect();
        Self { shapes }
    }

    /// Build a collection for `date_indices`.
    ///
    /// A cell is kept when both its row and column are multiples of
    /// `query.stride`. For the raw-value metric, `query.min_value` further
    /// keeps only values strictly above it; deltas are never thresholded.
    /// Indices past the end of the axis are ignored.
    pub fn build(
        &self,
        axis: &DateAxis,
        rows: MetricRows<'_>,
        date_indices: &[usize],
        query: &GeoQuery,
    ) -> FeatureCollection {
        let stride = query.stride.max(1);
        let min = match rows.metric() {
            Metric::Value => query.min_value,
            Metric::Delta => None,
        };

        let kept: Vec<(usize, &CellShape)> = self
            .shapes
            .iter()
            .enumerate()
            .filter(|(_, s)| s.row % stride == 0 && s.col % stride == 0)
            .collect();

        let mut fc = FeatureCollection::with_capacity(date_indices.len() * kept.len());

        for &day in date_indices {
            if day >= rows.days() {
                continue;
            }
            let Some(time) = axis.iso(day) else {
                continue;
            };
            let values = rows.row(day);

            for &(j, shape) in &kept {
                let value = values[j];
                if matches!(min, Some(m) if value <= m) {
                    continue;
                }

                let properties = CellProperties {
                    time: time.to_string(),
                    cell_id: shape.id.clone(),
                    row: shape.row,
                    col: shape.col,
                    center_lat: shape.center_lat,
                    center_lon: shape.center_lon,
                    value: round_to(value, VALUE_DECIMALS),
                };
                fc.features
                    .push(CellFeature::polygon(shape.ring.clone(), properties));
            }
        }

        fc
    }
}
