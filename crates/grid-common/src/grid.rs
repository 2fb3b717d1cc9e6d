//! Regular lat/lon grid over a [`Region`].
//!
//! The grid is built once from a region and a target side length in
//! kilometres and never changes afterwards. Cells are stored row-major
//! (row 0 at `lat_min`, column 0 at `lon_min`), which is also the canonical
//! iteration order for every consumer of the grid.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{GridError, GridResult};
use crate::region::Region;

/// Kilometres per degree of latitude.
pub const KM_PER_DEG_LAT: f64 = 110.574;

/// Kilometres per degree of longitude at the equator.
pub const KM_PER_DEG_LON: f64 = 111.320;

/// Tolerance keeping float drift from producing a sliver row/column at the
/// upper edge.
const EDGE_EPSILON: f64 = 1e-12;

/// Upper bound on rows or columns along a single axis.
const MAX_AXIS_CELLS: f64 = 100_000.0;

/// A rectangular sub-region of the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridCell {
    /// Stable identifier derived from row and column (`r{row}c{col}`).
    pub id: String,
    pub row: usize,
    pub col: usize,
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
    /// Centroid latitude.
    pub lat_c: f64,
    /// Centroid longitude.
    pub lon_c: f64,
}

/// Build the identifier for a cell at `(row, col)`.
pub fn cell_id(row: usize, col: usize) -> String {
    format!("r{}c{}", row, col)
}

/// An immutable row-major partition of a region into cells.
#[derive(Debug, Clone)]
pub struct Grid {
    region: Region,
    lat_step: f64,
    lon_step: f64,
    rows: usize,
    cols: usize,
    cells: Vec<GridCell>,
    index_by_id: HashMap<String, usize>,
}

impl Grid {
    /// Build a grid whose cells are approximately `grid_km` on a side.
    ///
    /// Latitude step uses [`KM_PER_DEG_LAT`]; longitude step uses
    /// [`KM_PER_DEG_LON`] scaled by the cosine of the region's mid-latitude
    /// (equirectangular approximation).
    pub fn from_km(region: Region, grid_km: f64) -> GridResult<Self> {
        if !grid_km.is_finite() || grid_km <= 0.0 {
            return Err(GridError::InvalidStep(format!(
                "grid size must be a positive number of km, got {}",
                grid_km
            )));
        }

        let km_per_deg_lon = KM_PER_DEG_LON * region.mid_lat().to_radians().cos();
        if km_per_deg_lon <= 0.0 {
            return Err(GridError::InvalidStep(format!(
                "longitude step is undefined at mid-latitude {}",
                region.mid_lat()
            )));
        }

        Self::with_steps(region, grid_km / KM_PER_DEG_LAT, grid_km / km_per_deg_lon)
    }

    /// Build a grid from explicit degree steps.
    pub fn with_steps(region: Region, lat_step: f64, lon_step: f64) -> GridResult<Self> {
        for (name, step, span) in [
            ("latitude", lat_step, region.lat_span()),
            ("longitude", lon_step, region.lon_span()),
        ] {
            if !step.is_finite() || step <= 0.0 {
                return Err(GridError::InvalidStep(format!(
                    "{} step must be positive, got {}",
                    name, step
                )));
            }
            if span / step > MAX_AXIS_CELLS {
                return Err(GridError::InvalidStep(format!(
                    "{} step {} yields more than {} cells",
                    name, step, MAX_AXIS_CELLS
                )));
            }
        }

        let rows = axis_len(region.lat_min, region.lat_max, lat_step);
        let cols = axis_len(region.lon_min, region.lon_max, lon_step);

        let mut cells = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            let lat_lo = region.lat_min + row as f64 * lat_step;
            let lat_hi = upper_edge(region.lat_min, region.lat_max, lat_step, row, rows);

            for col in 0..cols {
                let lon_lo = region.lon_min + col as f64 * lon_step;
                let lon_hi = upper_edge(region.lon_min, region.lon_max, lon_step, col, cols);

                cells.push(GridCell {
                    id: cell_id(row, col),
                    row,
                    col,
                    lat_min: lat_lo,
                    lat_max: lat_hi,
                    lon_min: lon_lo,
                    lon_max: lon_hi,
                    lat_c: (lat_lo + lat_hi) / 2.0,
                    lon_c: (lon_lo + lon_hi) / 2.0,
                });
            }
        }

        let index_by_id = cells
            .iter()
            .enumerate()
            .map(|(i, c)| (c.id.clone(), i))
            .collect();

        Ok(Self {
            region,
            lat_step,
            lon_step,
            rows,
            cols,
            cells,
            index_by_id,
        })
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    pub fn lat_step(&self) -> f64 {
        self.lat_step
    }

    pub fn lon_step(&self) -> f64 {
        self.lon_step
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if grid is empty.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Position of a cell id in the row-major cell list.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    /// Look up a cell by id.
    pub fn cell(&self, id: &str) -> Option<&GridCell> {
        self.index_of(id).map(|i| &self.cells[i])
    }

    /// Map a point to the index of the cell containing it.
    ///
    /// Points outside the region (inclusive bounds) yield `None`. Row and
    /// column are clamped to the grid so that points on the upper boundary
    /// land in the last row/column. A point on a shared edge belongs to the
    /// cell above or to the right of it.
    pub fn bin_index(&self, lat: f64, lon: f64) -> Option<usize> {
        if !self.region.contains_point(lat, lon) || self.is_empty() {
            return None;
        }

        let row = ((lat - self.region.lat_min) / self.lat_step).floor() as usize;
        let col = ((lon - self.region.lon_min) / self.lon_step).floor() as usize;

        // The division can land one slot off the stored edges; settle
        // against the cells themselves.
        let cols = self.cols;
        let row = settle(row.min(self.rows - 1), lat, self.rows, |r| {
            let c = &self.cells[r * cols];
            (c.lat_min, c.lat_max)
        });
        let col = settle(col.min(cols - 1), lon, cols, |c| {
            (self.cells[c].lon_min, self.cells[c].lon_max)
        });

        Some(row * cols + col)
    }

    /// Map a point to the id of the cell containing it.
    pub fn bin_point(&self, lat: f64, lon: f64) -> Option<&str> {
        self.bin_index(lat, lon).map(|i| self.cells[i].id.as_str())
    }
}

/// Move slot `i` until `value` falls within `[lo, hi)` of its edges, or
/// the first/last slot is reached.
fn settle(mut i: usize, value: f64, n: usize, edges: impl Fn(usize) -> (f64, f64)) -> usize {
    while i > 0 && value < edges(i).0 {
        i -= 1;
    }
    while i + 1 < n && value >= edges(i).1 {
        i += 1;
    }
    i
}

/// Upper edge of slot `i`. The last slot always ends on `max`, so the grid
/// covers the region even when the final start fell within the epsilon.
fn upper_edge(min: f64, max: f64, step: f64, i: usize, n: usize) -> f64 {
    if i + 1 == n {
        max
    } else {
        (min + (i + 1) as f64 * step).min(max)
    }
}

/// Number of steps from `min` before the next start would reach `max`.
fn axis_len(min: f64, max: f64, step: f64) -> usize {
    let mut n = 0usize;
    while min + n as f64 * step < max - EDGE_EPSILON {
        n += 1;
    }
    n
}
