//! Deterministic synthetic risk model.
//!
//! Used whenever no tabular source is available. Values combine a fixed
//! spatial field, a temporal bump centred on "today" and a per-cell,
//! per-day noise term derived from a string hash, so repeated runs with
//! the same configuration produce identical matrices.

use grid_common::{DateAxis, Grid, Region};

use crate::matrix::ValueMatrix;

/// FNV-1a 32-bit offset basis.
const FNV_OFFSET_BASIS: u32 = 2_166_136_261;

/// FNV-1a 32-bit prime.
const FNV_PRIME: u32 = 16_777_619;

/// Half-width of the noise range.
const NOISE_AMPLITUDE: f64 = 0.05;

/// A Gaussian hotspot in degree space.
#[derive(Debug, Clone, Copy)]
struct Hotspot {
    lat: f64,
    lon: f64,
    spread: f64,
    weight: f64,
}

impl Hotspot {
    fn eval(&self, lat: f64, lon: f64) -> f64 {
        let dlat = lat - self.lat;
        let dlon = lon - self.lon;
        self.weight * (-(dlat * dlat + dlon * dlon) / (2.0 * self.spread * self.spread)).exp()
    }
}

const HOTSPOTS: [Hotspot; 2] = [
    Hotspot {
        lat: 16.7,
        lon: 98.6,
        spread: 0.25,
        weight: 0.6,
    },
    Hotspot {
        lat: 17.2,
        lon: 98.35,
        spread: 0.20,
        weight: 0.4,
    },
];

/// Weight of the west-to-east gradient.
const GRADIENT_WEIGHT: f64 = 0.15;

/// Deterministic noise in `[-0.05, 0.05]` for `seed`.
///
/// FNV-1a over the characters of `seed`, scaled from the full `u32` range.
pub fn stable_noise(seed: &str) -> f64 {
    let mut h = FNV_OFFSET_BASIS;
    for ch in seed.chars() {
        h ^= ch as u32;
        h = h.wrapping_mul(FNV_PRIME);
    }
    (h as f64 / u32::MAX as f64 - 0.5) * (2.0 * NOISE_AMPLITUDE)
}

/// Synthetic value model over a region and a date window.
#[derive(Debug, Clone, Copy)]
pub struct SyntheticModel {
    region: Region,
    days_back: u32,
    days_fwd: u32,
}

impl SyntheticModel {
    pub fn new(region: Region, days_back: u32, days_fwd: u32) -> Self {
        Self {
            region,
            days_back,
            days_fwd,
        }
    }

    /// Two weighted hotspots plus a gradient falling from west to east.
    pub fn spatial_risk(&self, lat: f64, lon: f64) -> f64 {
        let bumps: f64 = HOTSPOTS.iter().map(|h| h.eval(lat, lon)).sum();
        let gradient =
            GRADIENT_WEIGHT * (1.0 - (lon - self.region.lon_min) / self.region.lon_span());
        bumps + gradient
    }

    /// Bump centred on day index `days_back` plus a slow oscillation.
    pub fn temporal_factor(&self, day_index: usize) -> f64 {
        let width = self.days_back.max(self.days_fwd).max(1) as f64;
        let x = (day_index as f64 - self.days_back as f64) / width;
        1.0 + 0.25 * (-1.5 * x * x).exp() + 0.05 * (day_index as f64 / 2.3).sin()
    }

    /// Value of one cell on one day, clamped at zero.
    pub fn value(&self, spatial: f64, day_index: usize, cell_id: &str) -> f64 {
        let noise = stable_noise(&format!("{}@{}", cell_id, day_index));
        (2.0 * spatial * self.temporal_factor(day_index) + noise).max(0.0)
    }

    /// Evaluate the model for every cell on every date of `axis`.
    pub fn generate(&self, grid: &Grid, axis: &DateAxis) -> ValueMatrix {
        let spatial: Vec<f64> = grid
            .cells()
            .iter()
            .map(|c| self.spatial_risk(c.lat_c, c.lon_c))
            .collect();

        let rows = (0..axis.len())
            .map(|day| {
                grid.cells()
                    .iter()
                    .zip(&spatial)
                    .map(|(cell, s)| self.value(*s, day, &cell.id))
                    .collect()
            })
            .collect();

        ValueMatrix::from_rows(grid.len(), rows)
    }
}
