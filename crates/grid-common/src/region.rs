//! Geographic bounding region.

use serde::{Deserialize, Serialize};

use crate::error::{GridError, GridResult};

/// A lat/lon bounding box in degrees.
///
/// Constructed through [`Region::new`], which rejects inverted or
/// non-finite bounds, so every `Region` in circulation satisfies
/// `lat_min < lat_max` and `lon_min < lon_max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl Region {
    /// Create a validated region from its four bounds.
    pub fn new(lat_min: f64, lat_max: f64, lon_min: f64, lon_max: f64) -> GridResult<Self> {
        if ![lat_min, lat_max, lon_min, lon_max]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err(GridError::InvalidRegion(format!(
                "bounds must be finite (lat {}..{}, lon {}..{})",
                lat_min, lat_max, lon_min, lon_max
            )));
        }
        if lat_min >= lat_max {
            return Err(GridError::InvalidRegion(format!(
                "lat_min {} must be less than lat_max {}",
                lat_min, lat_max
            )));
        }
        if lon_min >= lon_max {
            return Err(GridError::InvalidRegion(format!(
                "lon_min {} must be less than lon_max {}",
                lon_min, lon_max
            )));
        }

        Ok(Self {
            lat_min,
            lat_max,
            lon_min,
            lon_max,
        })
    }

    /// Latitude extent in degrees.
    pub fn lat_span(&self) -> f64 {
        self.lat_max - self.lat_min
    }

    /// Longitude extent in degrees.
    pub fn lon_span(&self) -> f64 {
        self.lon_max - self.lon_min
    }

    /// Latitude halfway between the southern and northern edge.
    pub fn mid_lat(&self) -> f64 {
        (self.lat_min + self.lat_max) / 2.0
    }

    /// Check if a point lies within the region. Bounds are inclusive.
    pub fn contains_point(&self, lat: f64, lon: f64) -> bool {
        lat >= self.lat_min && lat <= self.lat_max && lon >= self.lon_min && lon <= self.lon_max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_valid() {
        let region = Region::new(15.6, 18.2, 97.5, 99.4).unwrap();
        assert_eq!(region.lat_min, 15.6);
        assert_eq!(region.lon_max, 99.4);
        assert!((region.mid_lat() - 16.9).abs() < 1e-12);
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        assert!(matches!(
            Region::new(1.0, 0.0, 0.0, 1.0),
            Err(GridError::InvalidRegion(_))
        ));
        assert!(matches!(
            Region::new(0.0, 1.0, 1.0, 1.0),
            Err(GridError::InvalidRegion(_))
        ));
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(Region::new(f64::NAN, 1.0, 0.0, 1.0).is_err());
        assert!(Region::new(0.0, f64::INFINITY, 0.0, 1.0).is_err());
    }

    #[test]
    fn test_contains_point_inclusive() {
        let region = Region::new(0.0, 1.0, 0.0, 1.0).unwrap();
        assert!(region.contains_point(0.0, 0.0));
        assert!(region.contains_point(1.0, 1.0));
        assert!(region.contains_point(0.5, 0.25));
        assert!(!region.contains_point(1.5, 1.5));
        assert!(!region.contains_point(-0.0001, 0.5));
    }
}
