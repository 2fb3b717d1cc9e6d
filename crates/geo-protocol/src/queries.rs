//! Geo query parsing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::QueryError;

/// Time slice served by a geo endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    /// Dates before today, raw values.
    Past,
    /// Today, raw values.
    Now,
    /// Dates after today, raw values.
    Forecast,
    /// Every date, day-over-day deltas.
    Delta,
}

impl Layer {
    pub const ALL: [Layer; 4] = [Layer::Past, Layer::Now, Layer::Forecast, Layer::Delta];

    /// Metric rendered for this layer.
    pub fn metric(&self) -> Metric {
        match self {
            Layer::Delta => Metric::Delta,
            Layer::Past | Layer::Now | Layer::Forecast => Metric::Value,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Layer::Past => "past",
            Layer::Now => "now",
            Layer::Forecast => "forecast",
            Layer::Delta => "delta",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Layer {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Layer::ALL
            .into_iter()
            .find(|layer| layer.as_str() == s)
            .ok_or_else(|| QueryError::UnknownLayer(s.to_string()))
    }
}

/// Which matrix a feature value is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// The value matrix.
    Value,
    /// The day-over-day delta matrix.
    Delta,
}

/// Raw query string of a geo request.
///
/// Kept as strings so that malformed numbers surface as [`QueryError`]
/// rather than as an extractor rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeoQueryParams {
    /// Spatial decimation factor.
    pub stride: Option<String>,

    /// Value threshold (raw-value layers only).
    pub min: Option<String>,
}

/// Validated decimation parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoQuery {
    /// Keep cells where `row % stride == 0 && col % stride == 0`.
    pub stride: usize,
    /// Keep raw values strictly greater than this.
    pub min_value: Option<f64>,
}

impl GeoQuery {
    /// Validate raw parameters. A missing or blank `stride` falls back to
    /// `default_stride`; a missing or blank `min` disables the threshold.
    pub fn parse(params: &GeoQueryParams, default_stride: usize) -> Result<Self, QueryError> {
        let stride = match non_blank(&params.stride) {
            Some(s) => match s.parse::<usize>() {
                Ok(n) if n >= 1 => n,
                _ => return Err(QueryError::InvalidStride(s.to_string())),
            },
            None => default_stride.max(1),
        };

        let min_value = match non_blank(&params.min) {
            Some(s) => match s.parse::<f64>() {
                Ok(v) if v.is_finite() => Some(v),
                _ => return Err(QueryError::InvalidMin(s.to_string())),
            },
            None => None,
        };

        Ok(Self { stride, min_value })
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(stride: Option<&str>, min: Option<&str>) -> GeoQueryParams {
        GeoQueryParams {
            stride: stride.map(String::from),
            min: min.map(String::from),
        }
    }

    #[test]
    fn test_layer_from_str() {
        assert_eq!("past".parse::<Layer>().unwrap(), Layer::Past);
        assert_eq!("now".parse::<Layer>().unwrap(), Layer::Now);
        assert_eq!("forecast".parse::<Layer>().unwrap(), Layer::Forecast);
        assert_eq!("delta".parse::<Layer>().unwrap(), Layer::Delta);
        assert!(matches!(
            "Past".parse::<Layer>(),
            Err(QueryError::UnknownLayer(_))
        ));
    }

    #[test]
    fn test_layer_metric() {
        assert_eq!(Layer::Delta.metric(), Metric::Delta);
        assert_eq!(Layer::Now.metric(), Metric::Value);
        for layer in Layer::ALL {
            assert_eq!(layer.as_str().parse::<Layer>().unwrap(), layer);
        }
    }

    #[test]
    fn test_defaults() {
        let q = GeoQuery::parse(&params(None, None), 2).unwrap();
        assert_eq!(q.stride, 2);
        assert_eq!(q.min_value, None);

        let q = GeoQuery::parse(&params(Some(""), Some(" ")), 3).unwrap();
        assert_eq!(q.stride, 3);
        assert_eq!(q.min_value, None);
    }

    #[test]
    fn test_explicit_values() {
        let q = GeoQuery::parse(&params(Some("4"), Some("0.25")), 2).unwrap();
        assert_eq!(q.stride, 4);
        assert_eq!(q.min_value, Some(0.25));

        let q = GeoQuery::parse(&params(Some("1"), Some("-1e-3")), 2).unwrap();
        assert_eq!(q.stride, 1);
        assert_eq!(q.min_value, Some(-0.001));
    }

    #[test]
    fn test_invalid_stride() {
        for bad in ["0", "-1", "1.5", "two"] {
            assert!(matches!(
                GeoQuery::parse(&params(Some(bad), None), 2),
                Err(QueryError::InvalidStride(_))
            ));
        }
    }

    #[test]
    fn test_invalid_min() {
        for bad in ["abc", "NaN", "inf"] {
            assert!(matches!(
                GeoQuery::parse(&params(None, Some(bad)), 2),
                Err(QueryError::InvalidMin(_))
            ));
        }
    }
}
