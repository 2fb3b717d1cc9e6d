//! Date axis handling.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{GridError, GridResult};

/// Largest window accepted on either side of "today".
const MAX_WINDOW_DAYS: u32 = 3660;

/// Parse an ISO-8601 calendar date (`YYYY-MM-DD`).
pub fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// Ordered, duplicate-free sequence of calendar dates.
///
/// The ISO-8601 rendering of each date is computed once, since every
/// feature emitted for a date carries it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateAxis {
    dates: Vec<NaiveDate>,
    iso: Vec<String>,
}

impl DateAxis {
    /// Gap-free axis spanning `[today - days_back, today + days_fwd]`.
    pub fn window(today: NaiveDate, days_back: u32, days_fwd: u32) -> GridResult<Self> {
        if days_back > MAX_WINDOW_DAYS || days_fwd > MAX_WINDOW_DAYS {
            return Err(GridError::InvalidWindow(format!(
                "days_back={} days_fwd={} exceeds {} days",
                days_back, days_fwd, MAX_WINDOW_DAYS
            )));
        }

        let start = today
            .checked_sub_signed(Duration::days(days_back as i64))
            .ok_or_else(|| GridError::InvalidWindow(format!("{} - {} days", today, days_back)))?;

        let mut dates = Vec::with_capacity((days_back + days_fwd + 1) as usize);
        for offset in 0..=(days_back + days_fwd) as i64 {
            let date = start
                .checked_add_signed(Duration::days(offset))
                .ok_or_else(|| {
                    GridError::InvalidWindow(format!("{} + {} days", start, offset))
                })?;
            dates.push(date);
        }

        Ok(Self::from_sorted(dates))
    }

    /// Axis made of the distinct dates in `dates`, sorted ascending.
    pub fn from_dates(dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        let mut dates: Vec<NaiveDate> = dates.into_iter().collect();
        dates.sort_unstable();
        dates.dedup();
        Self::from_sorted(dates)
    }

    fn from_sorted(dates: Vec<NaiveDate>) -> Self {
        let iso = dates.iter().map(|d| d.format("%Y-%m-%d").to_string()).collect();
        Self { dates, iso }
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// ISO-8601 strings for every date, in axis order.
    pub fn iso_strings(&self) -> &[String] {
        &self.iso
    }

    /// ISO-8601 string for the date at `index`.
    pub fn iso(&self, index: usize) -> Option<&str> {
        self.iso.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Position of `date` on the axis.
    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        self.dates.binary_search(&date).ok()
    }

    /// Split axis indices around `today`.
    pub fn partition(&self, today: NaiveDate) -> TimePartition {
        let mut partition = TimePartition::default();
        for (i, date) in self.dates.iter().enumerate() {
            match date.cmp(&today) {
                std::cmp::Ordering::Less => partition.past.push(i),
                std::cmp::Ordering::Equal => partition.now.push(i),
                std::cmp::Ordering::Greater => partition.forecast.push(i),
            }
        }
        partition.all = (0..self.dates.len()).collect();
        partition
    }
}

/// Axis indices grouped relative to "today".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimePartition {
    /// Dates before today.
    pub past: Vec<usize>,
    /// Dates equal to today.
    pub now: Vec<usize>,
    /// Dates after today.
    pub forecast: Vec<usize>,
    /// Every index on the axis.
    pub all: Vec<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_window_is_gap_free() {
        let axis = DateAxis::window(ymd(2024, 3, 1), 2, 3).unwrap();
        assert_eq!(axis.len(), 6);
        assert_eq!(
            axis.iso_strings(),
            &["2024-02-28", "2024-02-29", "2024-03-01", "2024-03-02", "2024-03-03", "2024-03-04"]
        );
        for pair in axis.dates().windows(2) {
            assert_eq!(pair[1] - pair[0], Duration::days(1));
        }
    }

    #[test]
    fn test_window_zero_width() {
        let axis = DateAxis::window(ymd(2024, 1, 1), 0, 0).unwrap();
        assert_eq!(axis.iso_strings(), &["2024-01-01"]);
    }

    #[test]
    fn test_window_too_large() {
        assert!(matches!(
            DateAxis::window(ymd(2024, 1, 1), 100_000, 0),
            Err(GridError::InvalidWindow(_))
        ));
    }

    #[test]
    fn test_from_dates_sorts_and_dedups() {
        let axis = DateAxis::from_dates(vec![
            ymd(2024, 1, 3),
            ymd(2024, 1, 1),
            ymd(2024, 1, 3),
            ymd(2023, 12, 31),
        ]);
        assert_eq!(
            axis.iso_strings(),
            &["2023-12-31", "2024-01-01", "2024-01-03"]
        );
        assert_eq!(axis.index_of(ymd(2024, 1, 3)), Some(2));
        assert_eq!(axis.index_of(ymd(2024, 1, 2)), None);
    }

    #[test]
    fn test_partition_around_today() {
        let axis = DateAxis::window(ymd(2024, 5, 10), 2, 1).unwrap();
        let partition = axis.partition(ymd(2024, 5, 10));
        assert_eq!(partition.past, vec![0, 1]);
        assert_eq!(partition.now, vec![2]);
        assert_eq!(partition.forecast, vec![3]);
        assert_eq!(partition.all, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_partition_without_today() {
        let axis = DateAxis::from_dates(vec![ymd(2020, 1, 1), ymd(2020, 1, 5)]);
        let partition = axis.partition(ymd(2024, 5, 10));
        assert_eq!(partition.past, vec![0, 1]);
        assert!(partition.now.is_empty());
        assert!(partition.forecast.is_empty());
    }

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(parse_iso_date("2024-01-01"), Some(ymd(2024, 1, 1)));
        assert_eq!(parse_iso_date(" 2024-01-01 "), Some(ymd(2024, 1, 1)));
        assert_eq!(parse_iso_date("2024-13-01"), None);
        assert_eq!(parse_iso_date("01/01/2024"), None);
        assert_eq!(parse_iso_date(""), None);
    }
}
