//! Common test fixtures for risk-grid tests.
//!
//! This module provides pre-defined regions, dates and CSV headers that
//! represent the scenarios exercised across the workspace.

/// Common regions as `(lat_min, lat_max, lon_min, lon_max)`.
pub mod region {
    /// Unit square at the origin. With a 0.5 degree step this is a 2x2 grid.
    pub const UNIT: (f64, f64, f64, f64) = (0.0, 1.0, 0.0, 1.0);

    /// Tak province, Thailand.
    pub const TAK: (f64, f64, f64, f64) = (15.6, 18.2, 97.5, 99.4);

    /// Thailand (service default).
    pub const THAILAND: (f64, f64, f64, f64) = (5.6, 20.7, 97.0, 105.9);

    /// Small patch straddling the equator and the prime meridian.
    pub const EQUATOR_PATCH: (f64, f64, f64, f64) = (-0.7, 0.6, -1.3, 0.45);

    /// Inverted latitude bounds.
    pub const INVALID: (f64, f64, f64, f64) = (10.0, 5.0, 0.0, 1.0);
}

/// Common dates for testing.
pub mod dates {
    /// A fixed "today" for tests.
    pub const REFERENCE_DATE: &str = "2024-01-15";

    /// The day before [`REFERENCE_DATE`].
    pub const DAY_BEFORE: &str = "2024-01-14";

    /// The day after [`REFERENCE_DATE`].
    pub const DAY_AFTER: &str = "2024-01-16";
}

/// CSV header lines for the accepted tabular shapes.
pub mod headers {
    /// Cell-keyed records.
    pub const CELL: &str = "date,cell_id,value";

    /// Point-keyed records.
    pub const POINT: &str = "date,lat,lon,value";

    /// Point-keyed records using centroid column names.
    pub const POINT_CENTROID: &str = "date,lat_c,lon_c,value";

    /// Header matching neither shape.
    pub const UNRECOGNIZED: &str = "day,where,how_much";
}
