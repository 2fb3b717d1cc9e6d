//! Dense date × cell matrices.

/// Per-date, per-cell primary metric.
///
/// Stored row-major in a single buffer: row `t` holds every cell on the
/// date at axis index `t`. Cells without an observation read as 0.0; the
/// parallel observed mask records which entries were actually written by
/// a tabular source.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueMatrix {
    days: usize,
    cells: usize,
    values: Vec<f64>,
    observed: Vec<bool>,
}

impl ValueMatrix {
    /// All-zero matrix with nothing observed.
    pub fn zeros(days: usize, cells: usize) -> Self {
        Self {
            days,
            cells,
            values: vec![0.0; days * cells],
            observed: vec![false; days * cells],
        }
    }

    /// Matrix from fully computed rows. Every row must have `cells` entries.
    pub(crate) fn from_rows(cells: usize, rows: Vec<Vec<f64>>) -> Self {
        let days = rows.len();
        let mut values = Vec::with_capacity(days * cells);
        for row in rows {
            debug_assert_eq!(row.len(), cells);
            values.extend(row);
        }
        Self {
            days,
            cells,
            values,
            observed: vec![false; days * cells],
        }
    }

    pub fn days(&self) -> usize {
        self.days
    }

    pub fn cells(&self) -> usize {
        self.cells
    }

    /// Value at `(day, cell)`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    pub fn get(&self, day: usize, cell: usize) -> f64 {
        self.values[self.offset(day, cell)]
    }

    /// All values for one date.
    pub fn row(&self, day: usize) -> &[f64] {
        let start = day * self.cells;
        &self.values[start..start + self.cells]
    }

    /// Overwrite a single entry without touching the observed mask.
    #[cfg(test)]
    pub(crate) fn set(&mut self, day: usize, cell: usize, value: f64) {
        let i = self.offset(day, cell);
        self.values[i] = value;
    }

    /// Fold an observation into `(day, cell)`.
    ///
    /// The first observation is stored as is. Later ones are averaged with
    /// the running value, `(prev + value) / 2`, so the result depends on
    /// input order.
    pub fn record_observation(&mut self, day: usize, cell: usize, value: f64) {
        let i = self.offset(day, cell);
        if self.observed[i] {
            self.values[i] = (self.values[i] + value) / 2.0;
        } else {
            self.values[i] = value;
            self.observed[i] = true;
        }
    }

    /// Whether `(day, cell)` received at least one observation.
    pub fn is_observed(&self, day: usize, cell: usize) -> bool {
        self.observed[self.offset(day, cell)]
    }

    /// Number of entries that received an observation.
    pub fn observed_count(&self) -> usize {
        self.observed.iter().filter(|o| **o).count()
    }

    #[inline]
    fn offset(&self, day: usize, cell: usize) -> usize {
        assert!(
            day < self.days && cell < self.cells,
            "index ({}, {}) out of range for {}x{} matrix",
            day,
            cell,
            self.days,
            self.cells
        );
        day * self.cells + cell
    }
}

/// Day-over-day differences of a [`ValueMatrix`].
///
/// Row 0 is all zeros; row `t` is `values[t] - values[t - 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct DeltaMatrix {
    days: usize,
    cells: usize,
    values: Vec<f64>,
}

impl DeltaMatrix {
    pub fn from_values(values: &ValueMatrix) -> Self {
        let days = values.days();
        let cells = values.cells();
        let mut out = vec![0.0; days * cells];

        for t in 1..days {
            let prev = values.row(t - 1);
            let curr = values.row(t);
            let dst = &mut out[t * cells..(t + 1) * cells];
            for ((d, c), p) in dst.iter_mut().zip(curr).zip(prev) {
                *d = c - p;
            }
        }

        Self {
            days,
            cells,
            values: out,
        }
    }

    pub fn days(&self) -> usize {
        self.days
    }

    pub fn cells(&self) -> usize {
        self.cells
    }

    pub fn get(&self, day: usize, cell: usize) -> f64 {
        assert!(day < self.days && cell < self.cells);
        self.values[day * self.cells + cell]
    }

    pub fn row(&self, day: usize) -> &[f64] {
        let start = day * self.cells;
        &self.values[start..start + self.cells]
    }
}
