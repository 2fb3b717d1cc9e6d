//! Tabular data source.
//!
//! Reads daily observations from a CSV file (optionally gzip-compressed)
//! in one of two shapes:
//!
//! - cell-keyed: `date, cell_id, value`
//! - point-keyed: `date, lat, lon, value` (or `lat_c, lon_c`)
//!
//! Individual bad records are dropped and counted in [`LoadStats`]. Problems
//! that make the whole file unusable are reported as a
//! [`SourceOutcome::Fallback`] so the caller can switch to the synthetic
//! model without any error escaping initialization.

use std::collections::BTreeSet;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use flate2::read::GzDecoder;
use grid_common::time::parse_iso_date;
use grid_common::{DateAxis, Grid};

use crate::config::DateAxisMode;
use crate::error::SourceError;
use crate::matrix::ValueMatrix;

/// Leading bytes of a gzip stream.
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Open `path` for reading, transparently decompressing gzip input.
///
/// A file is treated as gzip when its name ends in `.gz` or when it starts
/// with the gzip magic bytes.
pub fn open_maybe_gzip(path: &Path) -> Result<Box<dyn Read>, SourceError> {
    let mut file = File::open(path)?;

    let by_name = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("gz"))
        .unwrap_or(false);

    let mut magic = [0u8; 2];
    let read = read_prefix(&mut file, &mut magic)?;
    let prefix = magic[..read].to_vec();
    let by_magic = read == 2 && magic == GZIP_MAGIC;

    // Put the sniffed bytes back in front of the rest of the file
    let stream = BufReader::new(std::io::Cursor::new(prefix).chain(file));

    if by_name || by_magic {
        Ok(Box::new(GzDecoder::new(stream)))
    } else {
        Ok(Box::new(stream))
    }
}

fn read_prefix(file: &mut File, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match file.read(&mut buf[filled..])? {
            0 => break,
            n => filled += n,
        }
    }
    Ok(filled)
}

/// Which of the accepted record shapes a file uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordShape {
    /// `date, cell_id, value`
    Cell,
    /// `date, lat, lon, value` or `date, lat_c, lon_c, value`
    Point,
}

impl fmt::Display for RecordShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordShape::Cell => f.write_str("cell-keyed"),
            RecordShape::Point => f.write_str("point-keyed"),
        }
    }
}

/// Column positions resolved from the header row.
#[derive(Debug, Clone, Copy)]
struct Columns {
    date: usize,
    value: usize,
    key: KeyColumns,
}

#[derive(Debug, Clone, Copy)]
enum KeyColumns {
    Cell(usize),
    Point {
        lat: Option<usize>,
        lon: Option<usize>,
        lat_c: Option<usize>,
        lon_c: Option<usize>,
    },
}

impl Columns {
    /// Match normalized header names against the accepted shapes.
    /// Cell-keyed wins when both match.
    fn from_headers(headers: &StringRecord) -> Option<Self> {
        let names: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();
        let find = |name: &str| names.iter().position(|n| n == name);

        let date = find("date")?;
        let value = find("value")?;

        if let Some(cell) = find("cell_id") {
            return Some(Self {
                date,
                value,
                key: KeyColumns::Cell(cell),
            });
        }

        let (lat, lon, lat_c, lon_c) = (find("lat"), find("lon"), find("lat_c"), find("lon_c"));
        let plain = lat.is_some() && lon.is_some();
        let centroid = lat_c.is_some() && lon_c.is_some();
        if plain || centroid {
            return Some(Self {
                date,
                value,
                key: KeyColumns::Point {
                    lat,
                    lon,
                    lat_c,
                    lon_c,
                },
            });
        }

        None
    }

    fn shape(&self) -> RecordShape {
        match self.key {
            KeyColumns::Cell(_) => RecordShape::Cell,
            KeyColumns::Point { .. } => RecordShape::Point,
        }
    }
}

/// Per-reason record counts from one load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Data rows seen (header excluded).
    pub rows: usize,
    /// Rows folded into the value matrix.
    pub accepted: usize,
    pub blank_date: usize,
    pub bad_date: usize,
    pub out_of_window: usize,
    pub bad_value: usize,
    pub unknown_cell: usize,
    pub bad_coordinates: usize,
    pub out_of_region: usize,
    /// Rows the CSV reader could not decode.
    pub malformed: usize,
}

impl LoadStats {
    /// Total number of rows dropped for any reason.
    pub fn dropped(&self) -> usize {
        self.blank_date
            + self.bad_date
            + self.out_of_window
            + self.bad_value
            + self.unknown_cell
            + self.bad_coordinates
            + self.out_of_region
            + self.malformed
    }
}

/// A record resolved to a grid cell. Only lives until the matrix is built.
#[derive(Debug, Clone, Copy)]
struct Observation {
    date: NaiveDate,
    cell: usize,
    value: f64,
}

/// Parsed contents of a tabular source.
#[derive(Debug)]
pub struct TabularData {
    pub shape: RecordShape,
    /// Every parseable date seen, whether or not its row was kept.
    pub dates: BTreeSet<NaiveDate>,
    pub stats: LoadStats,
    observations: Vec<Observation>,
}

impl TabularData {
    /// Fold observations into a matrix over `axis`, in file order.
    ///
    /// Observations whose date is not on the axis are skipped.
    pub fn into_matrix(self, axis: &DateAxis, cells: usize) -> ValueMatrix {
        let mut matrix = ValueMatrix::zeros(axis.len(), cells);
        for obs in self.observations {
            if let Some(day) = axis.index_of(obs.date) {
                matrix.record_observation(day, obs.cell, obs.value);
            }
        }
        matrix
    }
}

/// Read records from `reader`, resolving each to a cell of `grid`.
///
/// With `window` set, rows dated outside it are dropped. Fails only when
/// the header is unusable or the underlying stream breaks.
pub fn read_records<R: Read>(
    reader: R,
    grid: &Grid,
    window: Option<&DateAxis>,
) -> Result<TabularData, SourceError> {
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let columns = Columns::from_headers(&headers).ok_or_else(|| {
        SourceError::UnrecognizedHeader(headers.iter().collect::<Vec<_>>().join(","))
    })?;

    let mut data = TabularData {
        shape: columns.shape(),
        dates: BTreeSet::new(),
        stats: LoadStats::default(),
        observations: Vec::new(),
    };

    let mut record = StringRecord::new();
    loop {
        match rdr.read_record(&mut record) {
            Ok(true) => {}
            Ok(false) => break,
            Err(err) if err.is_io_error() => return Err(err.into()),
            Err(_) => {
                data.stats.rows += 1;
                data.stats.malformed += 1;
                continue;
            }
        }
        data.stats.rows += 1;

        match resolve_record(&record, &columns, grid, window, &mut data.dates) {
            Ok(obs) => {
                data.stats.accepted += 1;
                data.observations.push(obs);
            }
            Err(reason) => reason.count(&mut data.stats),
        }
    }

    Ok(data)
}

/// Why a single row was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejection {
    BlankDate,
    BadDate,
    OutOfWindow,
    BadValue,
    UnknownCell,
    BadCoordinates,
    OutOfRegion,
}

impl Rejection {
    fn count(self, stats: &mut LoadStats) {
        let counter = match self {
            Rejection::BlankDate => &mut stats.blank_date,
            Rejection::BadDate => &mut stats.bad_date,
            Rejection::OutOfWindow => &mut stats.out_of_window,
            Rejection::BadValue => &mut stats.bad_value,
            Rejection::UnknownCell => &mut stats.unknown_cell,
            Rejection::BadCoordinates => &mut stats.bad_coordinates,
            Rejection::OutOfRegion => &mut stats.out_of_region,
        };
        *counter += 1;
    }
}

fn resolve_record(
    record: &StringRecord,
    columns: &Columns,
    grid: &Grid,
    window: Option<&DateAxis>,
    dates: &mut BTreeSet<NaiveDate>,
) -> Result<Observation, Rejection> {
    let raw_date = field(record, Some(columns.date)).ok_or(Rejection::BlankDate)?;
    let date = parse_iso_date(raw_date).ok_or(Rejection::BadDate)?;

    match window {
        Some(axis) if axis.index_of(date).is_none() => return Err(Rejection::OutOfWindow),
        _ => {}
    }
    dates.insert(date);

    let value = field(record, Some(columns.value))
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .ok_or(Rejection::BadValue)?;

    let cell = match columns.key {
        KeyColumns::Cell(col) => field(record, Some(col))
            .and_then(|id| grid.index_of(id))
            .ok_or(Rejection::UnknownCell)?,
        KeyColumns::Point {
            lat,
            lon,
            lat_c,
            lon_c,
        } => {
            let lat = coordinate(record, lat, lat_c).ok_or(Rejection::BadCoordinates)?;
            let lon = coordinate(record, lon, lon_c).ok_or(Rejection::BadCoordinates)?;
            grid.bin_index(lat, lon).ok_or(Rejection::OutOfRegion)?
        }
    };

    Ok(Observation { date, cell, value })
}

/// Non-empty field at `index`.
fn field(record: &StringRecord, index: Option<usize>) -> Option<&str> {
    index
        .and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Primary coordinate column, falling back to the centroid column when
/// the primary one is absent or empty.
fn coordinate(record: &StringRecord, primary: Option<usize>, alias: Option<usize>) -> Option<f64> {
    field(record, primary)
        .or_else(|| field(record, alias))
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// A successfully loaded tabular source.
#[derive(Debug)]
pub struct LoadedSource {
    pub path: PathBuf,
    pub shape: RecordShape,
    pub axis: DateAxis,
    pub values: ValueMatrix,
    pub stats: LoadStats,
}

/// Result of trying the tabular source.
#[derive(Debug)]
pub enum SourceOutcome {
    /// The file was read and produced a value matrix.
    Loaded(LoadedSource),
    /// The file is missing or unusable; the synthetic model should be used.
    Fallback { reason: SourceError },
}

/// Try to build a value matrix from the tabular source at `path`.
///
/// In [`DateAxisMode::Source`] the axis is the set of dates found in the
/// file, and a file without any date is abandoned. In
/// [`DateAxisMode::Window`] the axis is `window` itself.
pub fn load_source(
    path: Option<&Path>,
    grid: &Grid,
    mode: DateAxisMode,
    window: &DateAxis,
) -> SourceOutcome {
    match try_load(path, grid, mode, window) {
        Ok(loaded) => SourceOutcome::Loaded(loaded),
        Err(reason) => SourceOutcome::Fallback { reason },
    }
}

fn try_load(
    path: Option<&Path>,
    grid: &Grid,
    mode: DateAxisMode,
    window: &DateAxis,
) -> Result<LoadedSource, SourceError> {
    let path = path.ok_or(SourceError::NotConfigured)?;
    if !path.is_file() {
        return Err(SourceError::NotFound(path.display().to_string()));
    }

    let reader = open_maybe_gzip(path)?;
    let restrict = match mode {
        DateAxisMode::Source => None,
        DateAxisMode::Window => Some(window),
    };
    let data = read_records(reader, grid, restrict)?;

    let axis = match mode {
        DateAxisMode::Source => {
            if data.dates.is_empty() {
                return Err(SourceError::NoDates);
            }
            DateAxis::from_dates(data.dates.iter().copied())
        }
        DateAxisMode::Window => window.clone(),
    };

    let shape = data.shape;
    let stats = data.stats.clone();
    let values = data.into_matrix(&axis, grid.len());

    Ok(LoadedSource {
        path: path.to_path_buf(),
        shape,
        axis,
        values,
        stats,
    })
}
