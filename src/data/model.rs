use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};

use super::loader::RawTable;
use super::timestamp::parse_timestamp;
use crate::error::DataError;

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

pub const COL_DATETIME: &str = "datetime";
pub const COL_LATITUDE: &str = "latitude";
pub const COL_LONGITUDE: &str = "longitude";
pub const COL_MAGNITUDE: &str = "magnitude";
pub const COL_DEPTH: &str = "depth_km";
pub const COL_REGION: &str = "region";

// ---------------------------------------------------------------------------
// NumericRange – inclusive [low, high]
// ---------------------------------------------------------------------------

/// Closed numeric interval. The constructor orders its bounds so `low <= high`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericRange {
    pub low: f64,
    pub high: f64,
}

impl NumericRange {
    pub fn new(a: f64, b: f64) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    /// Inclusive on both ends. NaN is never contained.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value <= self.high
    }
}

// ---------------------------------------------------------------------------
// DateRange – whole calendar days [start, end]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(a: NaiveDate, b: NaiveDate) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }
}

// ---------------------------------------------------------------------------
// Event – one row of the catalogue
// ---------------------------------------------------------------------------

/// A single seismic event.
///
/// Typed fields drive filtering and the map; `cells` keeps the row exactly as
/// read so the preview and the export never reformat a value.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub datetime: Option<NaiveDateTime>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// NaN when the cell was empty.
    pub magnitude: f64,
    /// NaN when the cell was empty.
    pub depth_km: f64,
    pub region: Option<String>,
    /// Source cells in [`Dataset::columns`] order.
    pub cells: Vec<String>,
}

impl Event {
    /// Both coordinates, if the event can be placed on the map.
    pub fn position(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded catalogue
// ---------------------------------------------------------------------------

/// The full parsed dataset. Immutable after construction.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Source column names in file order.
    pub columns: Vec<String>,
    /// All events (rows) in file order.
    pub events: Vec<Event>,
    has_datetime: bool,
}

/// Positions of the known columns inside a row.
struct ColumnIndex {
    datetime: Option<usize>,
    latitude: Option<usize>,
    longitude: Option<usize>,
    magnitude: usize,
    depth: usize,
    region: Option<usize>,
}

impl ColumnIndex {
    fn resolve(path: &Path, columns: &[String]) -> Result<Self, DataError> {
        let find = |name: &str| columns.iter().position(|c| c == name);
        let require = |name: &'static str| {
            find(name).ok_or_else(|| DataError::Schema {
                path: path.to_path_buf(),
                column: name,
            })
        };
        Ok(Self {
            magnitude: require(COL_MAGNITUDE)?,
            depth: require(COL_DEPTH)?,
            datetime: find(COL_DATETIME),
            latitude: find(COL_LATITUDE),
            longitude: find(COL_LONGITUDE),
            region: find(COL_REGION),
        })
    }
}

impl Dataset {
    /// Type the raw string table read from `path`.
    ///
    /// Fails with [`DataError::Schema`] when `magnitude` or `depth_km` is absent
    /// and with [`DataError::Load`] when one of them holds non-numeric text.
    /// Unparseable timestamps become null rather than failing the load.
    pub fn from_table(path: &Path, table: RawTable) -> Result<Self, DataError> {
        let RawTable { columns, rows } = table;
        let idx = ColumnIndex::resolve(path, &columns)?;

        let mut events = Vec::with_capacity(rows.len());
        let mut bad_timestamps = 0usize;

        for (row_no, cells) in rows.into_iter().enumerate() {
            let cell = |i: usize| cells.get(i).map(String::as_str).unwrap_or("");
            let opt_cell = |i: Option<usize>| i.map(cell).unwrap_or("");

            let magnitude = parse_required_float(cell(idx.magnitude))
                .map_err(|reason| malformed(path, row_no, COL_MAGNITUDE, reason))?;
            let depth_km = parse_required_float(cell(idx.depth))
                .map_err(|reason| malformed(path, row_no, COL_DEPTH, reason))?;

            let raw_dt = opt_cell(idx.datetime);
            let datetime = parse_timestamp(raw_dt);
            if datetime.is_none() && !raw_dt.trim().is_empty() {
                bad_timestamps += 1;
            }

            let region = Some(opt_cell(idx.region))
                .filter(|s| !s.is_empty())
                .map(str::to_string);
            let latitude = parse_optional_float(opt_cell(idx.latitude));
            let longitude = parse_optional_float(opt_cell(idx.longitude));

            events.push(Event {
                datetime,
                latitude,
                longitude,
                magnitude,
                depth_km,
                region,
                cells,
            });
        }

        if bad_timestamps > 0 {
            log::warn!(
                "{}: {bad_timestamps} '{COL_DATETIME}' value(s) could not be parsed and are treated as missing",
                path.display()
            );
        }

        Ok(Dataset {
            columns,
            events,
            has_datetime: idx.datetime.is_some(),
        })
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Whether the source carried a `datetime` column at all.
    pub fn has_datetime(&self) -> bool {
        self.has_datetime
    }

    /// Observed magnitude span, ignoring missing values.
    pub fn magnitude_bounds(&self) -> Option<NumericRange> {
        float_bounds(self.events.iter().map(|e| e.magnitude))
    }

    /// Observed depth span, ignoring missing values.
    pub fn depth_bounds(&self) -> Option<NumericRange> {
        float_bounds(self.events.iter().map(|e| e.depth_km))
    }

    /// First and last calendar day with a parsed timestamp.
    pub fn date_bounds(&self) -> Option<DateRange> {
        if !self.has_datetime {
            return None;
        }
        let mut dates = self.events.iter().filter_map(|e| e.datetime);
        let first = dates.next()?;
        let (min, max) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
        Some(DateRange::new(min.date(), max.date()))
    }
}

fn float_bounds(values: impl Iterator<Item = f64>) -> Option<NumericRange> {
    values
        .filter(|v| !v.is_nan())
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
        .map(|(lo, hi)| NumericRange::new(lo, hi))
}

/// Empty cells become NaN; anything else must be a number.
fn parse_required_float(s: &str) -> Result<f64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(f64::NAN);
    }
    s.parse::<f64>()
        .map_err(|_| format!("'{s}' is not a number"))
}

/// Empty, non-numeric, and non-finite cells all count as missing.
fn parse_optional_float(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn malformed(path: &Path, row_no: usize, column: &str, reason: String) -> DataError {
    DataError::Load {
        path: path.to_path_buf(),
        reason: format!("row {row_no}, column '{column}': {reason}"),
    }
}
