/// Core data types for the precipitation analyzer.
///
/// This module defines the leaf reading type (`Stat`), the missing-data
/// sentinel convention, default container capacities, and the error types
/// shared by every level of the Region → Station → Day → Stat hierarchy.
/// It contains no I/O.

use std::fmt;

// ---------------------------------------------------------------------------
// Sentinel convention
// ---------------------------------------------------------------------------

/// Parsed values at or below this are the source's "no reading" marker.
pub const SENTINEL_LOW: f64 = -9999.0;

/// Parsed values at or above this are treated as "no reading" too.
pub const SENTINEL_HIGH: f64 = 999.0;

// ---------------------------------------------------------------------------
// Default capacities
// ---------------------------------------------------------------------------

pub const DEFAULT_MAX_STATIONS: usize = 20;
pub const DEFAULT_MAX_DAYS: usize = 365;
pub const DEFAULT_MAX_STATS: usize = 100;

// ---------------------------------------------------------------------------
// Reading type
// ---------------------------------------------------------------------------

/// Maps a sentinel value to `0.0`, passing everything strictly between
/// `SENTINEL_LOW` and `SENTINEL_HIGH` through unchanged.
///
/// Note that this makes "missing" indistinguishable from a real zero
/// reading once stored. Totals computed downstream therefore under-report
/// stations with gaps rather than flagging them.
pub fn normalize_precipitation(value: f64) -> f64 {
    if value <= SENTINEL_LOW || value >= SENTINEL_HIGH {
        0.0
    } else {
        value
    }
}

/// A single precipitation reading at one time of day.
///
/// Immutable once built; both channels have already been normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct Stat {
    time: String,                // e.g. "00:15:00", kept verbatim
    precipitation_qgag: f64,     // volume channel, 1/100 in
    precipitation_qpcp: f64,     // amount channel, 1/100 in
}

impl Stat {
    /// Builds a reading from already-parsed channel values.
    pub fn new(time: impl Into<String>, qgag: f64, qpcp: f64) -> Self {
        Stat {
            time: time.into(),
            precipitation_qgag: normalize_precipitation(qgag),
            precipitation_qpcp: normalize_precipitation(qpcp),
        }
    }

    /// Parses both channels from their CSV text.
    ///
    /// Surrounding whitespace is ignored. Text that is not a number (or is
    /// `NaN`) yields `RecordError::InvalidNumber` naming the offending field.
    pub fn parse(time: &str, qgag: &str, qpcp: &str) -> Result<Self, RecordError> {
        let qgag = parse_channel("qgag", qgag)?;
        let qpcp = parse_channel("qpcp", qpcp)?;
        Ok(Stat::new(time, qgag, qpcp))
    }

    pub fn time(&self) -> &str {
        &self.time
    }

    pub fn precipitation_qgag(&self) -> f64 {
        self.precipitation_qgag
    }

    pub fn precipitation_qpcp(&self) -> f64 {
        self.precipitation_qpcp
    }
}

fn parse_channel(field: &'static str, raw: &str) -> Result<f64, RecordError> {
    match raw.trim().parse::<f64>() {
        Ok(v) if !v.is_nan() => Ok(v),
        _ => Err(RecordError::InvalidNumber {
            field,
            value: raw.to_string(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Which level of the hierarchy refused a new entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Station,
    Day,
    Stat,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Station => write!(f, "station"),
            Level::Day => write!(f, "day"),
            Level::Stat => write!(f, "stat"),
        }
    }
}

/// A container was already at its configured capacity.
///
/// `key` is the identity of the entry that was dropped: the station id,
/// the date, or the reading's time label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapacityExceeded {
    pub level: Level,
    pub key: String,
    pub limit: usize,
}

impl fmt::Display for CapacityExceeded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Too many {} entries (limit {}): dropped '{}'",
            self.level, self.limit, self.key
        )
    }
}

impl std::error::Error for CapacityExceeded {}

/// Reasons a single CSV record was skipped. None of these stop a load.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordError {
    /// The line did not split into the expected number of fields.
    FieldCount { expected: usize, found: usize },
    /// The datetime field was not `<date> <time>`.
    InvalidDateTime(String),
    /// A precipitation channel could not be parsed as a number.
    InvalidNumber { field: &'static str, value: String },
    /// The record's station, day, or reading did not fit.
    Capacity(CapacityExceeded),
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordError::FieldCount { expected, found } => {
                write!(f, "Invalid stats line: expected {} fields, found {}", expected, found)
            }
            RecordError::InvalidDateTime(raw) => write!(f, "Invalid date/time: {}", raw),
            RecordError::InvalidNumber { field, value } => {
                write!(f, "Invalid {} value: '{}'", field, value)
            }
            RecordError::Capacity(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for RecordError {}

impl From<CapacityExceeded> for RecordError {
    fn from(err: CapacityExceeded) -> Self {
        RecordError::Capacity(err)
    }
}

/// Run-level failures: the input or the configuration was unusable.
#[derive(Debug, PartialEq)]
pub enum PrecipError {
    /// The input file could not be opened or read.
    Io { path: String, message: String },
    /// The configuration file was present but invalid.
    Config(String),
}

impl fmt::Display for PrecipError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrecipError::Io { path, message } => write!(f, "Cannot read {}: {}", path, message),
            PrecipError::Config(msg) => write!(f, "Config error: {}", msg),
        }
    }
}

impl std::error::Error for PrecipError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
