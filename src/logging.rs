/// Structured logging for the precipitation analyzer
///
/// Provides levelled logging tagged with the hierarchy component that
/// produced the message and, where relevant, the station id or date it
/// concerns. Console output always goes to stderr so the report on stdout
/// stays clean; an optional file receives timestamped entries.

use chrono::Utc;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::str::FromStr;
use std::sync::Mutex;

use crate::region::LoadReport;

// ---------------------------------------------------------------------------
// Log Levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level '{}'", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Region,
    Station,
    Day,
    Analyzer,
    Config,
    System,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::Region => write!(f, "REGION"),
            Component::Station => write!(f, "STATION"),
            Component::Day => write!(f, "DAY"),
            Component::Analyzer => write!(f, "ANALYZER"),
            Component::Config => write!(f, "CONFIG"),
            Component::System => write!(f, "SYS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Logger Configuration
// ---------------------------------------------------------------------------

/// Global logger instance
static LOGGER: Mutex<Option<Logger>> = Mutex::new(None);

pub struct Logger {
    /// Minimum log level to display
    min_level: LogLevel,
    /// Optional file path for logging
    log_file: Option<String>,
    /// Whether to include timestamps in console output
    console_timestamps: bool,
}

impl Logger {
    fn log(&self, level: LogLevel, component: Component, key: Option<&str>, message: &str) {
        if level < self.min_level {
            return;
        }

        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();
        let log_entry = format_entry(&timestamp, level, component, key, message);

        if self.console_timestamps {
            eprintln!("{}", log_entry);
        } else {
            let key_part = key.map(|k| format!(" [{}]", k)).unwrap_or_default();
            match level {
                LogLevel::Error => eprintln!("✗ {}{}: {}", component, key_part, message),
                LogLevel::Warning => eprintln!("⚠ {}{}: {}", component, key_part, message),
                LogLevel::Info => eprintln!("{}", message),
                LogLevel::Debug => eprintln!("[DEBUG] {}{}: {}", component, key_part, message),
            }
        }

        if let Some(ref path) = self.log_file {
            if let Err(e) = Self::append_to_file(path, &log_entry) {
                eprintln!("Failed to write to log file {}: {}", path, e);
            }
        }
    }

    fn append_to_file(path: &str, entry: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", entry)?;
        Ok(())
    }
}

/// Formats one timestamped entry as written to the log file.
pub fn format_entry(
    timestamp: &str,
    level: LogLevel,
    component: Component,
    key: Option<&str>,
    message: &str,
) -> String {
    let key_part = key.map(|k| format!(" [{}]", k)).unwrap_or_default();
    format!("{} {} {}{}: {}", timestamp, level, component, key_part, message)
}

// ---------------------------------------------------------------------------
// Public Logging Functions
// ---------------------------------------------------------------------------

/// Initialize (or replace) the global logger. Until this is called every
/// logging function is a no-op.
pub fn init_logger(min_level: LogLevel, log_file: Option<&str>, console_timestamps: bool) {
    let logger = Logger {
        min_level,
        log_file: log_file.map(String::from),
        console_timestamps,
    };
    if let Ok(mut guard) = LOGGER.lock() {
        *guard = Some(logger);
    }
}

fn dispatch(level: LogLevel, component: Component, key: Option<&str>, message: &str) {
    if let Ok(guard) = LOGGER.lock() {
        if let Some(logger) = guard.as_ref() {
            logger.log(level, component, key, message);
        }
    }
}

pub fn info(component: Component, key: Option<&str>, message: &str) {
    dispatch(LogLevel::Info, component, key, message);
}

pub fn warn(component: Component, key: Option<&str>, message: &str) {
    dispatch(LogLevel::Warning, component, key, message);
}

pub fn error(component: Component, key: Option<&str>, message: &str) {
    dispatch(LogLevel::Error, component, key, message);
}

pub fn debug(component: Component, key: Option<&str>, message: &str) {
    dispatch(LogLevel::Debug, component, key, message);
}

// ---------------------------------------------------------------------------
// Load Summary Logging
// ---------------------------------------------------------------------------

/// Picks the level for a load summary: Info for a clean load, Warning when
/// some records were skipped, Error when nothing loaded at all.
pub fn summary_level(report: &LoadReport) -> LogLevel {
    if report.skipped() == 0 {
        LogLevel::Info
    } else if report.records_loaded == 0 {
        LogLevel::Error
    } else {
        LogLevel::Warning
    }
}

/// Log a one-line summary of a completed load
pub fn log_load_summary(report: &LoadReport) {
    let message = format!(
        "Load complete: {} records loaded, {} skipped ({} malformed lines, {} bad date/time, {} bad numbers, {} over capacity)",
        report.records_loaded,
        report.skipped(),
        report.invalid_lines,
        report.invalid_datetimes,
        report.invalid_numbers,
        report.dropped_stations + report.dropped_days + report.dropped_stats,
    );

    dispatch(summary_level(report), Component::Region, None, &message);
}
