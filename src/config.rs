/// Configuration for the precipitation analyzer.
///
/// Settings come from an optional TOML file plus a few environment
/// overrides (a `.env` file in the working directory is honoured). Every
/// field has a default, so an empty or missing file yields the stock
/// capacities of 20 stations, 365 days per station, and 100 readings
/// per day.
///
/// ```toml
/// [limits]
/// max_stations = 20
/// max_days_per_station = 365
/// max_stats_per_day = 100   # 0 = unlimited
///
/// [logging]
/// level = "warn"
/// file = "precip.log"
/// timestamps = false
///
/// [output]
/// format = "text"           # or "json"
/// ```

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::logging::{self, Component, LogLevel};
use crate::model::{PrecipError, DEFAULT_MAX_DAYS, DEFAULT_MAX_STATIONS, DEFAULT_MAX_STATS};

/// Config file looked for in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "precip.toml";

pub const ENV_CONFIG_PATH: &str = "PRECIP_CONFIG";
pub const ENV_LOG_LEVEL: &str = "PRECIP_LOG_LEVEL";
pub const ENV_LOG_FILE: &str = "PRECIP_LOG_FILE";

// ---------------------------------------------------------------------------
// Config sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub limits: Limits,
    pub logging: LoggingConfig,
    pub output: OutputConfig,
}

/// Container capacities. A value of `0` removes the cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Limits {
    pub max_stations: usize,
    pub max_days_per_station: usize,
    pub max_stats_per_day: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_stations: DEFAULT_MAX_STATIONS,
            max_days_per_station: DEFAULT_MAX_DAYS,
            max_stats_per_day: DEFAULT_MAX_STATS,
        }
    }
}

impl Limits {
    pub fn unbounded() -> Self {
        Limits {
            max_stations: 0,
            max_days_per_station: 0,
            max_stats_per_day: 0,
        }
    }

    pub fn station_limit(&self) -> Option<usize> {
        cap(self.max_stations)
    }

    pub fn day_limit(&self) -> Option<usize> {
        cap(self.max_days_per_station)
    }

    pub fn stat_limit(&self) -> Option<usize> {
        cap(self.max_stats_per_day)
    }
}

fn cap(n: usize) -> Option<usize> {
    if n == 0 { None } else { Some(n) }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// One of `debug`, `info`, `warn`, `error`.
    pub level: String,
    pub file: Option<String>,
    pub timestamps: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "warn".to_string(),
            file: None,
            timestamps: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl Config {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, PrecipError> {
        let config: Config =
            toml::from_str(text).map_err(|e| PrecipError::Config(e.to_string()))?;
        config.log_level()?;
        Ok(config)
    }

    /// Reads a config file. A missing or unreadable file is an error here;
    /// use `resolve` for the "optional file" behaviour.
    pub fn load(path: &Path) -> Result<Self, PrecipError> {
        let text = fs::read_to_string(path).map_err(|e| {
            PrecipError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&text)
    }

    /// Builds the effective configuration for a run.
    ///
    /// The file is `explicit` if given, else `$PRECIP_CONFIG`, else
    /// `./precip.toml` when it exists, else defaults. Environment overrides
    /// are applied last.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, PrecipError> {
        dotenv::dotenv().ok();

        let path: Option<PathBuf> = match explicit {
            Some(p) => Some(p.to_path_buf()),
            None => match std::env::var(ENV_CONFIG_PATH) {
                Ok(p) if !p.trim().is_empty() => Some(PathBuf::from(p)),
                _ => {
                    let local = PathBuf::from(DEFAULT_CONFIG_FILE);
                    local.exists().then_some(local)
                }
            },
        };

        let mut config = match &path {
            Some(p) => Self::load(p)?,
            None => Config::default(),
        };

        config.apply_env_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Applies `PRECIP_LOG_LEVEL` / `PRECIP_LOG_FILE` from `lookup`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), PrecipError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.logging.level = level;
            self.log_level()?;
        }
        if let Some(file) = lookup(ENV_LOG_FILE) {
            self.logging.file = if file.trim().is_empty() { None } else { Some(file) };
        }
        Ok(())
    }

    pub fn log_level(&self) -> Result<LogLevel, PrecipError> {
        self.logging
            .level
            .parse::<LogLevel>()
            .map_err(PrecipError::Config)
    }

    /// Installs the global logger described by the `[logging]` section.
    pub fn init_logging(&self) -> Result<(), PrecipError> {
        let level = self.log_level()?;
        logging::init_logger(level, self.logging.file.as_deref(), self.logging.timestamps);
        logging::debug(
            Component::Config,
            None,
            &format!(
                "limits: stations={} days={} stats={}",
                self.limits.max_stations,
                self.limits.max_days_per_station,
                self.limits.max_stats_per_day
            ),
        );
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
