/// A weather station and its readings grouped by calendar date.
///
/// Days are keyed by the date text exactly as it appears in the input
/// (e.g. `"2020-01-15"`) and iterate in the order they were first seen,
/// which is not necessarily chronological.

use crate::config::Limits;
use crate::day::Day;
use crate::ingest::csv::split_fields;
use crate::logging::{self, Component};
use crate::model::{CapacityExceeded, Level, RecordError, Stat};
use crate::ordered::OrderedMap;

#[derive(Debug, Clone)]
pub struct Station {
    id: String,
    name: String,
    days: OrderedMap<Day>,
    max_stats_per_day: Option<usize>,
}

impl Station {
    pub fn new(id: impl Into<String>, name: impl Into<String>, limits: &Limits) -> Self {
        Station {
            id: id.into(),
            name: name.into(),
            days: OrderedMap::new(Level::Day, limits.day_limit()),
            max_stats_per_day: limits.stat_limit(),
        }
    }

    /// Routes one record's `<date> <time>` and channel values into the
    /// matching Day, creating it on first sight.
    ///
    /// The reading is parsed before any Day is created, so a record with
    /// bad numbers never leaves an empty Day behind.
    pub fn load(&mut self, datetime: &str, qgag: &str, qpcp: &str) -> Result<(), RecordError> {
        let parts = match split_fields(datetime, ' ', 2) {
            Ok(parts) => parts,
            Err(_) => {
                logging::warn(
                    Component::Station,
                    Some(&self.id),
                    &format!("Invalid date/time '{}'", datetime),
                );
                return Err(RecordError::InvalidDateTime(datetime.to_string()));
            }
        };
        let (date, time) = (parts[0], parts[1]);

        let stat = match Stat::parse(time, qgag, qpcp) {
            Ok(stat) => stat,
            Err(err) => {
                logging::warn(
                    Component::Station,
                    Some(&self.id),
                    &format!("{} at {}", err, datetime),
                );
                return Err(err);
            }
        };

        let day = self.add_day(date)?;
        day.add_stat(stat)?;
        Ok(())
    }

    pub fn find_day(&self, date: &str) -> Option<&Day> {
        self.days.get(date)
    }

    /// Find-or-create for `date`. Returns the existing Day if there is one.
    pub fn add_day(&mut self, date: &str) -> Result<&mut Day, CapacityExceeded> {
        let max_stats = self.max_stats_per_day;
        match self.days.get_or_insert_with(date, || Day::new(date, max_stats)) {
            Ok(day) => Ok(day),
            Err(err) => {
                logging::warn(
                    Component::Station,
                    Some(&self.id),
                    &format!("Too many days for station {}: {}", self.name, err),
                );
                Err(err)
            }
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Days in first-seen order. Each call starts a fresh traversal.
    pub fn days(&self) -> impl Iterator<Item = &Day> {
        self.days.values()
    }

    pub fn day_count(&self) -> usize {
        self.days.len()
    }
}
