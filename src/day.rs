/// One calendar date's readings for a single station.

use crate::logging::{self, Component};
use crate::model::{CapacityExceeded, Level, Stat};

#[derive(Debug, Clone)]
pub struct Day {
    date: String,
    stats: Vec<Stat>,
    max_stats: Option<usize>,
}

impl Day {
    /// `max_stats: None` means the day accepts any number of readings.
    pub fn new(date: impl Into<String>, max_stats: Option<usize>) -> Self {
        Day {
            date: date.into(),
            stats: Vec::new(),
            max_stats,
        }
    }

    /// Appends a reading, keeping file order.
    ///
    /// At capacity the reading is dropped, a warning is logged, and the
    /// caller gets `CapacityExceeded` keyed by the reading's time label.
    pub fn add_stat(&mut self, stat: Stat) -> Result<(), CapacityExceeded> {
        if let Some(limit) = self.max_stats {
            if self.stats.len() >= limit {
                let err = CapacityExceeded {
                    level: Level::Stat,
                    key: stat.time().to_string(),
                    limit,
                };
                logging::warn(
                    Component::Day,
                    Some(&self.date),
                    &format!("Too many stats for {}: {}", self.date, err),
                );
                return Err(err);
            }
        }
        self.stats.push(stat);
        Ok(())
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    /// Readings in insertion order. Each call starts a fresh traversal.
    pub fn stats(&self) -> impl Iterator<Item = &Stat> {
        self.stats.iter()
    }

    pub fn stat_count(&self) -> usize {
        self.stats.len()
    }
}
