/// Per-station precipitation totals and daily averages.
///
/// The daily average divides each channel's total by the number of days
/// that have readings, not by the number of readings. A day with twelve
/// readings and a day with one weigh the same.

use serde::Serialize;
use std::fmt;

use crate::logging::{self, Component};
use crate::region::Region;
use crate::station::Station;

// ============================================================================
// Results
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrecipSummary {
    pub station_id: String,
    pub station_name: String,
    pub total_days: usize,
    pub total_stats: usize,
    pub total_qgag: f64,
    pub total_qpcp: f64,
    pub daily_average_qgag: f64,
    pub daily_average_qpcp: f64,
}

/// Outcome of analyzing one station.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PrecipAnalysis {
    /// The station has no days, so there is nothing to average.
    NoData { station_id: String, station_name: String },
    Summary(PrecipSummary),
}

impl PrecipAnalysis {
    pub fn summary(&self) -> Option<&PrecipSummary> {
        match self {
            PrecipAnalysis::Summary(s) => Some(s),
            PrecipAnalysis::NoData { .. } => None,
        }
    }
}

/// Amounts in the text report are rounded to 1/10000 inch to hide float
/// summing noise, then printed without trailing zeros (`1000`, `4.5`, `0.004`).
fn amount(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

impl fmt::Display for PrecipAnalysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrecipAnalysis::NoData { station_name, .. } => {
                writeln!(f, "Precipitation Analysis for {}", station_name)?;
                writeln!(f, "No data points")
            }
            PrecipAnalysis::Summary(s) => {
                writeln!(f, "Precipitation Analysis for {}", s.station_name)?;
                writeln!(f, "Total days: {}", s.total_days)?;
                writeln!(f, "Total GAG: {}", amount(s.total_qgag))?;
                writeln!(f, "Total PCP: {}", amount(s.total_qpcp))?;
                writeln!(f, "Daily Average GAG: {}", amount(s.daily_average_qgag))?;
                writeln!(f, "Daily Average PCP: {}", amount(s.daily_average_qpcp))?;
                writeln!(f)
            }
        }
    }
}

// ============================================================================
// Aggregation
// ============================================================================

/// Sums both channels over every reading of every day of `station`.
pub fn analyze(station: &Station) -> PrecipAnalysis {
    let mut total_days = 0usize;
    let mut total_stats = 0usize;
    let mut total_qgag = 0.0;
    let mut total_qpcp = 0.0;

    for day in station.days() {
        total_days += 1;
        for stat in day.stats() {
            total_stats += 1;
            total_qgag += stat.precipitation_qgag();
            total_qpcp += stat.precipitation_qpcp();
        }
    }

    if total_days == 0 {
        logging::debug(Component::Analyzer, Some(station.id()), "No data points");
        return PrecipAnalysis::NoData {
            station_id: station.id().to_string(),
            station_name: station.name().to_string(),
        };
    }

    logging::debug(
        Component::Analyzer,
        Some(station.id()),
        &format!("{} days, {} readings", total_days, total_stats),
    );

    PrecipAnalysis::Summary(PrecipSummary {
        station_id: station.id().to_string(),
        station_name: station.name().to_string(),
        total_days,
        total_stats,
        total_qgag,
        total_qpcp,
        daily_average_qgag: total_qgag / total_days as f64,
        daily_average_qpcp: total_qpcp / total_days as f64,
    })
}

/// Analyzes every station of `region` in first-seen order.
pub fn analyze_region(region: &Region) -> Vec<PrecipAnalysis> {
    region.stations().map(analyze).collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Limits;

    fn station_with(rows: &[(&str, &str, &str)]) -> Station {
        let mut station = Station::new("S1", "Lake", &Limits::default());
        for (datetime, qgag, qpcp) in rows {
            station.load(datetime, qgag, qpcp).expect("test rows are valid");
        }
        station
    }

    #[test]
    fn test_empty_station_reports_no_data() {
        let station = station_with(&[]);
        let analysis = analyze(&station);
        assert_eq!(
            analysis,
            PrecipAnalysis::NoData { station_id: "S1".to_string(), station_name: "Lake".to_string() }
        );
        assert_eq!(analysis.to_string(), "Precipitation Analysis for Lake\nNo data points\n");
    }

    #[test]
    fn test_average_is_per_day_not_per_reading() {
        // Day 1: three readings, day 2: one reading.
        let station = station_with(&[
            ("2020-01-01 00:00:00", "10", "1"),
            ("2020-01-01 01:00:00", "20", "2"),
            ("2020-01-01 02:00:00", "30", "3"),
            ("2020-01-02 00:00:00", "40", "4"),
        ]);
        let summary = analyze(&station).summary().cloned().expect("station has data");
        assert_eq!(summary.total_days, 2);
        assert_eq!(summary.total_stats, 4);
        assert_eq!(summary.total_qgag, 100.0);
        assert_eq!(summary.total_qpcp, 10.0);
        assert_eq!(summary.daily_average_qgag, 50.0);
        assert_eq!(summary.daily_average_qpcp, 5.0);
    }

    #[test]
    fn test_sentinels_contribute_zero() {
        let station = station_with(&[
            ("2020-01-01 00:00:00", "-9999", "999"),
            ("2020-01-01 01:00:00", "12.5", "0.5"),
        ]);
        let summary = analyze(&station).summary().cloned().unwrap();
        assert_eq!(summary.total_qgag, 12.5);
        assert_eq!(summary.total_qpcp, 0.5);
    }

    #[test]
    fn test_report_text_layout() {
        let station = station_with(&[
            ("2020-01-01 00:00:00", "10", "20"),
            ("2020-01-01 06:00:00", "990", "5"),
        ]);
        let expected = "Precipitation Analysis for Lake\n\
                        Total days: 1\n\
                        Total GAG: 1000\n\
                        Total PCP: 25\n\
                        Daily Average GAG: 1000\n\
                        Daily Average PCP: 25\n\
                        \n";
        assert_eq!(analyze(&station).to_string(), expected);
    }

    #[test]
    fn test_report_keeps_small_and_fractional_amounts() {
        let station = station_with(&[
            ("2020-01-01 00:00:00", "0.004", "0.1"),
            ("2020-01-01 01:00:00", "0", "0.2"),
            ("2020-01-02 00:00:00", "0", "4.2"),
        ]);
        let text = analyze(&station).to_string();
        assert!(text.contains("Total GAG: 0.004\n"), "got:\n{}", text);
        assert!(text.contains("Total PCP: 4.5\n"), "got:\n{}", text);
        assert!(text.contains("Daily Average GAG: 0.002\n"), "got:\n{}", text);
        assert!(text.contains("Daily Average PCP: 2.25\n"), "got:\n{}", text);
    }

    #[test]
    fn test_analysis_does_not_change_station() {
        let station = station_with(&[("2020-01-01 00:00:00", "1", "2")]);
        let first = analyze(&station);
        let second = analyze(&station);
        assert_eq!(first, second);
        assert_eq!(station.day_count(), 1);
    }

    #[test]
    fn test_summary_serializes_with_status_tag() {
        let station = station_with(&[("2020-01-01 00:00:00", "1", "2")]);
        let json = serde_json::to_value(analyze(&station)).unwrap();
        assert_eq!(json["status"], "summary");
        assert_eq!(json["station_id"], "S1");
        assert_eq!(json["total_days"], 1);

        let empty = serde_json::to_value(analyze(&station_with(&[]))).unwrap();
        assert_eq!(empty["status"], "no_data");
    }
}
