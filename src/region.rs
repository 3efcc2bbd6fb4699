/// The top-level container: every station seen in one input file.
///
/// A Region is filled once by `load`/`load_file` and then read any number
/// of times. Loading is line-by-line and forgiving: a bad line is logged,
/// counted in the returned `LoadReport`, and skipped.

use serde::Serialize;
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::config::Limits;
use crate::ingest::csv::{is_expected_header, parse_record, trim_line_ending};
use crate::logging::{self, Component};
use crate::model::{CapacityExceeded, Level, PrecipError, RecordError};
use crate::ordered::OrderedMap;
use crate::station::Station;

// ---------------------------------------------------------------------------
// Load accounting
// ---------------------------------------------------------------------------

/// What happened to each data line of a load. The header is not counted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub lines_read: usize,
    pub records_loaded: usize,
    pub blank_lines: usize,
    /// Wrong number of comma-separated fields.
    pub invalid_lines: usize,
    pub invalid_datetimes: usize,
    pub invalid_numbers: usize,
    /// Records refused because the region already held its station limit.
    pub dropped_stations: usize,
    pub dropped_days: usize,
    pub dropped_stats: usize,
    /// Lines that contained invalid UTF-8 and were loaded after replacement.
    pub non_utf8_lines: usize,
    /// Set when reading stopped early on an I/O error.
    pub read_error: Option<String>,
}

impl LoadReport {
    /// Total records skipped for any reason other than being blank.
    pub fn skipped(&self) -> usize {
        self.invalid_lines
            + self.invalid_datetimes
            + self.invalid_numbers
            + self.dropped_stations
            + self.dropped_days
            + self.dropped_stats
    }

    fn record_error(&mut self, err: &RecordError) {
        match err {
            RecordError::FieldCount { .. } => self.invalid_lines += 1,
            RecordError::InvalidDateTime(_) => self.invalid_datetimes += 1,
            RecordError::InvalidNumber { .. } => self.invalid_numbers += 1,
            RecordError::Capacity(CapacityExceeded { level, .. }) => match level {
                Level::Station => self.dropped_stations += 1,
                Level::Day => self.dropped_days += 1,
                Level::Stat => self.dropped_stats += 1,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Region
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Region {
    stations: OrderedMap<Station>,
    limits: Limits,
}

impl Default for Region {
    fn default() -> Self {
        Region::new(Limits::default())
    }
}

impl Region {
    pub fn new(limits: Limits) -> Self {
        Region {
            stations: OrderedMap::new(Level::Station, limits.station_limit()),
            limits,
        }
    }

    /// Opens `path` and loads it.
    ///
    /// If the file cannot be opened nothing is loaded, the error is logged,
    /// and `PrecipError::Io` is returned.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<LoadReport, PrecipError> {
        let path = path.as_ref();
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) => {
                let err = PrecipError::Io {
                    path: path.display().to_string(),
                    message: e.to_string(),
                };
                logging::error(Component::Region, None, &err.to_string());
                return Err(err);
            }
        };
        Ok(self.load(BufReader::new(file)))
    }

    /// Loads every data line of `reader`, skipping the first (header) line.
    ///
    /// Lines are decoded leniently: bytes that are not valid UTF-8 (e.g. a
    /// Latin-1 station name) become U+FFFD and the line is still loaded.
    /// Only a genuine I/O error stops the load early.
    pub fn load<R: BufRead>(&mut self, mut reader: R) -> LoadReport {
        let mut report = LoadReport::default();
        let mut buf = Vec::new();

        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => {
                logging::info(Component::Region, None, "Input is empty");
                return report;
            }
            Ok(_) => {
                let header = String::from_utf8_lossy(&buf);
                if !is_expected_header(trim_line_ending(&header)) {
                    logging::debug(
                        Component::Region,
                        Some("line 1"),
                        &format!("Unexpected header, skipped anyway: '{}'", header.trim_end()),
                    );
                }
            }
            Err(e) => {
                logging::error(Component::Region, None, &format!("Cannot read header: {}", e));
                report.read_error = Some(e.to_string());
                return report;
            }
        }

        // Header is line 1.
        let mut line_no = 1;
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) => break,
                Ok(_) => {}
                Err(e) => {
                    logging::error(
                        Component::Region,
                        None,
                        &format!("Read failed at line {}: {}", line_no + 1, e),
                    );
                    report.read_error = Some(e.to_string());
                    break;
                }
            }
            line_no += 1;
            report.lines_read += 1;

            let decoded = String::from_utf8_lossy(&buf);
            if let Cow::Owned(_) = decoded {
                report.non_utf8_lines += 1;
                logging::warn(
                    Component::Region,
                    Some(&format!("line {}", line_no)),
                    "Line is not valid UTF-8; invalid bytes replaced",
                );
            }

            let line = trim_line_ending(&decoded);
            if line.trim().is_empty() {
                report.blank_lines += 1;
                continue;
            }

            match self.load_line(line) {
                Ok(()) => report.records_loaded += 1,
                Err(err) => {
                    if let RecordError::FieldCount { .. } = err {
                        logging::warn(
                            Component::Region,
                            Some(&format!("line {}", line_no)),
                            &format!("Invalid stats line '{}' ({})", line, err),
                        );
                    }
                    report.record_error(&err);
                }
            }
        }

        logging::log_load_summary(&report);
        report
    }

    fn load_line(&mut self, line: &str) -> Result<(), RecordError> {
        let record = parse_record(line)?;
        let station = self.add_station(record.station_id, record.station_name)?;
        station.load(record.datetime, record.qgag, record.qpcp)
    }

    pub fn find_station(&self, id: &str) -> Option<&Station> {
        self.stations.get(id)
    }

    /// Find-or-create for `id`. An existing station keeps its original name.
    pub fn add_station(&mut self, id: &str, name: &str) -> Result<&mut Station, CapacityExceeded> {
        let limits = self.limits;
        match self
            .stations
            .get_or_insert_with(id, || Station::new(id, name, &limits))
        {
            Ok(station) => Ok(station),
            Err(err) => {
                logging::warn(
                    Component::Region,
                    Some(id),
                    &format!("Cannot add station {}, {}: {}", id, name, err),
                );
                Err(err)
            }
        }
    }

    /// Stations in first-seen order. Each call starts a fresh traversal.
    pub fn stations(&self) -> impl Iterator<Item = &Station> {
        self.stations.values()
    }

    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const HEADER: &str = "stationId,stationName,datetime,qgag,qpcp\n";

    fn load(body: &str) -> (Region, LoadReport) {
        let mut region = Region::default();
        let report = region.load(Cursor::new(format!("{}{}", HEADER, body)));
        (region, report)
    }

    #[test]
    fn test_header_is_never_parsed_as_data() {
        let mut region = Region::default();
        let report = region.load(Cursor::new("S0,Header,2020-01-01 00:00:00,1,1\n"));
        assert!(region.is_empty());
        assert_eq!(report.lines_read, 0);
    }

    #[test]
    fn test_empty_input_loads_nothing() {
        let mut region = Region::default();
        let report = region.load(Cursor::new(""));
        assert!(region.is_empty());
        assert_eq!(report, LoadReport::default());
    }

    #[test]
    fn test_stations_iterate_in_first_seen_order() {
        let (region, report) = load(
            "S9,Zeta,2020-01-01 00:00:00,1,1\n\
             S1,Alpha,2020-01-01 00:00:00,1,1\n\
             S9,Zeta,2020-01-02 00:00:00,1,1\n\
             S5,Mid,2020-01-01 00:00:00,1,1\n",
        );
        assert_eq!(report.records_loaded, 4);
        let ids: Vec<_> = region.stations().map(Station::id).collect();
        assert_eq!(ids, vec!["S9", "S1", "S5"]);
    }

    #[test]
    fn test_add_station_is_idempotent_and_first_name_wins() {
        let mut region = Region::default();
        region.add_station("S1", "Lake").unwrap();
        let again = region.add_station("S1", "Renamed").unwrap();
        assert_eq!(again.name(), "Lake");
        assert_eq!(region.station_count(), 1);
    }

    #[test]
    fn test_find_station_has_no_side_effect() {
        let region = Region::default();
        assert!(region.find_station("S1").is_none());
        assert!(region.is_empty());
    }

    #[test]
    fn test_malformed_lines_are_counted_and_skipped() {
        let (region, report) = load(
            "S1,Lake,2020-01-01 00:00:00,10\n\
             S1,Lake,2020-01-01T00:00:00,10,20\n\
             S1,Lake,2020-01-01 00:00:00,x,20\n\
             S1,Lake,2020-01-01 06:00:00,10,20\n",
        );
        assert_eq!(report.lines_read, 4);
        assert_eq!(report.invalid_lines, 1);
        assert_eq!(report.invalid_datetimes, 1);
        assert_eq!(report.invalid_numbers, 1);
        assert_eq!(report.records_loaded, 1);
        assert_eq!(report.skipped(), 3);

        let station = region.find_station("S1").expect("valid line creates station");
        assert_eq!(station.day_count(), 1);
    }

    #[test]
    fn test_blank_and_crlf_lines() {
        let mut region = Region::default();
        let report = region.load(Cursor::new(
            "stationId,stationName,datetime,qgag,qpcp\r\n\
             S1,Lake,2020-01-01 00:00:00,10,20\r\n\
             \r\n\
             S1,Lake,2020-01-01 06:00:00,1,2\r\n",
        ));
        assert_eq!(report.records_loaded, 2);
        assert_eq!(report.blank_lines, 1);
        assert_eq!(report.skipped(), 0);

        let day = region.find_station("S1").unwrap().find_day("2020-01-01").unwrap();
        let last = day.stats().last().unwrap();
        assert_eq!(last.time(), "06:00:00");
        assert_eq!(last.precipitation_qpcp(), 2.0);
    }

    #[test]
    fn test_station_capacity_drops_records_for_new_ids() {
        let mut region = Region::new(Limits { max_stations: 1, ..Limits::default() });
        let report = region.load(Cursor::new(format!(
            "{}S1,Lake,2020-01-01 00:00:00,1,1\n\
             S2,River,2020-01-01 00:00:00,1,1\n\
             S1,Lake,2020-01-02 00:00:00,1,1\n",
            HEADER
        )));
        assert_eq!(region.station_count(), 1);
        assert_eq!(report.dropped_stations, 1);
        assert_eq!(report.records_loaded, 2);
        assert!(region.find_station("S2").is_none());
    }

    #[test]
    fn test_non_utf8_line_loads_and_later_lines_continue() {
        let mut bytes = HEADER.as_bytes().to_vec();
        bytes.extend_from_slice(b"S1,Lake,2020-01-01 00:00:00,1,1\n");
        bytes.extend_from_slice(b"S2,S\xe3o Paulo,2020-01-01 00:00:00,2,2\n");
        bytes.extend_from_slice(b"S3,River,2020-01-01 00:00:00,3,3\n");

        let mut region = Region::default();
        let report = region.load(Cursor::new(bytes));

        assert_eq!(report.read_error, None, "bad encoding is not an I/O failure");
        assert_eq!(report.records_loaded, 3);
        assert_eq!(report.non_utf8_lines, 1);
        assert_eq!(region.station_count(), 3);
        assert!(region.find_station("S3").is_some(), "lines after the bad one must load");

        let s2 = region.find_station("S2").expect("station with Latin-1 name loads");
        assert_eq!(s2.name(), "S\u{FFFD}o Paulo");
    }

    #[test]
    fn test_read_error_stops_load_and_is_reported() {
        struct FailAfterHeader {
            served: bool,
        }

        impl std::io::Read for FailAfterHeader {
            fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
                if self.served {
                    return Err(std::io::Error::other("disk went away"));
                }
                self.served = true;
                let data = b"stationId,stationName,datetime,qgag,qpcp\nS1,Lake,2020-01-01 00:00:00,1,1\n";
                buf[..data.len()].copy_from_slice(data);
                Ok(data.len())
            }
        }

        let mut region = Region::default();
        let report = region.load(BufReader::new(FailAfterHeader { served: false }));

        assert_eq!(report.records_loaded, 1);
        assert_eq!(report.read_error.as_deref(), Some("disk went away"));
    }

    #[test]
    fn test_load_file_missing_leaves_region_empty() {
        let mut region = Region::default();
        let result = region.load_file("/no/such/dir/precip.csv");
        assert!(matches!(result, Err(PrecipError::Io { .. })));
        assert!(region.is_empty());
    }
}
