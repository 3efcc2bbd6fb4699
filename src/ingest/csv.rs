/// Station precipitation CSV parsing
///
/// Each data line of an export carries one reading:
///
/// ```text
/// stationId,stationName,datetime,qgag,qpcp
/// S1,Lake,2020-01-01 00:15:00,10,20
/// ```
///
/// The first line of a file is always a header and is never parsed.
/// There is no quoting: a comma inside a station name makes the line
/// malformed.

use crate::model::RecordError;

/// Number of comma-separated fields on every data line.
pub const FIELD_COUNT: usize = 5;

/// Column names, in order, as written in the header line.
pub const HEADER: [&str; FIELD_COUNT] = ["stationId", "stationName", "datetime", "qgag", "qpcp"];

// ============================================================================
// Splitting
// ============================================================================

/// Splits `s` on `delimiter` into exactly `expected` parts.
///
/// Empty parts count (`"a,,b"` is three fields). Any other count is a
/// `RecordError::FieldCount`.
pub fn split_fields(s: &str, delimiter: char, expected: usize) -> Result<Vec<&str>, RecordError> {
    let fields: Vec<&str> = s.split(delimiter).collect();
    if fields.len() == expected {
        Ok(fields)
    } else {
        Err(RecordError::FieldCount {
            expected,
            found: fields.len(),
        })
    }
}

// ============================================================================
// Records
// ============================================================================

/// One data line, borrowed from the input buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvRecord<'a> {
    pub station_id: &'a str,
    pub station_name: &'a str,
    pub datetime: &'a str,  // "<date> <time>"
    pub qgag: &'a str,
    pub qpcp: &'a str,
}

/// Parses one data line. Only the field count is checked here; the
/// datetime and numbers are validated by the Station that receives them.
pub fn parse_record(line: &str) -> Result<CsvRecord<'_>, RecordError> {
    let fields = split_fields(line, ',', FIELD_COUNT)?;
    Ok(CsvRecord {
        station_id: fields[0],
        station_name: fields[1],
        datetime: fields[2],
        qgag: fields[3],
        qpcp: fields[4],
    })
}

/// True when `line` names the columns in `HEADER` order. The header is
/// skipped either way; this only feeds a diagnostic.
pub fn is_expected_header(line: &str) -> bool {
    split_fields(line, ',', FIELD_COUNT)
        .map(|fields| fields.iter().zip(HEADER).all(|(got, want)| got.trim() == want))
        .unwrap_or(false)
}

/// Strips a trailing `\n` or `\r\n`.
pub fn trim_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_exact_count() {
        assert_eq!(split_fields("a,b,c", ',', 3), Ok(vec!["a", "b", "c"]));
        assert_eq!(split_fields("a,,c", ',', 3), Ok(vec!["a", "", "c"]));
    }

    #[test]
    fn test_split_rejects_too_few_and_too_many() {
        assert_eq!(
            split_fields("a,b", ',', 3),
            Err(RecordError::FieldCount { expected: 3, found: 2 })
        );
        assert_eq!(
            split_fields("a,b,c,d", ',', 3),
            Err(RecordError::FieldCount { expected: 3, found: 4 })
        );
    }

    #[test]
    fn test_split_datetime_on_single_space() {
        assert_eq!(
            split_fields("2020-01-15 00:15:00", ' ', 2),
            Ok(vec!["2020-01-15", "00:15:00"])
        );
        assert!(split_fields("2020-01-15T00:15:00", ' ', 2).is_err());
        assert!(split_fields("2020-01-15  00:15:00", ' ', 2).is_err());
    }

    #[test]
    fn test_parse_record_maps_columns() {
        let record = parse_record("S1,Lake,2020-01-01 00:00:00,10,20").unwrap();
        assert_eq!(
            record,
            CsvRecord {
                station_id: "S1",
                station_name: "Lake",
                datetime: "2020-01-01 00:00:00",
                qgag: "10",
                qpcp: "20",
            }
        );
    }

    #[test]
    fn test_parse_record_with_four_fields_fails() {
        let err = parse_record("S1,Lake,2020-01-01 00:00:00,10").unwrap_err();
        assert_eq!(err, RecordError::FieldCount { expected: 5, found: 4 });
    }

    #[test]
    fn test_expected_header_is_recognized() {
        assert!(is_expected_header("stationId,stationName,datetime,qgag,qpcp"));
        assert!(is_expected_header(&HEADER.join(",")));
        assert!(!is_expected_header("STATION,STATION_NAME,DATE,QGAG,QPCP"));
        assert!(!is_expected_header("stationId,stationName,datetime,qgag"));
    }

    #[test]
    fn test_trim_line_ending() {
        assert_eq!(trim_line_ending("a,b\r\n"), "a,b");
        assert_eq!(trim_line_ending("a,b\n"), "a,b");
        assert_eq!(trim_line_ending("a,b\r"), "a,b");
        assert_eq!(trim_line_ending("a,b"), "a,b");
    }
}
