//! Line ingestion for pipe-delimited telemetry files.
//!
//! Each non-blank line carries, in order: timestamp, satellite id, red-high,
//! yellow-high, yellow-low and red-low limits, raw value, component code.
//! Lines are parsed in file order and handed back as [`Reading`]s; the caller
//! decides what to do with them.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::{parse_timestamp, Component, Limits, Reading, TimestampError};

// ---

const DELIMITER: char = '|';
const FIELD_COUNT: usize = 8;

/// Reasons a single line cannot become a [`Reading`].
#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("invalid {field} '{value}'")]
    InvalidNumber { field: &'static str, value: String },

    #[error(transparent)]
    Timestamp(#[from] TimestampError),
}

fn parse_field<T: FromStr>(raw: &str, field: &'static str) -> Result<T, ParseError> {
    // ---
    raw.trim().parse::<T>().map_err(|_| ParseError::InvalidNumber {
        field,
        value: raw.to_string(),
    })
}

/// Parse one telemetry line.
pub fn parse_line(line: &str) -> Result<Reading, ParseError> {
    // ---
    let fields: Vec<&str> = line.trim().split(DELIMITER).collect();
    if fields.len() != FIELD_COUNT {
        return Err(ParseError::FieldCount {
            expected: FIELD_COUNT,
            found: fields.len(),
        });
    }

    let raw_timestamp = fields[0].trim();
    let timestamp = parse_timestamp(raw_timestamp)?;

    Ok(Reading {
        satellite_id: parse_field(fields[1], "satellite id")?,
        component: Component::from_code(fields[7].trim()),
        timestamp,
        raw_timestamp: raw_timestamp.to_string(),
        value: parse_field(fields[6], "raw value")?,
        limits: Limits {
            red_high: parse_field(fields[2], "red high limit")?,
            yellow_high: parse_field(fields[3], "yellow high limit")?,
            yellow_low: parse_field(fields[4], "yellow low limit")?,
            red_low: parse_field(fields[5], "red low limit")?,
        },
    })
}

/// Read every reading from `path`, in file order.
///
/// Blank lines are ignored. A malformed line aborts the read unless
/// `skip_malformed` is set, in which case it is logged and dropped.
pub fn read_readings(path: &Path, skip_malformed: bool) -> Result<Vec<Reading>> {
    // ---
    let file = File::open(path)
        .with_context(|| format!("Failed to open input file '{}'", path.display()))?;

    let mut readings = Vec::new();
    let mut skipped = 0usize;

    for (idx, line) in BufReader::new(file).lines().enumerate() {
        let line_no = idx + 1;
        let line = line.with_context(|| {
            format!("Failed to read line {} of '{}'", line_no, path.display())
        })?;

        if line.trim().is_empty() {
            continue;
        }

        match parse_line(&line) {
            Ok(reading) => readings.push(reading),
            Err(e) if skip_malformed => {
                warn!("Skipping malformed line {}: {} - Raw line: {}", line_no, e, line);
                skipped += 1;
            }
            Err(e) => {
                debug!("Rejecting line {}: {}", line_no, line);
                return Err(e).with_context(|| {
                    format!("Malformed line {} in '{}'", line_no, path.display())
                });
            }
        }
    }

    info!(
        "Read {} readings from '{}' ({} skipped)",
        readings.len(),
        path.display(),
        skipped
    );
    Ok(readings)
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use std::io::Write;

    const GOOD_LINE: &str = "20180101 23:01:05.001|1001|101|98|25|20|99.9|TSTAT";

    fn write_input(lines: &[&str]) -> tempfile::NamedTempFile {
        // ---
        let mut file = tempfile::NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_parse_good_line() {
        // ---
        let reading = parse_line(GOOD_LINE).unwrap();

        assert_eq!(reading.satellite_id, 1001);
        assert_eq!(reading.component, Component::Thermostat);
        assert_eq!(reading.raw_timestamp, "20180101 23:01:05.001");
        assert_eq!(reading.value, 99.9);
        assert_eq!(reading.limits.red_high, 101.0);
        assert_eq!(reading.limits.yellow_high, 98.0);
        assert_eq!(reading.limits.yellow_low, 25.0);
        assert_eq!(reading.limits.red_low, 20.0);
    }

    #[test]
    fn test_parse_trims_line_ending() {
        // ---
        let reading = parse_line("20180101 23:01:09.521|1000|17|15|9|8|7.8|BATT\r\n").unwrap();
        assert_eq!(reading.component, Component::Battery);
        assert_eq!(reading.value, 7.8);
    }

    #[test]
    fn test_parse_unknown_component_passes_through() {
        // ---
        let reading = parse_line("20180101 23:01:05|1001|101|98|25|20|99.9|GYRO").unwrap();
        assert_eq!(reading.component, Component::Other("GYRO".to_string()));
    }

    #[test]
    fn test_parse_wrong_field_count() {
        // ---
        let err = parse_line("20180101 23:01:05|1001|101|98|25|20|99.9").unwrap_err();
        assert_eq!(
            err,
            ParseError::FieldCount {
                expected: 8,
                found: 7
            }
        );
    }

    #[test]
    fn test_parse_non_numeric_value() {
        // ---
        let err = parse_line("20180101 23:01:05|1001|101|98|25|20|hot|TSTAT").unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidNumber {
                field: "raw value",
                value: "hot".to_string()
            }
        );

        let err = parse_line("20180101 23:01:05|sat|101|98|25|20|1|TSTAT").unwrap_err();
        assert!(matches!(
            err,
            ParseError::InvalidNumber {
                field: "satellite id",
                ..
            }
        ));
    }

    #[test]
    fn test_parse_bad_timestamp() {
        // ---
        let err = parse_line("2018-01-01 23:01:05|1001|101|98|25|20|99.9|TSTAT").unwrap_err();
        assert!(matches!(err, ParseError::Timestamp(_)));
    }

    #[test]
    fn test_read_skips_blank_lines() {
        // ---
        let file = write_input(&[GOOD_LINE, "", "   ", GOOD_LINE]);
        let readings = read_readings(file.path(), false).unwrap();
        assert_eq!(readings.len(), 2);
    }

    #[test]
    fn test_read_aborts_on_malformed_line() {
        // ---
        let file = write_input(&[GOOD_LINE, "not a reading", GOOD_LINE]);
        let err = read_readings(file.path(), false).unwrap_err();

        let message = format!("{:#}", err);
        assert!(message.contains("Malformed line 2"), "got: {}", message);
        assert!(message.contains("expected 8 fields"), "got: {}", message);
    }

    #[test]
    fn test_read_skip_mode_drops_malformed_line() {
        // ---
        let file = write_input(&[GOOD_LINE, "not a reading", GOOD_LINE]);
        let readings = read_readings(file.path(), true).unwrap();
        assert_eq!(readings.len(), 2);
    }

    #[test]
    fn test_read_missing_file() {
        // ---
        let dir = tempfile::tempdir().unwrap();
        let err = read_readings(&dir.path().join("absent.txt"), false).unwrap_err();
        assert!(err.to_string().contains("Failed to open input file"));
    }
}
