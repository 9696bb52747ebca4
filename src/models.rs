//! Data models for the telemetry monitor.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use thiserror::Error;

// ---

/// Accepted input timestamp layouts, tried in order.
const TIMESTAMP_FORMATS: [&str; 2] = ["%Y%m%d %H:%M:%S%.f", "%Y%m%d %H:%M:%S"];

/// Raised when a timestamp matches neither accepted layout.
#[derive(Debug, Error, PartialEq)]
#[error("unrecognized timestamp '{0}' (expected YYYYMMDD HH:MM:SS[.ffffff])")]
pub struct TimestampError(pub String);

/// Parse a telemetry timestamp, always interpreted as UTC.
pub fn parse_timestamp(text: &str) -> Result<DateTime<Utc>, TimestampError> {
    // ---
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| TimestampError(text.to_string()))
}

/// Instrument class reporting a reading.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Component {
    Thermostat,
    Battery,
    /// Unrecognized code; stored but never evaluated.
    Other(String),
}

impl Component {
    // ---
    pub fn from_code(code: &str) -> Self {
        match code {
            "TSTAT" => Component::Thermostat,
            "BATT" => Component::Battery,
            other => Component::Other(other.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Component::Thermostat => "TSTAT",
            Component::Battery => "BATT",
            Component::Other(code) => code,
        }
    }

    /// Severity raised when this component breaches, if it is checked at all.
    pub fn severity(&self) -> Option<Severity> {
        match self {
            Component::Thermostat => Some(Severity::RedHigh),
            Component::Battery => Some(Severity::RedLow),
            Component::Other(_) => None,
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// The four limits carried on every input line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limits {
    pub red_high: f64,
    pub yellow_high: f64,
    pub yellow_low: f64,
    pub red_low: f64,
}

/// One telemetry sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    // ---
    pub satellite_id: i64,
    pub component: Component,
    pub timestamp: DateTime<Utc>,
    /// Timestamp exactly as it appeared in the input.
    pub raw_timestamp: String,
    pub value: f64,
    pub limits: Limits,
}

impl Reading {
    pub fn key(&self) -> ReadingKey {
        ReadingKey {
            satellite_id: self.satellite_id,
            component: self.component.clone(),
        }
    }

    /// Threshold used by the violation check: red-high for thermostats,
    /// red-low for everything else.
    pub fn limit(&self) -> f64 {
        match self.component {
            Component::Thermostat => self.limits.red_high,
            _ => self.limits.red_low,
        }
    }

    /// Whether the value crosses its red limit in the violating direction.
    pub fn is_breach(&self) -> bool {
        match self.component {
            Component::Thermostat => self.value > self.limit(),
            Component::Battery => self.value < self.limit(),
            Component::Other(_) => false,
        }
    }
}

/// Partition key for reading histories.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReadingKey {
    pub satellite_id: i64,
    pub component: Component,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    RedHigh,
    RedLow,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::RedHigh => "RED HIGH",
            Severity::RedLow => "RED LOW",
        }
    }
}

/// A detected violation. Identity is the full tuple, with the anchor kept as
/// the original input text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Alert {
    pub satellite_id: i64,
    pub severity: Severity,
    pub component: Component,
    pub anchor_timestamp: String,
}

/// Build a reading for satellite 1000 with fixed limits (red-high 101, red-low 20).
#[cfg(test)]
pub(crate) fn test_reading(component: &str, ts: &str, value: f64) -> Reading {
    // ---
    Reading {
        satellite_id: 1000,
        component: Component::from_code(component),
        timestamp: parse_timestamp(ts).unwrap(),
        raw_timestamp: ts.to_string(),
        value,
        limits: Limits {
            red_high: 101.0,
            yellow_high: 98.0,
            yellow_low: 25.0,
            red_low: 20.0,
        },
    }
}
