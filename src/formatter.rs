//! Renders the alert ledger as the JSON report printed on stdout.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::models::{parse_timestamp, Alert};
use crate::monitor::AlertLedger;

// ---

/// Output layout for anchor timestamps: millisecond precision, UTC marker.
const OUTPUT_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// One element of the output array.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AlertRecord<'a> {
    satellite_id: i64,
    severity: &'static str,
    component: &'a str,
    timestamp: String,
}

impl<'a> AlertRecord<'a> {
    fn from_alert(alert: &'a Alert) -> Result<Self> {
        // ---
        let anchor = parse_timestamp(&alert.anchor_timestamp).with_context(|| {
            format!(
                "Alert anchor for satellite {} is not a valid timestamp",
                alert.satellite_id
            )
        })?;

        Ok(AlertRecord {
            satellite_id: alert.satellite_id,
            severity: alert.severity.as_str(),
            component: alert.component.code(),
            timestamp: anchor.format(OUTPUT_TIMESTAMP_FORMAT).to_string(),
        })
    }
}

/// Render every alert, in ledger order, as a JSON array indented by four spaces.
///
/// Fails if an anchor timestamp no longer parses; nothing is returned in
/// that case, so a caller never prints a partial report.
pub fn render(ledger: &AlertLedger) -> Result<String> {
    // ---
    let records = ledger
        .all()
        .iter()
        .map(AlertRecord::from_alert)
        .collect::<Result<Vec<_>>>()?;

    let mut out = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
    records
        .serialize(&mut serializer)
        .context("Failed to serialize alerts")?;

    String::from_utf8(out).context("Serialized alerts are not valid UTF-8")
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::models::{Component, Severity};

    fn ledger_with(alerts: Vec<Alert>) -> AlertLedger {
        let mut ledger = AlertLedger::new();
        for alert in alerts {
            ledger.add(alert);
        }
        ledger
    }

    fn alert(satellite_id: i64, component: Component, anchor: &str) -> Alert {
        Alert {
            satellite_id,
            severity: component.severity().unwrap(),
            component,
            anchor_timestamp: anchor.to_string(),
        }
    }

    #[test]
    fn test_empty_ledger_renders_empty_array() {
        // ---
        assert_eq!(render(&AlertLedger::new()).unwrap(), "[]");
    }

    #[test]
    fn test_render_layout() {
        // ---
        let ledger = ledger_with(vec![alert(1000, Component::Thermostat, "20231001 10:00:00")]);

        let expected = r#"[
    {
        "satelliteId": 1000,
        "severity": "RED HIGH",
        "component": "TSTAT",
        "timestamp": "2023-10-01T10:00:00.000Z"
    }
]"#;
        assert_eq!(render(&ledger).unwrap(), expected);
    }

    #[test]
    fn test_render_keeps_ledger_order() {
        // ---
        let ledger = ledger_with(vec![
            alert(1000, Component::Battery, "20180101 23:01:09.521"),
            alert(1000, Component::Thermostat, "20180101 23:01:38.001"),
        ]);

        let parsed: serde_json::Value = serde_json::from_str(&render(&ledger).unwrap()).unwrap();
        assert_eq!(parsed[0]["severity"], "RED LOW");
        assert_eq!(parsed[0]["component"], "BATT");
        assert_eq!(parsed[0]["timestamp"], "2018-01-01T23:01:09.521Z");
        assert_eq!(parsed[1]["severity"], "RED HIGH");
        assert_eq!(parsed[1]["timestamp"], "2018-01-01T23:01:38.001Z");
    }

    #[test]
    fn test_sub_millisecond_digits_are_truncated() {
        // ---
        let ledger = ledger_with(vec![alert(7, Component::Battery, "20231001 10:00:00.123987")]);
        let parsed: serde_json::Value = serde_json::from_str(&render(&ledger).unwrap()).unwrap();
        assert_eq!(parsed[0]["timestamp"], "2023-10-01T10:00:00.123Z");
        assert_eq!(parsed[0]["satelliteId"], 7);
    }

    #[test]
    fn test_corrupt_anchor_is_fatal() {
        // ---
        let ledger = ledger_with(vec![
            alert(1000, Component::Thermostat, "20231001 10:00:00"),
            Alert {
                satellite_id: 1001,
                severity: Severity::RedLow,
                component: Component::Battery,
                anchor_timestamp: "yesterday".to_string(),
            },
        ]);

        let err = render(&ledger).unwrap_err();
        assert!(format!("{:#}", err).contains("satellite 1001"));
    }
}
