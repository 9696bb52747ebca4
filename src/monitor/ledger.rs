//! Alert Ledger: append-only, deduplicated, insertion-ordered alerts.

use std::collections::HashSet;

use crate::models::Alert;

// ---

#[derive(Debug, Default)]
pub struct AlertLedger {
    alerts: Vec<Alert>,
    seen: HashSet<Alert>,
}

impl AlertLedger {
    // ---
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `alert` unless an identical one is already present.
    /// Returns whether it was inserted.
    pub fn add(&mut self, alert: Alert) -> bool {
        // ---
        if !self.seen.insert(alert.clone()) {
            return false;
        }
        self.alerts.push(alert);
        true
    }

    /// Alerts in the order they were first added.
    pub fn all(&self) -> &[Alert] {
        &self.alerts
    }

    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }
}
