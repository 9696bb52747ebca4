//! Monitoring gateway.
//!
//! [`Monitor`] owns all run state (reading histories and the alert ledger)
//! and is threaded through ingestion by `main.rs`. Submodules stay private to
//! this gateway; callers only see the types re-exported here.

use tracing::{debug, info};

use crate::models::Reading;

mod detector;
mod ledger;
mod store;

pub use detector::{Detector, DEFAULT_WINDOW_SECS};
pub use ledger::AlertLedger;
pub use store::ReadingStore;

// ---

#[derive(Debug, Default)]
pub struct Monitor {
    store: ReadingStore,
    detector: Detector,
    ledger: AlertLedger,
}

impl Monitor {
    // ---
    pub fn new(detector: Detector) -> Self {
        Self {
            store: ReadingStore::new(),
            detector,
            ledger: AlertLedger::new(),
        }
    }

    /// Record one reading, re-evaluate its key, and absorb any new alert.
    /// Returns whether a new alert was added.
    pub fn ingest(&mut self, reading: Reading) -> bool {
        // ---
        let key = self.store.record(reading);
        let Some(alert) = self.detector.evaluate(&key, self.store.history_for(&key)) else {
            return false;
        };

        if self.ledger.add(alert.clone()) {
            info!(
                satellite_id = alert.satellite_id,
                component = %alert.component,
                severity = alert.severity.as_str(),
                anchor = %alert.anchor_timestamp,
                "New alert"
            );
            true
        } else {
            debug!("Duplicate alert for {:?} ignored", key);
            false
        }
    }

    /// Feed every reading, in order. Returns the number of new alerts.
    pub fn ingest_all<I>(&mut self, readings: I) -> usize
    where
        I: IntoIterator<Item = Reading>,
    {
        readings
            .into_iter()
            .map(|reading| self.ingest(reading))
            .filter(|added| *added)
            .count()
    }

    pub fn ledger(&self) -> &AlertLedger {
        &self.ledger
    }

    pub fn store(&self) -> &ReadingStore {
        &self.store
    }
}
