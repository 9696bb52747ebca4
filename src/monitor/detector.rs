//! Violation Detector.
//!
//! Looks at a key's full reading history and decides whether three red-limit
//! breaches fall inside one window (inclusive). The detector holds no state
//! between calls: the answer depends only on the history it is given.

use chrono::Duration;

use crate::models::{Alert, Reading, ReadingKey};

// ---

/// Breaches needed inside one window to raise an alert.
pub const BREACH_COUNT: usize = 3;

/// Default window between the first and last breach of a triple.
pub const DEFAULT_WINDOW_SECS: u32 = 5 * 60;

#[derive(Debug, Clone)]
pub struct Detector {
    window: Duration,
}

impl Default for Detector {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_SECS)
    }
}

impl Detector {
    // ---
    pub fn new(window_secs: u32) -> Self {
        Self {
            window: Duration::seconds(i64::from(window_secs)),
        }
    }

    /// Evaluate `history` for `key` and return the earliest qualifying alert.
    ///
    /// Only breach readings count. They are stably sorted by timestamp, then
    /// consecutive triples are scanned; the first triple whose first and third
    /// timestamps are at most one window apart anchors the alert at the first
    /// reading's original text. Components without a red check yield `None`.
    pub fn evaluate(&self, key: &ReadingKey, history: &[Reading]) -> Option<Alert> {
        // ---
        let severity = key.component.severity()?;

        let mut breaches: Vec<&Reading> = history.iter().filter(|r| r.is_breach()).collect();
        if breaches.len() < BREACH_COUNT {
            return None;
        }

        breaches.sort_by_key(|r| r.timestamp);

        let anchor = breaches
            .windows(BREACH_COUNT)
            .find(|triple| triple[BREACH_COUNT - 1].timestamp - triple[0].timestamp <= self.window)
            .map(|triple| triple[0])?;

        Some(Alert {
            satellite_id: key.satellite_id,
            severity,
            component: key.component.clone(),
            anchor_timestamp: anchor.raw_timestamp.clone(),
        })
    }
}
