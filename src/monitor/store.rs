//! Reading Store: per-key, insertion-ordered reading histories.

use std::collections::HashMap;

use crate::models::{Reading, ReadingKey};

// ---

#[derive(Debug, Default)]
pub struct ReadingStore {
    histories: HashMap<ReadingKey, Vec<Reading>>,
}

impl ReadingStore {
    // ---
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a reading to its key's history, creating the history on first use.
    pub fn record(&mut self, reading: Reading) -> ReadingKey {
        // ---
        let key = reading.key();
        self.histories.entry(key.clone()).or_default().push(reading);
        key
    }

    /// Current history for `key`; empty for keys never recorded.
    pub fn history_for(&self, key: &ReadingKey) -> &[Reading] {
        self.histories.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn key_count(&self) -> usize {
        self.histories.len()
    }
}
