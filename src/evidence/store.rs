//! Append-only evidence log with a latest-value index

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Latest answer per question key, sorted by key.
///
/// This is the observation set handed to the inference engine.
pub type Observations = BTreeMap<String, bool>;

/// One recorded answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceEntry {
    /// Position in the log, starting at 0
    pub sequence: u64,
    /// Question key the answer belongs to
    pub key: String,
    /// `true` for "yes", `false` for "no"
    pub observed: bool,
    /// When the answer was recorded
    pub recorded_at: DateTime<Utc>,
}

/// Evidence collected during one session.
#[derive(Debug, Clone, Default)]
pub struct EvidenceStore {
    log: Vec<EvidenceEntry>,
    latest: Observations,
}

impl EvidenceStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an answer to the log and makes it the current decision for `key`.
    pub fn record(&mut self, key: impl Into<String>, observed: bool) -> &EvidenceEntry {
        let key = key.into();
        let entry = EvidenceEntry {
            sequence: self.log.len() as u64,
            key: key.clone(),
            observed,
            recorded_at: Utc::now(),
        };
        self.latest.insert(key, observed);
        self.log.push(entry);
        &self.log[self.log.len() - 1]
    }

    /// Returns the current decision for `key`, if answered.
    pub fn get(&self, key: &str) -> Option<bool> {
        self.latest.get(key).copied()
    }

    /// Checks whether `key` has been answered.
    pub fn is_answered(&self, key: &str) -> bool {
        self.latest.contains_key(key)
    }

    /// Returns the full log in conversation order.
    pub fn entries(&self) -> &[EvidenceEntry] {
        &self.log
    }

    /// Returns the latest decisions as an observation set.
    pub fn observations(&self) -> &Observations {
        &self.latest
    }

    /// Number of log entries (including overwritten ones)
    pub fn len(&self) -> usize {
        self.log.len()
    }

    /// Checks if nothing was recorded yet
    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    /// Number of distinct answered keys
    pub fn answered_keys(&self) -> usize {
        self.latest.len()
    }
}
