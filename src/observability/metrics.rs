//! Metrics registry
//!
//! - Counters only (no gauges, no histograms)
//! - Monotonic increase
//! - Reset only on process start
//! - Thread-safe but lock-free

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Operational counters of a diagnosis service
///
/// All counters use Relaxed atomics; exact totals, no cross-counter ordering.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    domains_loaded: AtomicU64,
    sessions_started: AtomicU64,
    questions_asked: AtomicU64,
    answers_accepted: AtomicU64,
    answers_rejected: AtomicU64,
    inference_runs: AtomicU64,
    diagnoses_completed: AtomicU64,
    sessions_archived: AtomicU64,
    archive_failures: AtomicU64,
}

impl MetricsRegistry {
    /// Create a new metrics registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_domains_loaded(&self) {
        self.domains_loaded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_sessions_started(&self) {
        self.sessions_started.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_questions_asked(&self) {
        self.questions_asked.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_answers_accepted(&self) {
        self.answers_accepted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_answers_rejected(&self) {
        self.answers_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_inference_runs(&self) {
        self.inference_runs.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_diagnoses_completed(&self) {
        self.diagnoses_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_sessions_archived(&self) {
        self.sessions_archived.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_archive_failures(&self) {
        self.archive_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current snapshot of all metrics as JSON
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.snapshot()).unwrap_or_else(|_| "{}".to_string())
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            domains_loaded: self.domains_loaded.load(Ordering::Relaxed),
            sessions_started: self.sessions_started.load(Ordering::Relaxed),
            questions_asked: self.questions_asked.load(Ordering::Relaxed),
            answers_accepted: self.answers_accepted.load(Ordering::Relaxed),
            answers_rejected: self.answers_rejected.load(Ordering::Relaxed),
            inference_runs: self.inference_runs.load(Ordering::Relaxed),
            diagnoses_completed: self.diagnoses_completed.load(Ordering::Relaxed),
            sessions_archived: self.sessions_archived.load(Ordering::Relaxed),
            archive_failures: self.archive_failures.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub domains_loaded: u64,
    pub sessions_started: u64,
    pub questions_asked: u64,
    pub answers_accepted: u64,
    pub answers_rejected: u64,
    pub inference_runs: u64,
    pub diagnoses_completed: u64,
    pub sessions_archived: u64,
    pub archive_failures: u64,
}
