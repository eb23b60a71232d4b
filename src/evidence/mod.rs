//! Evidence Store subsystem
//!
//! An ordered, append-only log of `(question_key, observed)` pairs collected
//! during one diagnostic session.
//!
//! # Invariants
//!
//! - The log preserves conversation order and is never rewritten
//! - At most one *decision* exists per question key: re-recording a key
//!   overwrites the value used for rule matching and inference
//! - Observations are exposed in a deterministic (sorted) order

mod store;

pub use store::{EvidenceEntry, EvidenceStore, Observations};
