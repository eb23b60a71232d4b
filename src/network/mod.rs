//! Causal Model subsystem
//!
//! A discrete Bayesian network over binary variables. Category nodes are
//! subsystem-level causes; symptom nodes are yes/no observations bound to
//! question keys by name.
//!
//! # Invariants
//!
//! - The node/edge graph is acyclic
//! - Every node has exactly one CPT conditioned on exactly its parents
//! - Every CPT column sums to 1 within `CPT_TOLERANCE`
//! - Every symptom has at least one parent; categories may have parents
//! - Inference is exact and deterministic for a given model and evidence
//! - Observations for keys the model does not contain are ignored

mod errors;
mod factor;
mod inference;
mod model;
mod types;

pub use errors::{ModelError, ModelErrorCode, ModelResult};
pub use inference::{CategoryScore, CategoryScores, VariableElimination};
pub use model::{is_valid_name, CausalModel, Cpt, Node, CPT_TOLERANCE};
pub use types::{CptSpec, NetworkDefinition, NodeKind, NodeSpec};
