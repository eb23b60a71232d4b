//! Diagnosable domains
//!
//! A domain pairs an ordered rule base with a causal network. Question keys
//! asked by the rules are the symptom node names of the network; keys the
//! network does not model are reported at load time and ignored by
//! inference.
//!
//! Domains are validated once, when they are built, and shared read-only
//! through the [`DomainRegistry`] afterwards.

pub mod builtin;
mod errors;
mod loader;
mod registry;
mod types;

pub use errors::{DomainError, DomainResult};
pub use loader::DomainLoader;
pub use registry::DomainRegistry;
pub use types::{CategorySummary, Domain, DomainDefinition, DomainReport, DomainSummary};
