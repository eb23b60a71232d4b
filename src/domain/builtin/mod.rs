//! Built-in domains
//!
//! Brakes, noises and starting problems, with the questions, messages and
//! probability tables the service ships with.

pub mod brakes;
pub mod noises;
pub mod starting;

use super::types::DomainDefinition;

/// Built-in definitions in listing order
pub fn all() -> Vec<DomainDefinition> {
    vec![brakes::definition(), noises::definition(), starting::definition()]
}
