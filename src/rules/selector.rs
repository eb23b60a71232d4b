//! Forward-chaining rule selection
//!
//! Rules are tried in declaration order and the first whose preconditions
//! all hold fires. Selection reads the evidence and never changes it.

use super::base::RuleBase;
use super::errors::{RuleError, RuleResult};
use super::types::{Action, Rule};
use crate::evidence::EvidenceStore;

/// The rule chosen for an evidence state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Firing<'r> {
    /// Position of the rule in the rule base
    pub index: usize,
    pub rule: &'r Rule,
}

impl<'r> Firing<'r> {
    pub fn name(&self) -> &'r str {
        &self.rule.name
    }

    pub fn action(&self) -> &'r Action {
        &self.rule.action
    }
}

/// Selects the next action for a session's evidence.
#[derive(Debug, Clone, Copy)]
pub struct ForwardChainingSelector<'r> {
    rules: &'r RuleBase,
}

impl<'r> ForwardChainingSelector<'r> {
    pub fn new(rules: &'r RuleBase) -> Self {
        Self { rules }
    }

    /// First matching rule, or a configuration error if none matches.
    pub fn select(&self, evidence: &EvidenceStore) -> RuleResult<Firing<'r>> {
        first_match(self.rules.rules(), evidence)
    }
}

pub(crate) fn first_match<'r>(rules: &'r [Rule], evidence: &EvidenceStore) -> RuleResult<Firing<'r>> {
    let (index, rule) = rules
        .iter()
        .enumerate()
        .find(|(_, rule)| rule.matches(evidence))
        .ok_or_else(|| RuleError::no_match(&describe(evidence)))?;

    if let Some(key) = rule.asked_key() {
        if evidence.is_answered(key) {
            return Err(RuleError::reask(&rule.name, key));
        }
    }
    Ok(Firing { index, rule })
}

/// Renders the evidence as `key=yes, key=no` in key order.
pub fn describe(evidence: &EvidenceStore) -> String {
    evidence
        .observations()
        .iter()
        .map(|(key, &observed)| format!("{}={}", key, if observed { "yes" } else { "no" }))
        .collect::<Vec<_>>()
        .join(", ")
}
