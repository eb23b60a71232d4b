//! Validated rule base
//!
//! Construction runs static checks on every rule, then walks every evidence
//! state reachable from an empty session, branching on both answers to each
//! question. A rule base is accepted only if every reachable state selects a
//! rule and every path ends in a finalize action.

use std::collections::{BTreeSet, HashSet};

use serde::Serialize;

use super::errors::{RuleError, RuleResult};
use super::selector::first_match;
use super::types::{Action, Expectation, Rule};
use crate::evidence::EvidenceStore;
use crate::network::is_valid_name;

/// Upper bound on states visited by the exhaustive check
pub const MAX_EXPLORED_STATES: usize = 1 << 16;

/// Outcome of the exhaustive check
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RuleBaseReport {
    /// Evidence states visited, terminal ones included
    pub reachable_states: usize,
    /// States that select a finalize rule
    pub terminal_states: usize,
    /// Longest question sequence before a recommendation
    pub max_depth: usize,
    /// Keys asked on at least one path, sorted
    pub question_keys: Vec<String>,
    /// States matched by more than one rule (first one wins)
    pub overlapping_states: usize,
    /// Rules that no reachable state selects
    pub unused_rules: Vec<String>,
}

/// Ordered rule list that has passed validation.
#[derive(Debug, Clone)]
pub struct RuleBase {
    rules: Vec<Rule>,
    report: RuleBaseReport,
}

impl RuleBase {
    /// Validates `rules` and builds the rule base.
    pub fn new(rules: Vec<Rule>) -> RuleResult<Self> {
        if rules.is_empty() {
            return Err(RuleError::empty());
        }

        let mut names = HashSet::with_capacity(rules.len());
        for rule in &rules {
            Self::check_rule(rule)?;
            if !names.insert(rule.name.as_str()) {
                return Err(RuleError::duplicate_name(&rule.name));
            }
        }

        let report = Explorer::new(&rules).run()?;
        Ok(Self { rules, report })
    }

    fn check_rule(rule: &Rule) -> RuleResult<()> {
        if !is_valid_name(&rule.name) {
            return Err(RuleError::invalid_key(&rule.name, &rule.name));
        }

        let mut keys = HashSet::with_capacity(rule.when.len());
        for condition in &rule.when {
            if !is_valid_name(&condition.key) {
                return Err(RuleError::invalid_key(&rule.name, &condition.key));
            }
            if !keys.insert(condition.key.as_str()) {
                return Err(RuleError::repeated_condition(&rule.name, &condition.key));
            }
        }

        if let Action::Ask { key, .. } = &rule.action {
            if !is_valid_name(key) {
                return Err(RuleError::invalid_key(&rule.name, key));
            }
            let guarded = rule
                .when
                .iter()
                .any(|c| &c.key == key && c.expect == Expectation::Unanswered);
            if !guarded {
                return Err(RuleError::unguarded_ask(&rule.name, key));
            }
        }
        Ok(())
    }

    /// Rules in declaration order
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn report(&self) -> &RuleBaseReport {
        &self.report
    }

    /// Number of rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Question text for `key`, if some rule asks it
    pub fn question_for(&self, key: &str) -> Option<&str> {
        self.rules.iter().find_map(|rule| match &rule.action {
            Action::Ask { key: k, question } if k == key => Some(question.as_str()),
            _ => None,
        })
    }
}

/// Depth-first walk over reachable evidence states
struct Explorer<'r> {
    rules: &'r [Rule],
    report: RuleBaseReport,
    asked: BTreeSet<String>,
    fired: Vec<bool>,
}

impl<'r> Explorer<'r> {
    fn new(rules: &'r [Rule]) -> Self {
        Self {
            rules,
            report: RuleBaseReport::default(),
            asked: BTreeSet::new(),
            fired: vec![false; rules.len()],
        }
    }

    fn run(mut self) -> RuleResult<RuleBaseReport> {
        self.visit(&EvidenceStore::new(), 0)?;

        self.report.question_keys = self.asked.into_iter().collect();
        self.report.unused_rules = self
            .rules
            .iter()
            .zip(&self.fired)
            .filter(|(_, fired)| !**fired)
            .map(|(rule, _)| rule.name.clone())
            .collect();
        Ok(self.report)
    }

    fn visit(&mut self, evidence: &EvidenceStore, depth: usize) -> RuleResult<()> {
        self.report.reachable_states += 1;
        if self.report.reachable_states > MAX_EXPLORED_STATES {
            return Err(RuleError::state_limit(MAX_EXPLORED_STATES));
        }

        let firing = first_match(self.rules, evidence)?;
        self.fired[firing.index] = true;
        if self.rules.iter().filter(|r| r.matches(evidence)).count() > 1 {
            self.report.overlapping_states += 1;
        }

        match firing.action() {
            Action::Finalize { .. } => {
                self.report.terminal_states += 1;
                self.report.max_depth = self.report.max_depth.max(depth);
            }
            Action::Ask { key, .. } => {
                self.asked.insert(key.clone());
                for answer in [true, false] {
                    let mut next = evidence.clone();
                    next.record(key.as_str(), answer);
                    self.visit(&next, depth + 1)?;
                }
            }
        }
        Ok(())
    }
}
