//! Session outputs: the diagnosis, the transcript and the archived record

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::answer::Answer;
use crate::evidence::EvidenceEntry;
use crate::network::CategoryScores;

/// Terminal output of a session, produced exactly once
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticResult {
    /// Arg-max category; the first declared category wins ties
    pub most_probable_category: String,
    pub category_label: String,
    /// P(category = true | evidence) per category. Not normalized across
    /// categories.
    pub category_probabilities: BTreeMap<String, f64>,
    /// Remediation text of the finalize rule
    pub message: String,
    /// Name of the finalize rule that fired
    pub rule: String,
}

impl DiagnosticResult {
    /// Returns `None` when `scores` is empty, which a validated model rules out.
    pub fn from_scores(scores: &CategoryScores, message: &str, rule: &str) -> Option<Self> {
        let best = scores.most_probable()?;
        Some(Self {
            most_probable_category: best.category.clone(),
            category_label: best.label.clone(),
            category_probabilities: scores.to_map(),
            message: message.to_string(),
            rule: rule.to_string(),
        })
    }

    pub fn probability_of(&self, category: &str) -> Option<f64> {
        self.category_probabilities.get(category).copied()
    }
}

/// One question and the answer it received
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub key: String,
    pub question: String,
    pub answer: Answer,
    pub answered_at: DateTime<Utc>,
}

/// Completed session as handed to a [`SessionArchive`](super::SessionArchive)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub session_id: Uuid,
    pub domain: String,
    pub transcript: Vec<TranscriptEntry>,
    pub evidence: Vec<EvidenceEntry>,
    pub result: DiagnosticResult,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

impl SessionRecord {
    /// Serialize to one JSON line
    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{builtin, Domain};
    use crate::network::VariableElimination;

    #[test]
    fn test_from_scores_picks_argmax() {
        let domain = Domain::from_definition(builtin::brakes::definition()).unwrap();
        let mut obs = BTreeMap::new();
        obs.insert("making_noise".to_string(), true);
        obs.insert("squealing".to_string(), true);

        let scores = VariableElimination::new(domain.model()).score(&obs).unwrap();
        let result = DiagnosticResult::from_scores(&scores, "Check pads.", "pads_and_shoes").unwrap();

        assert_eq!(result.most_probable_category, "BrakePadOrRotorIssue");
        assert_eq!(result.category_label, "Brake pad or rotor issues");
        assert_eq!(result.category_probabilities.len(), 5);
        assert_eq!(result.rule, "pads_and_shoes");
        let p = result.probability_of("BrakePadOrRotorIssue").unwrap();
        assert!(p > 0.9);
    }
}
