//! Rule types
//!
//! A rule is a conjunction of preconditions over question keys plus one
//! action. JSON form:
//!
//! ```json
//! {
//!   "name": "ask_pedal_to_floor",
//!   "when": [
//!     {"key": "pedal_to_floor", "expect": "unanswered"},
//!     {"key": "brakes_stop_car", "expect": "no"}
//!   ],
//!   "action": {"type": "ask", "key": "pedal_to_floor", "question": "Does the pedal go to floor?"}
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::evidence::EvidenceStore;

/// Required state of a question key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Expectation {
    /// Answered "yes"
    Yes,
    /// Answered "no"
    No,
    /// Not answered yet
    Unanswered,
}

impl Expectation {
    pub fn from_answer(observed: bool) -> Self {
        if observed {
            Expectation::Yes
        } else {
            Expectation::No
        }
    }
}

/// One condition of a rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Precondition {
    pub key: String,
    pub expect: Expectation,
}

impl Precondition {
    /// Evaluates the condition against the latest decision for `key`.
    pub fn holds(&self, evidence: &EvidenceStore) -> bool {
        match (self.expect, evidence.get(&self.key)) {
            (Expectation::Unanswered, None) => true,
            (Expectation::Yes, Some(true)) => true,
            (Expectation::No, Some(false)) => true,
            _ => false,
        }
    }
}

/// What a rule does when selected
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Action {
    /// Ask the user a yes/no question bound to `key`
    Ask { key: String, question: String },
    /// End the session with a recommendation
    Finalize { message: String },
}

/// Named conjunction of preconditions with an action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub name: String,
    #[serde(default)]
    pub when: Vec<Precondition>,
    pub action: Action,
}

impl Rule {
    /// Ask rule guarded by its own key being unanswered.
    pub fn ask(name: &str, key: &str, question: &str) -> Self {
        Self {
            name: name.to_string(),
            when: vec![Precondition {
                key: key.to_string(),
                expect: Expectation::Unanswered,
            }],
            action: Action::Ask {
                key: key.to_string(),
                question: question.to_string(),
            },
        }
    }

    pub fn finalize(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            when: Vec::new(),
            action: Action::Finalize {
                message: message.to_string(),
            },
        }
    }

    /// Requires `key` to have been answered "yes".
    pub fn yes(self, key: &str) -> Self {
        self.expect(key, Expectation::Yes)
    }

    /// Requires `key` to have been answered "no".
    pub fn no(self, key: &str) -> Self {
        self.expect(key, Expectation::No)
    }

    pub fn expect(mut self, key: &str, expect: Expectation) -> Self {
        self.when.push(Precondition {
            key: key.to_string(),
            expect,
        });
        self
    }

    /// All preconditions hold.
    pub fn matches(&self, evidence: &EvidenceStore) -> bool {
        self.when.iter().all(|p| p.holds(evidence))
    }

    /// Key asked by this rule, if it is an ask rule
    pub fn asked_key(&self) -> Option<&str> {
        match &self.action {
            Action::Ask { key, .. } => Some(key),
            Action::Finalize { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precondition_holds() {
        let mut evidence = EvidenceStore::new();
        let unanswered = Precondition {
            key: "squealing".into(),
            expect: Expectation::Unanswered,
        };
        let yes = Precondition {
            key: "squealing".into(),
            expect: Expectation::Yes,
        };
        assert!(unanswered.holds(&evidence));
        assert!(!yes.holds(&evidence));

        evidence.record("squealing", true);
        assert!(!unanswered.holds(&evidence));
        assert!(yes.holds(&evidence));
    }

    #[test]
    fn test_ask_builder_adds_guard() {
        let rule = Rule::ask("ask_clunks", "clunks", "Clunks?").no("squealing");
        assert_eq!(rule.when.len(), 2);
        assert_eq!(rule.when[0].expect, Expectation::Unanswered);
        assert_eq!(rule.when[0].key, "clunks");
        assert_eq!(rule.asked_key(), Some("clunks"));
    }

    #[test]
    fn test_matches_conjunction() {
        let rule = Rule::finalize("done", "msg").yes("a").no("b");
        let mut evidence = EvidenceStore::new();
        evidence.record("a", true);
        assert!(!rule.matches(&evidence));
        evidence.record("b", false);
        assert!(rule.matches(&evidence));
    }

    #[test]
    fn test_rule_json_shape() {
        let json = r#"{
            "name": "ask_pedal_to_floor",
            "when": [
                {"key": "pedal_to_floor", "expect": "unanswered"},
                {"key": "brakes_stop_car", "expect": "no"}
            ],
            "action": {"type": "ask", "key": "pedal_to_floor", "question": "Does the pedal go to floor?"}
        }"#;
        let rule: Rule = serde_json::from_str(json).unwrap();
        assert_eq!(
            rule,
            Rule::ask(
                "ask_pedal_to_floor",
                "pedal_to_floor",
                "Does the pedal go to floor?"
            )
            .no("brakes_stop_car")
        );
    }

    #[test]
    fn test_finalize_json_shape() {
        let rule = Rule::finalize("fix_fluid", "Fill to line.").no("brake_fluid_ok");
        let value = serde_json::to_value(&rule).unwrap();
        assert_eq!(value["action"]["type"], "finalize");
        assert_eq!(value["when"][0]["expect"], "no");
    }
}
