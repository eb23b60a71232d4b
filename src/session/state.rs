//! Session state machine
//!
//! ```text
//! AwaitingFirstQuestion --start--> AwaitingAnswer --submit--> AwaitingAnswer
//!                                        |
//!                                        +--submit (finalize)--> Completed
//! ```
//!
//! `Completed` is absorbing.

use std::fmt;

use serde::Serialize;

use super::result::DiagnosticResult;

/// Lifecycle state of a diagnostic session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    AwaitingFirstQuestion,
    AwaitingAnswer,
    Completed,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::AwaitingFirstQuestion => "AWAITING_FIRST_QUESTION",
            SessionState::AwaitingAnswer => "AWAITING_ANSWER",
            SessionState::Completed => "COMPLETED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Completed)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The question a session is waiting on
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingQuestion {
    pub key: String,
    pub text: String,
}

/// What a session produced after `start` or `submit`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Question(PendingQuestion),
    Diagnosis(DiagnosticResult),
}

impl Step {
    pub fn question(&self) -> Option<&PendingQuestion> {
        match self {
            Step::Question(q) => Some(q),
            Step::Diagnosis(_) => None,
        }
    }

    pub fn diagnosis(&self) -> Option<&DiagnosticResult> {
        match self {
            Step::Diagnosis(r) => Some(r),
            Step::Question(_) => None,
        }
    }

    pub fn is_final(&self) -> bool {
        matches!(self, Step::Diagnosis(_))
    }
}
