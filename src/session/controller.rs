//! Diagnostic session controller
//!
//! Drives one conversation: records each answer, asks the selector for the
//! next rule and, once a finalize rule fires, scores the categories.
//!
//! Every transition is computed on a copy of the evidence and committed only
//! when it succeeds, so a rejected or failed call leaves the session as it
//! was.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::answer::Answer;
use super::errors::{SessionError, SessionResult};
use super::result::{DiagnosticResult, SessionRecord, TranscriptEntry};
use super::state::{PendingQuestion, SessionState, Step};
use crate::domain::Domain;
use crate::evidence::EvidenceStore;
use crate::network::{ModelError, VariableElimination};
use crate::rules::{Action, ForwardChainingSelector};

/// One user's diagnosis in one domain
#[derive(Debug, Clone)]
pub struct DiagnosticSession {
    id: Uuid,
    domain: Arc<Domain>,
    state: SessionState,
    evidence: EvidenceStore,
    transcript: Vec<TranscriptEntry>,
    pending: Option<PendingQuestion>,
    result: Option<DiagnosticResult>,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

/// Outcome of evaluating the rules against a candidate evidence state
enum Advance {
    Ask(PendingQuestion),
    Finish(DiagnosticResult),
}

impl DiagnosticSession {
    pub fn new(domain: Arc<Domain>) -> Self {
        Self::with_id(Uuid::new_v4(), domain)
    }

    pub fn with_id(id: Uuid, domain: Arc<Domain>) -> Self {
        Self {
            id,
            domain,
            state: SessionState::AwaitingFirstQuestion,
            evidence: EvidenceStore::new(),
            transcript: Vec::new(),
            pending: None,
            result: None,
            started_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Selects the first question.
    ///
    /// Calling `start` on a session that already started returns its current
    /// step without changing anything.
    pub fn start(&mut self) -> SessionResult<Step> {
        if self.state != SessionState::AwaitingFirstQuestion {
            return self.current_step();
        }
        let advance = self.advance(&self.evidence)?;
        Ok(self.commit(advance))
    }

    /// Parses `raw` and submits it. Invalid input leaves the session unchanged.
    pub fn submit(&mut self, raw: &str) -> SessionResult<Step> {
        self.ensure_open()?;
        let answer: Answer = raw.parse()?;
        self.submit_answer(answer)
    }

    /// Records `answer` for the pending question and advances.
    pub fn submit_answer(&mut self, answer: Answer) -> SessionResult<Step> {
        self.ensure_open()?;
        let pending = self
            .pending
            .clone()
            .ok_or_else(|| SessionError::NotStarted(self.id.to_string()))?;

        let mut evidence = self.evidence.clone();
        let recorded_at = evidence.record(pending.key.as_str(), answer.as_bool()).recorded_at;
        let advance = self.advance(&evidence)?;

        self.evidence = evidence;
        self.transcript.push(TranscriptEntry {
            key: pending.key,
            question: pending.text,
            answer,
            answered_at: recorded_at,
        });
        Ok(self.commit(advance))
    }

    fn ensure_open(&self) -> SessionResult<()> {
        match self.state {
            SessionState::Completed => Err(SessionError::SessionCompleted(self.id.to_string())),
            SessionState::AwaitingFirstQuestion => Err(SessionError::NotStarted(self.id.to_string())),
            SessionState::AwaitingAnswer => Ok(()),
        }
    }

    fn advance(&self, evidence: &EvidenceStore) -> SessionResult<Advance> {
        let rules = self.domain.rules();
        let firing = ForwardChainingSelector::new(rules).select(evidence)?;

        match firing.action() {
            Action::Ask { key, question } => Ok(Advance::Ask(PendingQuestion {
                key: key.clone(),
                text: question.clone(),
            })),
            Action::Finalize { message } => {
                let scores = VariableElimination::new(self.domain.model())
                    .score(evidence.observations())?;
                let result = DiagnosticResult::from_scores(&scores, message, firing.name())
                    .ok_or_else(ModelError::no_categories)?;
                Ok(Advance::Finish(result))
            }
        }
    }

    fn commit(&mut self, advance: Advance) -> Step {
        match advance {
            Advance::Ask(question) => {
                self.state = SessionState::AwaitingAnswer;
                self.pending = Some(question.clone());
                Step::Question(question)
            }
            Advance::Finish(result) => {
                self.state = SessionState::Completed;
                self.pending = None;
                self.completed_at = Some(Utc::now());
                self.result = Some(result.clone());
                Step::Diagnosis(result)
            }
        }
    }

    /// The pending question or the final result
    pub fn current_step(&self) -> SessionResult<Step> {
        match (&self.pending, &self.result) {
            (_, Some(result)) => Ok(Step::Diagnosis(result.clone())),
            (Some(question), None) => Ok(Step::Question(question.clone())),
            (None, None) => Err(SessionError::NotStarted(self.id.to_string())),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_completed(&self) -> bool {
        self.state.is_terminal()
    }

    pub fn pending_question(&self) -> Option<&PendingQuestion> {
        self.pending.as_ref()
    }

    pub fn result(&self) -> Option<&DiagnosticResult> {
        self.result.as_ref()
    }

    pub fn evidence(&self) -> &EvidenceStore {
        &self.evidence
    }

    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Archive record, available once the session is completed
    pub fn record(&self) -> Option<SessionRecord> {
        let result = self.result.clone()?;
        let completed_at = self.completed_at?;
        Some(SessionRecord {
            session_id: self.id,
            domain: self.domain.id().to_string(),
            transcript: self.transcript.clone(),
            evidence: self.evidence.entries().to_vec(),
            result,
            started_at: self.started_at,
            completed_at,
        })
    }
}
