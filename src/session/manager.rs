//! Session manager
//!
//! Holds active sessions in memory, one mutex per session. The domain
//! registry is shared read-only. A session that completes is archived,
//! removed from the active set and remembered as completed so later answers
//! are rejected with `SessionCompleted`. Only the most recent completions are
//! remembered; older ones age out in completion order and are then reported
//! as unknown. The archive keeps the full history.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, RwLock};

use serde::Serialize;
use uuid::Uuid;

use super::archive::{MemorySessionArchive, SessionArchive};
use super::controller::DiagnosticSession;
use super::errors::{SessionError, SessionResult};
use super::result::{DiagnosticResult, SessionRecord, TranscriptEntry};
use super::state::{PendingQuestion, SessionState, Step};
use crate::domain::DomainRegistry;
use crate::observability::{log_event_with_fields, trace_event, Event, MetricsRegistry};

/// Newly created session and its first step
#[derive(Debug, Clone, Serialize)]
pub struct StartedSession {
    pub session_id: Uuid,
    pub step: Step,
}

/// Read-only view of a session
#[derive(Debug, Clone, Serialize)]
pub struct SessionStatus {
    pub session_id: Uuid,
    pub domain: String,
    pub state: SessionState,
    pub current_question: Option<PendingQuestion>,
    pub completed: bool,
    pub answers: Vec<TranscriptEntry>,
    pub result: Option<DiagnosticResult>,
}

impl SessionStatus {
    fn active(session: &DiagnosticSession) -> Self {
        Self {
            session_id: session.id(),
            domain: session.domain().id().to_string(),
            state: session.state(),
            current_question: session.pending_question().cloned(),
            completed: session.is_completed(),
            answers: session.transcript().to_vec(),
            result: session.result().cloned(),
        }
    }

    fn archived(record: &SessionRecord) -> Self {
        Self {
            session_id: record.session_id,
            domain: record.domain.clone(),
            state: SessionState::Completed,
            current_question: None,
            completed: true,
            answers: record.transcript.clone(),
            result: Some(record.result.clone()),
        }
    }
}

type SharedSession = Arc<Mutex<DiagnosticSession>>;

/// Completed sessions remembered by default
pub const DEFAULT_COMPLETED_LIMIT: usize = 10_000;

/// Recently completed sessions, oldest evicted first
struct CompletedSessions {
    limit: usize,
    order: VecDeque<Uuid>,
    records: HashMap<Uuid, SessionRecord>,
}

impl CompletedSessions {
    fn new(limit: usize) -> Self {
        Self {
            limit: limit.max(1),
            order: VecDeque::new(),
            records: HashMap::new(),
        }
    }

    fn insert(&mut self, record: SessionRecord) {
        let session_id = record.session_id;
        if self.records.insert(session_id, record).is_some() {
            return;
        }
        self.order.push_back(session_id);
        while self.order.len() > self.limit {
            if let Some(oldest) = self.order.pop_front() {
                self.records.remove(&oldest);
            }
        }
    }

    fn get(&self, session_id: &Uuid) -> Option<&SessionRecord> {
        self.records.get(session_id)
    }

    fn contains(&self, session_id: &Uuid) -> bool {
        self.records.contains_key(session_id)
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}

/// Thread-safe registry of diagnostic sessions
pub struct SessionManager {
    registry: Arc<DomainRegistry>,
    archive: Arc<dyn SessionArchive>,
    metrics: Arc<MetricsRegistry>,
    active: RwLock<HashMap<Uuid, SharedSession>>,
    completed: RwLock<CompletedSessions>,
}

impl SessionManager {
    pub fn new(
        registry: Arc<DomainRegistry>,
        archive: Arc<dyn SessionArchive>,
        metrics: Arc<MetricsRegistry>,
    ) -> Self {
        for _ in registry.domains() {
            metrics.increment_domains_loaded();
        }
        Self {
            registry,
            archive,
            metrics,
            active: RwLock::new(HashMap::new()),
            completed: RwLock::new(CompletedSessions::new(DEFAULT_COMPLETED_LIMIT)),
        }
    }

    /// Caps how many completed sessions are remembered.
    pub fn with_completed_limit(self, limit: usize) -> Self {
        Self {
            completed: RwLock::new(CompletedSessions::new(limit)),
            ..self
        }
    }

    /// Manager with an in-memory archive and fresh counters
    pub fn in_memory(registry: Arc<DomainRegistry>) -> Self {
        Self::new(
            registry,
            Arc::new(MemorySessionArchive::new()),
            Arc::new(MetricsRegistry::new()),
        )
    }

    pub fn registry(&self) -> &DomainRegistry {
        &self.registry
    }

    pub fn metrics(&self) -> &MetricsRegistry {
        &self.metrics
    }

    /// Handle to the counters, for the metrics endpoint
    pub fn shared_metrics(&self) -> Arc<MetricsRegistry> {
        Arc::clone(&self.metrics)
    }

    /// Parses a session id; a malformed id is reported as unknown.
    pub fn parse_id(raw: &str) -> SessionResult<Uuid> {
        Uuid::parse_str(raw.trim()).map_err(|_| SessionError::UnknownSession(raw.to_string()))
    }

    /// Creates a session in `domain` and asks its first question.
    pub fn start(&self, domain: &str) -> SessionResult<StartedSession> {
        let domain = self.registry.require(domain)?;
        let mut session = DiagnosticSession::new(domain);
        let session_id = session.id();
        let step = session.start().map_err(|e| self.failed(session_id, e))?;

        self.metrics.increment_sessions_started();
        trace_event(
            Event::SessionStarted,
            &[
                ("domain", session.domain().id()),
                ("session_id", &session_id.to_string()),
            ],
        );

        self.observe_step(&session, &step);
        if step.is_final() {
            self.finish(&session);
        } else {
            self.write_active()?
                .insert(session_id, Arc::new(Mutex::new(session)));
        }
        Ok(StartedSession { session_id, step })
    }

    /// Submits an answer to an active session.
    pub fn submit(&self, session_id: Uuid, answer: &str) -> SessionResult<Step> {
        let shared = self.lookup(session_id)?;
        let mut session = shared
            .lock()
            .map_err(|_| SessionError::Poisoned(session_id.to_string()))?;

        let step = match session.submit(answer) {
            Ok(step) => step,
            Err(SessionError::InvalidAnswer(raw)) => {
                self.metrics.increment_answers_rejected();
                trace_event(
                    Event::AnswerRejected,
                    &[("session_id", &session_id.to_string()), ("answer", &raw)],
                );
                return Err(SessionError::InvalidAnswer(raw));
            }
            Err(e) if e.is_reject() => return Err(e),
            Err(e) => return Err(self.failed(session_id, e)),
        };

        self.metrics.increment_answers_accepted();
        if let Some(entry) = session.transcript().last() {
            trace_event(
                Event::AnswerAccepted,
                &[
                    ("session_id", &session_id.to_string()),
                    ("key", &entry.key),
                    ("answer", entry.answer.as_str()),
                ],
            );
        }

        self.observe_step(&session, &step);
        if step.is_final() {
            self.finish(&session);
            drop(session);
            self.write_active()?.remove(&session_id);
        }
        Ok(step)
    }

    /// Current state of an active or completed session
    pub fn status(&self, session_id: Uuid) -> SessionResult<SessionStatus> {
        if let Some(record) = self.read_completed()?.get(&session_id) {
            return Ok(SessionStatus::archived(record));
        }
        let shared = self.lookup(session_id)?;
        let session = shared
            .lock()
            .map_err(|_| SessionError::Poisoned(session_id.to_string()))?;
        Ok(SessionStatus::active(&session))
    }

    pub fn active_count(&self) -> usize {
        self.active.read().map(|a| a.len()).unwrap_or(0)
    }

    pub fn completed_count(&self) -> usize {
        self.completed.read().map(|c| c.len()).unwrap_or(0)
    }

    fn lookup(&self, session_id: Uuid) -> SessionResult<SharedSession> {
        if let Some(shared) = self.read_active()?.get(&session_id) {
            return Ok(Arc::clone(shared));
        }
        if self.read_completed()?.contains(&session_id) {
            return Err(SessionError::SessionCompleted(session_id.to_string()));
        }
        Err(SessionError::UnknownSession(session_id.to_string()))
    }

    fn observe_step(&self, session: &DiagnosticSession, step: &Step) {
        let session_id = session.id().to_string();
        match step {
            Step::Question(question) => {
                self.metrics.increment_questions_asked();
                trace_event(
                    Event::QuestionAsked,
                    &[("session_id", &session_id), ("key", &question.key)],
                );
            }
            Step::Diagnosis(result) => {
                self.metrics.increment_inference_runs();
                self.metrics.increment_diagnoses_completed();
                trace_event(
                    Event::InferenceRun,
                    &[
                        ("session_id", &session_id),
                        ("evidence", &session.evidence().answered_keys().to_string()),
                    ],
                );
                log_event_with_fields(
                    Event::DiagnosisComplete,
                    &[
                        ("session_id", &session_id),
                        ("domain", session.domain().id()),
                        ("category", &result.most_probable_category),
                        ("rule", &result.rule),
                    ],
                );
            }
        }
    }

    /// Archives a completed session and remembers its id.
    ///
    /// Archive failures are logged and counted; the diagnosis still stands.
    fn finish(&self, session: &DiagnosticSession) {
        let Some(record) = session.record() else {
            return;
        };
        let session_id = record.session_id.to_string();

        match self.archive.append(&record) {
            Ok(()) => {
                self.metrics.increment_sessions_archived();
                trace_event(Event::SessionArchived, &[("session_id", &session_id)]);
            }
            Err(e) => {
                self.metrics.increment_archive_failures();
                log_event_with_fields(
                    Event::SessionArchiveFailed,
                    &[("session_id", &session_id), ("reason", &e.to_string())],
                );
            }
        }

        if let Ok(mut completed) = self.completed.write() {
            completed.insert(record);
        }
    }

    fn failed(&self, session_id: Uuid, error: SessionError) -> SessionError {
        log_event_with_fields(
            Event::SessionFailed,
            &[
                ("session_id", &session_id.to_string()),
                ("code", error.code()),
                ("reason", &error.to_string()),
            ],
        );
        error
    }

    fn read_active(
        &self,
    ) -> SessionResult<std::sync::RwLockReadGuard<'_, HashMap<Uuid, SharedSession>>> {
        self.active
            .read()
            .map_err(|_| SessionError::Poisoned("active sessions".to_string()))
    }

    fn write_active(
        &self,
    ) -> SessionResult<std::sync::RwLockWriteGuard<'_, HashMap<Uuid, SharedSession>>> {
        self.active
            .write()
            .map_err(|_| SessionError::Poisoned("active sessions".to_string()))
    }

    fn read_completed(
        &self,
    ) -> SessionResult<std::sync::RwLockReadGuard<'_, CompletedSessions>> {
        self.completed
            .read()
            .map_err(|_| SessionError::Poisoned("completed sessions".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> SessionManager {
        SessionManager::in_memory(Arc::new(DomainRegistry::builtin().unwrap()))
    }

    #[test]
    fn test_start_unknown_domain() {
        let err = manager().start("boats").unwrap_err();
        assert_eq!(err.code(), "DIAG_DOMAIN_UNKNOWN");
        assert_eq!(err.status_code(), 404);
    }

    #[test]
    fn test_full_session() {
        let manager = manager();
        let started = manager.start("brakes").unwrap();
        assert_eq!(started.step.question().unwrap().key, "brakes_stop_car");
        assert_eq!(manager.active_count(), 1);

        manager.submit(started.session_id, "yes").unwrap();
        manager.submit(started.session_id, "no").unwrap();
        let step = manager.submit(started.session_id, "YES").unwrap();
        assert!(step.is_final());

        assert_eq!(manager.active_count(), 0);
        assert_eq!(manager.completed_count(), 1);

        let snapshot = manager.metrics().snapshot();
        assert_eq!(snapshot.sessions_started, 1);
        assert_eq!(snapshot.answers_accepted, 3);
        assert_eq!(snapshot.diagnoses_completed, 1);
        assert_eq!(snapshot.sessions_archived, 1);
        assert_eq!(snapshot.domains_loaded, 3);
    }

    #[test]
    fn test_submit_after_completion() {
        let manager = manager();
        let id = manager.start("brakes").unwrap().session_id;
        manager.submit(id, "no").unwrap();
        manager.submit(id, "no").unwrap();

        let err = manager.submit(id, "yes").unwrap_err();
        assert!(matches!(err, SessionError::SessionCompleted(_)));
        assert_eq!(err.status_code(), 409);

        let status = manager.status(id).unwrap();
        assert!(status.completed);
        assert_eq!(status.answers.len(), 2);
        assert_eq!(status.result.unwrap().rule, "pedal_linkage");
    }

    #[test]
    fn test_unknown_session() {
        let manager = manager();
        let err = manager.submit(Uuid::new_v4(), "yes").unwrap_err();
        assert_eq!(err.status_code(), 404);
        assert!(SessionManager::parse_id("not-a-uuid").is_err());
    }

    #[test]
    fn test_invalid_answer_counted() {
        let manager = manager();
        let id = manager.start("noises").unwrap().session_id;
        let err = manager.submit(id, "perhaps").unwrap_err();
        assert_eq!(err.status_code(), 400);

        let status = manager.status(id).unwrap();
        assert_eq!(status.current_question.unwrap().key, "clunk_or_single_tick");
        assert!(status.answers.is_empty());
        assert_eq!(manager.metrics().snapshot().answers_rejected, 1);
    }

    #[test]
    fn test_sessions_are_independent() {
        let manager = manager();
        let a = manager.start("starting").unwrap().session_id;
        let b = manager.start("starting").unwrap().session_id;
        assert_ne!(a, b);

        manager.submit(a, "no").unwrap();
        let status_b = manager.status(b).unwrap();
        assert_eq!(status_b.current_question.unwrap().key, "starter_cranks");
    }

    fn complete_brakes_session(manager: &SessionManager) -> Uuid {
        let id = manager.start("brakes").unwrap().session_id;
        manager.submit(id, "no").unwrap();
        assert!(manager.submit(id, "no").unwrap().is_final());
        id
    }

    #[test]
    fn test_completed_sessions_stay_bounded() {
        let manager = manager().with_completed_limit(16);
        let ids: Vec<Uuid> = (0..200).map(|_| complete_brakes_session(&manager)).collect();

        assert_eq!(manager.active_count(), 0);
        assert_eq!(manager.completed_count(), 16);
        assert_eq!(manager.metrics().snapshot().sessions_archived, 200);

        let newest = ids[199];
        let err = manager.submit(newest, "yes").unwrap_err();
        assert_eq!(err.status_code(), 409);
        assert!(manager.status(newest).unwrap().completed);

        let oldest = ids[0];
        let err = manager.submit(oldest, "yes").unwrap_err();
        assert!(matches!(err, SessionError::UnknownSession(_)));
        assert_eq!(manager.status(oldest).unwrap_err().status_code(), 404);
    }

    #[test]
    fn test_default_completed_limit_holds() {
        let manager = manager();
        for _ in 0..50 {
            complete_brakes_session(&manager);
        }
        assert_eq!(manager.completed_count(), 50);
        assert!(manager.completed_count() <= DEFAULT_COMPLETED_LIMIT);
    }
}
