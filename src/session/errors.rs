//! # Session Errors
//!
//! Caller errors (`Reject`) leave the session exactly as it was. Internal
//! errors (`Error`) abort the request; the session is also left unchanged.

use thiserror::Error;

use crate::domain::DomainError;
use crate::errors::Severity;
use crate::network::ModelError;
use crate::rules::RuleError;

/// Result type for session operations
pub type SessionResult<T> = Result<T, SessionError>;

/// Diagnostic session errors
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    // ==================
    // Caller Errors
    // ==================

    /// Answer was not yes or no
    #[error("Invalid answer '{0}': expected 'yes' or 'no'")]
    InvalidAnswer(String),

    /// Session already produced its diagnosis
    #[error("Session {0} is already completed")]
    SessionCompleted(String),

    /// No active or archived session has this id
    #[error("Unknown session '{0}'")]
    UnknownSession(String),

    /// Answer submitted before the first question was asked
    #[error("Session {0} has not been started")]
    NotStarted(String),

    /// Domain lookup failed
    #[error(transparent)]
    Domain(#[from] DomainError),

    // ==================
    // Internal Errors
    // ==================

    /// Rule selection failed on a validated rule base
    #[error("Rule selection failed: {0}")]
    Rules(#[from] RuleError),

    /// Inference failed on a validated model
    #[error("Inference failed: {0}")]
    Inference(#[from] ModelError),

    /// Session lock was poisoned by a panic in another request
    #[error("Session {0} state is unavailable")]
    Poisoned(String),
}

impl SessionError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            SessionError::InvalidAnswer(_) => "DIAG_SESSION_INVALID_ANSWER",
            SessionError::SessionCompleted(_) => "DIAG_SESSION_COMPLETED",
            SessionError::UnknownSession(_) => "DIAG_SESSION_UNKNOWN",
            SessionError::NotStarted(_) => "DIAG_SESSION_NOT_STARTED",
            SessionError::Domain(e) => e.code(),
            SessionError::Rules(e) => e.code().code(),
            SessionError::Inference(e) => e.code().code(),
            SessionError::Poisoned(_) => "DIAG_SESSION_POISONED",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            SessionError::InvalidAnswer(_)
            | SessionError::SessionCompleted(_)
            | SessionError::UnknownSession(_)
            | SessionError::NotStarted(_) => Severity::Reject,
            SessionError::Domain(e) => e.severity(),
            SessionError::Rules(_) | SessionError::Inference(_) | SessionError::Poisoned(_) => {
                Severity::Error
            }
        }
    }

    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            SessionError::InvalidAnswer(_) => 400,
            SessionError::UnknownSession(_) => 404,
            SessionError::SessionCompleted(_) | SessionError::NotStarted(_) => 409,
            SessionError::Domain(e) => e.status_code(),
            _ => 500,
        }
    }

    /// Whether the caller may retry with different input
    pub fn is_reject(&self) -> bool {
        self.severity() == Severity::Reject
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caller_errors() {
        let err = SessionError::InvalidAnswer("maybe".into());
        assert_eq!(err.code(), "DIAG_SESSION_INVALID_ANSWER");
        assert_eq!(err.status_code(), 400);
        assert!(err.is_reject());

        let err = SessionError::SessionCompleted("abc".into());
        assert_eq!(err.status_code(), 409);

        let err = SessionError::UnknownSession("abc".into());
        assert_eq!(err.status_code(), 404);
    }

    #[test]
    fn test_unknown_domain_passes_through() {
        let err = SessionError::from(DomainError::Unknown("boats".into()));
        assert_eq!(err.code(), "DIAG_DOMAIN_UNKNOWN");
        assert_eq!(err.status_code(), 404);
        assert!(err.is_reject());
    }

    #[test]
    fn test_internal_errors() {
        let err = SessionError::from(ModelError::impossible_evidence("Fuel"));
        assert_eq!(err.code(), "DIAG_INFERENCE_IMPOSSIBLE_EVIDENCE");
        assert_eq!(err.severity(), Severity::Error);
        assert_eq!(err.status_code(), 500);
    }
}
