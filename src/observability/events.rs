//! Observable events
//!
//! Events are explicit and typed. Each maps to one stable UPPER_SNAKE name.

use std::fmt;

/// Observable events in a diagnosis service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Startup begins
    BootStart,
    /// Startup complete, ready to serve
    BootComplete,
    /// Shutdown initiated
    ShutdownStart,
    /// Shutdown complete
    ShutdownComplete,
    /// HTTP listener bound
    Serving,

    // Configuration
    /// Configuration loaded
    ConfigLoaded,
    /// Domain validated and registered
    DomainLoaded,
    /// Domain failed validation
    DomainRejected,
    /// Rule base asks keys the network does not model
    DomainUnmodelledKeys,
    /// Several rules match one reachable state
    DomainOverlappingRules,

    // Sessions
    /// Session created
    SessionStarted,
    /// Question returned to the user
    QuestionAsked,
    /// Answer recorded
    AnswerAccepted,
    /// Answer rejected without state change
    AnswerRejected,
    /// Category posteriors computed
    InferenceRun,
    /// Finalize rule fired
    DiagnosisComplete,
    /// Completed session written to the archive
    SessionArchived,
    /// Archive write failed
    SessionArchiveFailed,
    /// Internal error while advancing a session
    SessionFailed,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::BootStart => "VEHIDIAG_STARTUP_BEGIN",
            Event::BootComplete => "VEHIDIAG_STARTUP_COMPLETE",
            Event::ShutdownStart => "SHUTDOWN_START",
            Event::ShutdownComplete => "SHUTDOWN_COMPLETE",
            Event::Serving => "VEHIDIAG_SERVING",

            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::DomainLoaded => "DOMAIN_LOADED",
            Event::DomainRejected => "DOMAIN_REJECTED",
            Event::DomainUnmodelledKeys => "DOMAIN_UNMODELLED_KEYS",
            Event::DomainOverlappingRules => "DOMAIN_OVERLAPPING_RULES",

            Event::SessionStarted => "SESSION_STARTED",
            Event::QuestionAsked => "QUESTION_ASKED",
            Event::AnswerAccepted => "ANSWER_ACCEPTED",
            Event::AnswerRejected => "ANSWER_REJECTED",
            Event::InferenceRun => "INFERENCE_RUN",
            Event::DiagnosisComplete => "DIAGNOSIS_COMPLETE",
            Event::SessionArchived => "SESSION_ARCHIVED",
            Event::SessionArchiveFailed => "SESSION_ARCHIVE_FAILED",
            Event::SessionFailed => "SESSION_FAILED",
        }
    }

    /// Returns true if this event indicates a configuration error
    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::DomainRejected)
    }

    /// Returns true if this event indicates a recoverable problem
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            Event::DomainUnmodelledKeys
                | Event::DomainOverlappingRules
                | Event::AnswerRejected
                | Event::SessionArchiveFailed
                | Event::SessionFailed
        )
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_events_have_string_representation() {
        let events = [
            Event::BootStart,
            Event::BootComplete,
            Event::ShutdownStart,
            Event::ShutdownComplete,
            Event::Serving,
            Event::ConfigLoaded,
            Event::DomainLoaded,
            Event::DomainRejected,
            Event::DomainUnmodelledKeys,
            Event::DomainOverlappingRules,
            Event::SessionStarted,
            Event::QuestionAsked,
            Event::AnswerAccepted,
            Event::AnswerRejected,
            Event::InferenceRun,
            Event::DiagnosisComplete,
            Event::SessionArchived,
            Event::SessionArchiveFailed,
            Event::SessionFailed,
        ];

        for event in events {
            let s = event.as_str();
            assert!(!s.is_empty());
            assert!(s.chars().all(|c| c.is_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_fatal_events() {
        assert!(Event::DomainRejected.is_fatal());
        assert!(!Event::DomainLoaded.is_fatal());
        assert!(!Event::DiagnosisComplete.is_fatal());
    }

    #[test]
    fn test_event_display() {
        assert_eq!(format!("{}", Event::BootStart), "VEHIDIAG_STARTUP_BEGIN");
        assert_eq!(format!("{}", Event::AnswerRejected), "ANSWER_REJECTED");
    }
}
