//! Observability subsystem
//!
//! - Structured logging (JSON lines on stderr)
//! - Counters for sessions, answers and inference
//! - Begin/complete scopes for startup work
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on diagnosis results
//! 3. No background threads
//! 4. Deterministic output
//!
//! # Usage
//!
//! ```ignore
//! use vehidiag::observability::{Event, Logger, MetricsRegistry, ObservationScope};
//!
//! Logger::info("ANSWER_ACCEPTED", &[("key", "squealing")]);
//!
//! let metrics = MetricsRegistry::new();
//! metrics.increment_sessions_started();
//!
//! let scope = ObservationScope::new("DOMAIN_LOAD");
//! // ... do work ...
//! scope.complete();
//! ```

mod events;
mod logger;
mod metrics;
mod scope;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};
pub use scope::{ObservationScope, Timer};

fn severity_of(event: Event) -> Severity {
    if event.is_fatal() {
        Severity::Fatal
    } else if event.is_warning() {
        Severity::Warn
    } else {
        Severity::Info
    }
}

/// Log a lifecycle event
pub fn log_event(event: Event) {
    Logger::log(severity_of(event), event.as_str(), &[]);
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(severity_of(event), event.as_str(), fields);
}

/// Log a per-request event at TRACE level unless it is a warning or worse
pub fn trace_event(event: Event, fields: &[(&str, &str)]) {
    let severity = match severity_of(event) {
        Severity::Info => Severity::Trace,
        other => other,
    };
    Logger::log(severity, event.as_str(), fields);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_severity_mapping() {
        assert_eq!(severity_of(Event::DomainRejected), Severity::Fatal);
        assert_eq!(severity_of(Event::AnswerRejected), Severity::Warn);
        assert_eq!(severity_of(Event::SessionStarted), Severity::Info);
    }

    #[test]
    fn test_log_event() {
        log_event(Event::BootStart);
        log_event(Event::BootComplete);
    }

    #[test]
    fn test_log_event_with_fields() {
        log_event_with_fields(Event::ConfigLoaded, &[("domains_dir", "/tmp/domains")]);
        trace_event(Event::QuestionAsked, &[("key", "squealing")]);
    }
}
