//! Shared error severity taxonomy
//!
//! Every subsystem error carries a stable code of the form `DIAG_<AREA>_<NAME>`
//! and one of the severities below.
//!
//! | Severity | Meaning                                                   |
//! |----------|-----------------------------------------------------------|
//! | REJECT   | Caller error. State unchanged, caller may retry.          |
//! | ERROR    | Internal failure. Request aborted, process continues.     |
//! | FATAL    | Configuration error. The affected domain is not served.   |

use std::fmt;

/// Severity levels for diagnosis errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Client request rejected
    Reject,
    /// Internal inconsistency, request aborted
    Error,
    /// Configuration error, domain must not be served
    Fatal,
}

impl Severity {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Reject => "REJECT",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_display() {
        assert_eq!(Severity::Reject.to_string(), "REJECT");
        assert_eq!(Severity::Error.to_string(), "ERROR");
        assert_eq!(Severity::Fatal.to_string(), "FATAL");
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Reject < Severity::Error);
        assert!(Severity::Error < Severity::Fatal);
    }
}
