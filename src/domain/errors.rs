//! # Domain Errors
//!
//! Error types for loading and registering diagnostic domains.

use thiserror::Error;

use crate::errors::Severity;
use crate::network::ModelError;
use crate::rules::RuleError;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain loading and lookup errors
#[derive(Debug, Clone, Error)]
pub enum DomainError {
    // ==================
    // Validation Errors
    // ==================

    /// Domain identifier is not usable as a path segment
    #[error("Invalid domain id '{0}'")]
    InvalidId(String),

    /// Domain title is empty
    #[error("Domain '{0}' has an empty title")]
    EmptyTitle(String),

    /// Causal network failed validation
    #[error("Domain '{domain}' network: {source}")]
    Model {
        domain: String,
        #[source]
        source: ModelError,
    },

    /// Rule base failed validation
    #[error("Domain '{domain}' rules: {source}")]
    Rules {
        domain: String,
        #[source]
        source: RuleError,
    },

    // ==================
    // Loading Errors
    // ==================

    /// Domain file or directory could not be read
    #[error("Cannot read '{path}': {message}")]
    Io { path: String, message: String },

    /// Domain file is not a valid definition
    #[error("Malformed domain file '{path}': {message}")]
    Malformed { path: String, message: String },

    // ==================
    // Registry Errors
    // ==================

    /// Two domains share an id
    #[error("Domain '{0}' is already registered")]
    Duplicate(String),

    /// No domain with this id
    #[error("Unknown domain '{0}'")]
    Unknown(String),
}

impl DomainError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::InvalidId(_) => "DIAG_DOMAIN_INVALID_ID",
            DomainError::EmptyTitle(_) => "DIAG_DOMAIN_EMPTY_TITLE",
            DomainError::Model { source, .. } => source.code().code(),
            DomainError::Rules { source, .. } => source.code().code(),
            DomainError::Io { .. } => "DIAG_DOMAIN_IO",
            DomainError::Malformed { .. } => "DIAG_DOMAIN_MALFORMED",
            DomainError::Duplicate(_) => "DIAG_DOMAIN_DUPLICATE",
            DomainError::Unknown(_) => "DIAG_DOMAIN_UNKNOWN",
        }
    }

    /// Unknown domains are caller errors; everything else is configuration.
    pub fn severity(&self) -> Severity {
        match self {
            DomainError::Unknown(_) => Severity::Reject,
            _ => Severity::Fatal,
        }
    }

    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            DomainError::Unknown(_) => 404,
            _ => 500,
        }
    }
}
