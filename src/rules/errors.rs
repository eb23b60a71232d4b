//! Rule base error types
//!
//! Error codes:
//! - DIAG_RULES_EMPTY (FATAL)
//! - DIAG_RULES_INVALID_KEY (FATAL)
//! - DIAG_RULES_DUPLICATE_NAME (FATAL)
//! - DIAG_RULES_REPEATED_CONDITION (FATAL)
//! - DIAG_RULES_UNGUARDED_ASK (FATAL)
//! - DIAG_RULES_NO_MATCH (FATAL)
//! - DIAG_RULES_REASK (FATAL)
//! - DIAG_RULES_STATE_LIMIT (FATAL)

use std::fmt;

use crate::errors::Severity;

/// Rule base error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleErrorCode {
    /// Rule base has no rules
    DiagRulesEmpty,
    /// Question key or rule name is not an identifier
    DiagRulesInvalidKey,
    /// Two rules share a name
    DiagRulesDuplicateName,
    /// A rule tests the same key twice
    DiagRulesRepeatedCondition,
    /// Ask rule does not require its own key to be unanswered
    DiagRulesUnguardedAsk,
    /// Reachable evidence state with no matching rule
    DiagRulesNoMatch,
    /// Selected rule asks an already-answered key
    DiagRulesReask,
    /// Exhaustive check visited too many evidence states
    DiagRulesStateLimit,
}

impl RuleErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            RuleErrorCode::DiagRulesEmpty => "DIAG_RULES_EMPTY",
            RuleErrorCode::DiagRulesInvalidKey => "DIAG_RULES_INVALID_KEY",
            RuleErrorCode::DiagRulesDuplicateName => "DIAG_RULES_DUPLICATE_NAME",
            RuleErrorCode::DiagRulesRepeatedCondition => "DIAG_RULES_REPEATED_CONDITION",
            RuleErrorCode::DiagRulesUnguardedAsk => "DIAG_RULES_UNGUARDED_ASK",
            RuleErrorCode::DiagRulesNoMatch => "DIAG_RULES_NO_MATCH",
            RuleErrorCode::DiagRulesReask => "DIAG_RULES_REASK",
            RuleErrorCode::DiagRulesStateLimit => "DIAG_RULES_STATE_LIMIT",
        }
    }

    /// All rule base errors are configuration errors.
    pub fn severity(&self) -> Severity {
        Severity::Fatal
    }
}

impl fmt::Display for RuleErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Rule base error with context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleError {
    code: RuleErrorCode,
    message: String,
    rule: Option<String>,
}

impl RuleError {
    fn new(code: RuleErrorCode, message: String, rule: Option<&str>) -> Self {
        Self {
            code,
            message,
            rule: rule.map(str::to_string),
        }
    }

    pub fn empty() -> Self {
        Self::new(
            RuleErrorCode::DiagRulesEmpty,
            "Rule base contains no rules".to_string(),
            None,
        )
    }

    pub fn invalid_key(rule: &str, key: &str) -> Self {
        Self::new(
            RuleErrorCode::DiagRulesInvalidKey,
            format!("Rule '{}' uses invalid identifier '{}'", rule, key),
            Some(rule),
        )
    }

    pub fn duplicate_name(rule: &str) -> Self {
        Self::new(
            RuleErrorCode::DiagRulesDuplicateName,
            format!("Rule name '{}' is used more than once", rule),
            Some(rule),
        )
    }

    pub fn repeated_condition(rule: &str, key: &str) -> Self {
        Self::new(
            RuleErrorCode::DiagRulesRepeatedCondition,
            format!("Rule '{}' tests key '{}' more than once", rule, key),
            Some(rule),
        )
    }

    pub fn unguarded_ask(rule: &str, key: &str) -> Self {
        Self::new(
            RuleErrorCode::DiagRulesUnguardedAsk,
            format!(
                "Rule '{}' asks '{}' without requiring it to be unanswered",
                rule, key
            ),
            Some(rule),
        )
    }

    /// No rule matched; `state` describes the evidence.
    pub fn no_match(state: &str) -> Self {
        Self::new(
            RuleErrorCode::DiagRulesNoMatch,
            format!("No rule matches evidence state {{{}}}", state),
            None,
        )
    }

    pub fn reask(rule: &str, key: &str) -> Self {
        Self::new(
            RuleErrorCode::DiagRulesReask,
            format!("Rule '{}' asks already answered key '{}'", rule, key),
            Some(rule),
        )
    }

    pub fn state_limit(limit: usize) -> Self {
        Self::new(
            RuleErrorCode::DiagRulesStateLimit,
            format!("Rule base reaches more than {} evidence states", limit),
            None,
        )
    }

    /// Returns the error code
    pub fn code(&self) -> RuleErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the offending rule, if any
    pub fn rule(&self) -> Option<&str> {
        self.rule.as_deref()
    }
}

impl fmt::Display for RuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity(), self.code.code(), self.message)
    }
}

impl std::error::Error for RuleError {}

/// Result type for rule base operations
pub type RuleResult<T> = Result<T, RuleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_rule_errors_fatal() {
        assert_eq!(RuleError::empty().severity(), Severity::Fatal);
        assert_eq!(RuleError::no_match("a=yes").severity(), Severity::Fatal);
    }

    #[test]
    fn test_display_format() {
        let err = RuleError::unguarded_ask("ask_squealing", "squealing");
        assert_eq!(
            err.to_string(),
            "[FATAL] DIAG_RULES_UNGUARDED_ASK: Rule 'ask_squealing' asks 'squealing' without requiring it to be unanswered"
        );
        assert_eq!(err.rule(), Some("ask_squealing"));
    }

    #[test]
    fn test_no_match_describes_state() {
        let err = RuleError::no_match("clunks=no, making_noise=yes");
        assert!(err.message().contains("{clunks=no, making_noise=yes}"));
    }
}
