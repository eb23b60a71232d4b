//! Causal model error types
//!
//! Error codes:
//! - DIAG_MODEL_INVALID_NAME (FATAL)
//! - DIAG_MODEL_DUPLICATE_NODE (FATAL)
//! - DIAG_MODEL_NO_CATEGORIES (FATAL)
//! - DIAG_MODEL_UNKNOWN_NODE (FATAL)
//! - DIAG_MODEL_DUPLICATE_EDGE (FATAL)
//! - DIAG_MODEL_CYCLIC (FATAL)
//! - DIAG_MODEL_MISSING_CPT (FATAL)
//! - DIAG_MODEL_DUPLICATE_CPT (FATAL)
//! - DIAG_MODEL_CPT_PARENT_MISMATCH (FATAL)
//! - DIAG_MODEL_CPT_SHAPE (FATAL)
//! - DIAG_MODEL_CPT_OUT_OF_RANGE (FATAL)
//! - DIAG_MODEL_CPT_NOT_NORMALIZED (FATAL)
//! - DIAG_MODEL_ORPHAN_SYMPTOM (FATAL)
//! - DIAG_INFERENCE_UNKNOWN_NODE (ERROR)
//! - DIAG_INFERENCE_IMPOSSIBLE_EVIDENCE (ERROR)

use std::fmt;

use crate::errors::Severity;

/// Causal model error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelErrorCode {
    /// Node name is empty or not an identifier
    DiagModelInvalidName,
    /// Node declared twice
    DiagModelDuplicateNode,
    /// Network declares no category node
    DiagModelNoCategories,
    /// Edge or CPT references an undeclared node
    DiagModelUnknownNode,
    /// Same edge declared twice
    DiagModelDuplicateEdge,
    /// Node/edge graph contains a cycle
    DiagModelCyclic,
    /// Node has no CPT
    DiagModelMissingCpt,
    /// Node has more than one CPT
    DiagModelDuplicateCpt,
    /// CPT evidence list differs from the node's parents
    DiagModelCptParentMismatch,
    /// CPT has the wrong number of rows or columns
    DiagModelCptShape,
    /// CPT entry is not a probability
    DiagModelCptOutOfRange,
    /// CPT column does not sum to 1
    DiagModelCptNotNormalized,
    /// Symptom node declared without parents
    DiagModelOrphanSymptom,
    /// Query for a node the model does not contain
    DiagInferenceUnknownNode,
    /// Evidence has zero probability under the model
    DiagInferenceImpossibleEvidence,
}

impl ModelErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            ModelErrorCode::DiagModelInvalidName => "DIAG_MODEL_INVALID_NAME",
            ModelErrorCode::DiagModelDuplicateNode => "DIAG_MODEL_DUPLICATE_NODE",
            ModelErrorCode::DiagModelNoCategories => "DIAG_MODEL_NO_CATEGORIES",
            ModelErrorCode::DiagModelUnknownNode => "DIAG_MODEL_UNKNOWN_NODE",
            ModelErrorCode::DiagModelDuplicateEdge => "DIAG_MODEL_DUPLICATE_EDGE",
            ModelErrorCode::DiagModelCyclic => "DIAG_MODEL_CYCLIC",
            ModelErrorCode::DiagModelMissingCpt => "DIAG_MODEL_MISSING_CPT",
            ModelErrorCode::DiagModelDuplicateCpt => "DIAG_MODEL_DUPLICATE_CPT",
            ModelErrorCode::DiagModelCptParentMismatch => "DIAG_MODEL_CPT_PARENT_MISMATCH",
            ModelErrorCode::DiagModelCptShape => "DIAG_MODEL_CPT_SHAPE",
            ModelErrorCode::DiagModelCptOutOfRange => "DIAG_MODEL_CPT_OUT_OF_RANGE",
            ModelErrorCode::DiagModelCptNotNormalized => "DIAG_MODEL_CPT_NOT_NORMALIZED",
            ModelErrorCode::DiagModelOrphanSymptom => "DIAG_MODEL_ORPHAN_SYMPTOM",
            ModelErrorCode::DiagInferenceUnknownNode => "DIAG_INFERENCE_UNKNOWN_NODE",
            ModelErrorCode::DiagInferenceImpossibleEvidence => {
                "DIAG_INFERENCE_IMPOSSIBLE_EVIDENCE"
            }
        }
    }

    /// Returns the severity level for this error
    ///
    /// Construction errors are FATAL; inference errors indicate an internal
    /// inconsistency and abort only the current request.
    pub fn severity(&self) -> Severity {
        match self {
            ModelErrorCode::DiagInferenceUnknownNode
            | ModelErrorCode::DiagInferenceImpossibleEvidence => Severity::Error,
            _ => Severity::Fatal,
        }
    }
}

impl fmt::Display for ModelErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Causal model error with context
#[derive(Debug, Clone, PartialEq)]
pub struct ModelError {
    code: ModelErrorCode,
    message: String,
    node: Option<String>,
}

impl ModelError {
    fn new(code: ModelErrorCode, message: String, node: Option<String>) -> Self {
        Self { code, message, node }
    }

    pub fn invalid_name(name: &str) -> Self {
        Self::new(
            ModelErrorCode::DiagModelInvalidName,
            format!("Node name '{}' is not a valid identifier", name),
            Some(name.to_string()),
        )
    }

    pub fn duplicate_node(name: &str) -> Self {
        Self::new(
            ModelErrorCode::DiagModelDuplicateNode,
            format!("Node '{}' is declared more than once", name),
            Some(name.to_string()),
        )
    }

    pub fn no_categories() -> Self {
        Self::new(
            ModelErrorCode::DiagModelNoCategories,
            "Network declares no category node".to_string(),
            None,
        )
    }

    /// Edge or CPT refers to `name`, which is not a declared node
    pub fn unknown_node(name: &str, context: &str) -> Self {
        Self::new(
            ModelErrorCode::DiagModelUnknownNode,
            format!("Undeclared node '{}' referenced by {}", name, context),
            Some(name.to_string()),
        )
    }

    pub fn duplicate_edge(parent: &str, child: &str) -> Self {
        Self::new(
            ModelErrorCode::DiagModelDuplicateEdge,
            format!("Edge '{}' -> '{}' is declared more than once", parent, child),
            Some(child.to_string()),
        )
    }

    pub fn cyclic(name: &str) -> Self {
        Self::new(
            ModelErrorCode::DiagModelCyclic,
            format!("Network contains a cycle through node '{}'", name),
            Some(name.to_string()),
        )
    }

    pub fn missing_cpt(name: &str) -> Self {
        Self::new(
            ModelErrorCode::DiagModelMissingCpt,
            format!("Node '{}' has no conditional probability table", name),
            Some(name.to_string()),
        )
    }

    pub fn duplicate_cpt(name: &str) -> Self {
        Self::new(
            ModelErrorCode::DiagModelDuplicateCpt,
            format!("Node '{}' has more than one conditional probability table", name),
            Some(name.to_string()),
        )
    }

    pub fn cpt_parent_mismatch(name: &str, expected: &[String], actual: &[String]) -> Self {
        Self::new(
            ModelErrorCode::DiagModelCptParentMismatch,
            format!(
                "CPT of '{}' conditions on [{}] but its parents are [{}]",
                name,
                actual.join(", "),
                expected.join(", ")
            ),
            Some(name.to_string()),
        )
    }

    pub fn cpt_shape(name: &str, reason: impl Into<String>) -> Self {
        Self::new(
            ModelErrorCode::DiagModelCptShape,
            format!("CPT of '{}' has invalid shape: {}", name, reason.into()),
            Some(name.to_string()),
        )
    }

    pub fn cpt_out_of_range(name: &str, value: f64) -> Self {
        Self::new(
            ModelErrorCode::DiagModelCptOutOfRange,
            format!("CPT of '{}' contains {} which is not in [0, 1]", name, value),
            Some(name.to_string()),
        )
    }

    pub fn cpt_not_normalized(name: &str, column: usize, sum: f64) -> Self {
        Self::new(
            ModelErrorCode::DiagModelCptNotNormalized,
            format!("CPT of '{}' column {} sums to {} instead of 1", name, column, sum),
            Some(name.to_string()),
        )
    }

    pub fn orphan_symptom(name: &str) -> Self {
        Self::new(
            ModelErrorCode::DiagModelOrphanSymptom,
            format!("Symptom node '{}' has no parent", name),
            Some(name.to_string()),
        )
    }

    pub fn unknown_query(name: &str) -> Self {
        Self::new(
            ModelErrorCode::DiagInferenceUnknownNode,
            format!("Query for node '{}' which is not part of the model", name),
            Some(name.to_string()),
        )
    }

    pub fn impossible_evidence(query: &str) -> Self {
        Self::new(
            ModelErrorCode::DiagInferenceImpossibleEvidence,
            format!("Evidence has zero probability when querying '{}'", query),
            Some(query.to_string()),
        )
    }

    /// Returns the error code
    pub fn code(&self) -> ModelErrorCode {
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

    /// Returns the offending node, if any
    pub fn node(&self) -> Option<&str> {
        self.node.as_deref()
    }

    /// Returns whether this is a configuration error
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity(), self.code.code(), self.message)
    }
}

impl std::error::Error for ModelError {}

/// Result type for causal model operations
pub type ModelResult<T> = Result<T, ModelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction_errors_are_fatal() {
        assert!(ModelError::cyclic("a").is_fatal());
        assert!(ModelError::missing_cpt("a").is_fatal());
        assert!(ModelError::cpt_not_normalized("a", 0, 0.9).is_fatal());
    }

    #[test]
    fn test_inference_errors_are_not_fatal() {
        let err = ModelError::unknown_query("Nope");
        assert_eq!(err.severity(), Severity::Error);
        assert_eq!(err.code(), ModelErrorCode::DiagInferenceUnknownNode);
    }

    #[test]
    fn test_display_includes_code_and_severity() {
        let err = ModelError::cpt_not_normalized("brakes_pull", 1, 0.95);
        let display = err.to_string();
        assert!(display.contains("FATAL"));
        assert!(display.contains("DIAG_MODEL_CPT_NOT_NORMALIZED"));
        assert!(display.contains("brakes_pull"));
    }

    #[test]
    fn test_node_context() {
        let err = ModelError::unknown_node("Ghost", "edge 'Ghost' -> 'x'");
        assert_eq!(err.node(), Some("Ghost"));
    }
}
