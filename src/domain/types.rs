//! Domain definition and validated domain
//!
//! A domain bundles a rule base and a causal network for one vehicle
//! subsystem. Question keys in the rules bind to network nodes by name.

use serde::{Deserialize, Serialize};

use super::errors::{DomainError, DomainResult};
use crate::network::{is_valid_name, CausalModel, NetworkDefinition, NodeKind};
use crate::rules::{Rule, RuleBase, RuleBaseReport};

/// Serializable domain description, as stored in domain JSON files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainDefinition {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub rules: Vec<Rule>,
    pub network: NetworkDefinition,
}

/// A domain whose rules and network have both passed validation
#[derive(Debug, Clone)]
pub struct Domain {
    id: String,
    title: String,
    description: String,
    rules: RuleBase,
    model: CausalModel,
    unmodelled_keys: Vec<String>,
    unasked_symptoms: Vec<String>,
}

impl Domain {
    /// Validates the definition.
    ///
    /// Question keys the network does not model are allowed; they are
    /// reported through `unmodelled_keys` and ignored during inference.
    pub fn from_definition(definition: DomainDefinition) -> DomainResult<Self> {
        let DomainDefinition {
            id,
            title,
            description,
            rules,
            network,
        } = definition;

        if !is_valid_name(&id) {
            return Err(DomainError::InvalidId(id));
        }
        if title.trim().is_empty() {
            return Err(DomainError::EmptyTitle(id));
        }

        let model = CausalModel::from_definition(&network).map_err(|source| DomainError::Model {
            domain: id.clone(),
            source,
        })?;
        let rules = RuleBase::new(rules).map_err(|source| DomainError::Rules {
            domain: id.clone(),
            source,
        })?;

        let asked = &rules.report().question_keys;
        let unmodelled_keys = asked
            .iter()
            .filter(|key| !model.contains(key))
            .cloned()
            .collect();
        let unasked_symptoms = model
            .nodes()
            .iter()
            .filter(|node| node.kind() == NodeKind::Symptom)
            .filter(|node| !asked.iter().any(|key| key == node.name()))
            .map(|node| node.name().to_string())
            .collect();

        Ok(Self {
            id,
            title,
            description,
            rules,
            model,
            unmodelled_keys,
            unasked_symptoms,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn rules(&self) -> &RuleBase {
        &self.rules
    }

    pub fn model(&self) -> &CausalModel {
        &self.model
    }

    /// Asked keys with no network node, sorted
    pub fn unmodelled_keys(&self) -> &[String] {
        &self.unmodelled_keys
    }

    /// Symptom nodes no rule asks about, in declaration order
    pub fn unasked_symptoms(&self) -> &[String] {
        &self.unasked_symptoms
    }

    /// Public listing entry
    pub fn summary(&self) -> DomainSummary {
        DomainSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            categories: self
                .model
                .categories()
                .map(|node| CategorySummary {
                    name: node.name().to_string(),
                    label: node.label().to_string(),
                })
                .collect(),
            questions: self.rules.report().question_keys.len(),
        }
    }

    /// Full validation report
    pub fn report(&self) -> DomainReport {
        DomainReport {
            id: self.id.clone(),
            rules: self.rules.len(),
            nodes: self.model.len(),
            categories: self.model.category_indices().len(),
            rule_base: self.rules.report().clone(),
            unmodelled_keys: self.unmodelled_keys.clone(),
            unasked_symptoms: self.unasked_symptoms.clone(),
        }
    }
}

/// Category entry of a domain listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    pub name: String,
    pub label: String,
}

/// Domain listing entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainSummary {
    pub id: String,
    pub title: String,
    pub description: String,
    pub categories: Vec<CategorySummary>,
    /// Distinct question keys reachable in the rule base
    pub questions: usize,
}

/// Output of a domain check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainReport {
    pub id: String,
    pub rules: usize,
    pub nodes: usize,
    pub categories: usize,
    pub rule_base: RuleBaseReport,
    pub unmodelled_keys: Vec<String>,
    pub unasked_symptoms: Vec<String>,
}
