//! Domain registry
//!
//! Filled once at startup and read-only afterwards. Each domain is held in an
//! `Arc` so sessions keep their domain alive without copying the model.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use super::builtin;
use super::errors::{DomainError, DomainResult};
use super::loader::DomainLoader;
use super::types::{Domain, DomainSummary};
use crate::observability::{log_event_with_fields, Event};

/// Registered domains, keyed and listed by id
#[derive(Debug, Default, Clone)]
pub struct DomainRegistry {
    domains: BTreeMap<String, Arc<Domain>>,
}

impl DomainRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in domains
    pub fn builtin() -> DomainResult<Self> {
        let mut registry = Self::new();
        for definition in builtin::all() {
            let id = definition.id.clone();
            let domain = Domain::from_definition(definition).map_err(|e| {
                log_event_with_fields(
                    Event::DomainRejected,
                    &[("domain", &id), ("code", e.code()), ("reason", &e.to_string())],
                );
                e
            })?;
            registry.register(domain)?;
        }
        Ok(registry)
    }

    /// Built-in domains (optional) plus every definition in `dir` (optional)
    pub fn load(include_builtin: bool, dir: Option<&Path>) -> DomainResult<Self> {
        let mut registry = if include_builtin {
            Self::builtin()?
        } else {
            Self::new()
        };
        if let Some(dir) = dir {
            for domain in DomainLoader::new(dir).load_all()? {
                registry.register(domain)?;
            }
        }
        Ok(registry)
    }

    /// Adds a validated domain. Ids must be unique.
    pub fn register(&mut self, domain: Domain) -> DomainResult<Arc<Domain>> {
        if self.domains.contains_key(domain.id()) {
            log_event_with_fields(
                Event::DomainRejected,
                &[("domain", domain.id()), ("code", "DIAG_DOMAIN_DUPLICATE")],
            );
            return Err(DomainError::Duplicate(domain.id().to_string()));
        }

        let report = domain.rules().report();
        log_event_with_fields(
            Event::DomainLoaded,
            &[
                ("domain", domain.id()),
                ("rules", &domain.rules().len().to_string()),
                ("nodes", &domain.model().len().to_string()),
                ("reachable_states", &report.reachable_states.to_string()),
                ("max_depth", &report.max_depth.to_string()),
            ],
        );
        if !domain.unmodelled_keys().is_empty() {
            log_event_with_fields(
                Event::DomainUnmodelledKeys,
                &[
                    ("domain", domain.id()),
                    ("keys", &domain.unmodelled_keys().join(",")),
                ],
            );
        }
        if report.overlapping_states > 0 {
            log_event_with_fields(
                Event::DomainOverlappingRules,
                &[
                    ("domain", domain.id()),
                    ("states", &report.overlapping_states.to_string()),
                ],
            );
        }

        let domain = Arc::new(domain);
        self.domains
            .insert(domain.id().to_string(), Arc::clone(&domain));
        Ok(domain)
    }

    pub fn get(&self, id: &str) -> Option<Arc<Domain>> {
        self.domains.get(id).cloned()
    }

    /// Like `get`, but an unknown id is an error
    pub fn require(&self, id: &str) -> DomainResult<Arc<Domain>> {
        self.get(id)
            .ok_or_else(|| DomainError::Unknown(id.to_string()))
    }

    /// Registered ids, sorted
    pub fn ids(&self) -> Vec<&str> {
        self.domains.keys().map(String::as_str).collect()
    }

    pub fn summaries(&self) -> Vec<DomainSummary> {
        self.domains.values().map(|d| d.summary()).collect()
    }

    pub fn domains(&self) -> impl Iterator<Item = &Arc<Domain>> {
        self.domains.values()
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry() {
        let registry = DomainRegistry::builtin().unwrap();
        assert_eq!(registry.ids(), vec!["brakes", "noises", "starting"]);
        assert_eq!(registry.summaries().len(), 3);
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut registry = DomainRegistry::builtin().unwrap();
        let again = Domain::from_definition(builtin::brakes::definition()).unwrap();
        let err = registry.register(again).unwrap_err();
        assert_eq!(err.code(), "DIAG_DOMAIN_DUPLICATE");
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_require_unknown() {
        let registry = DomainRegistry::new();
        assert!(registry.is_empty());
        let err = registry.require("boats").unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[test]
    fn test_shared_domain() {
        let registry = DomainRegistry::builtin().unwrap();
        let a = registry.require("noises").unwrap();
        let b = registry.require("noises").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
