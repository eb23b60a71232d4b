//! Domain loader for reading domain definitions from disk at startup
//!
//! - One JSON file per domain, `<dir>/<anything>.json`
//! - Files are read in path order so listings are deterministic
//! - A missing directory, unreadable file or malformed definition is FATAL

use std::fs;
use std::path::{Path, PathBuf};

use super::errors::{DomainError, DomainResult};
use super::types::{Domain, DomainDefinition};
use crate::observability::ObservationScope;

/// Reads and validates domain files from a directory.
pub struct DomainLoader {
    domain_dir: PathBuf,
}

impl DomainLoader {
    pub fn new(domain_dir: &Path) -> Self {
        Self {
            domain_dir: domain_dir.to_path_buf(),
        }
    }

    /// Returns the domain directory path.
    pub fn domain_dir(&self) -> &Path {
        &self.domain_dir
    }

    /// Lists the `*.json` files of the directory, sorted.
    pub fn definition_files(&self) -> DomainResult<Vec<PathBuf>> {
        let dir = self.domain_dir.display().to_string();
        let entries = fs::read_dir(&self.domain_dir).map_err(|e| DomainError::Io {
            path: dir.clone(),
            message: format!("Failed to read domain directory: {}", e),
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| DomainError::Io {
                path: dir.clone(),
                message: format!("Failed to read directory entry: {}", e),
            })?;
            let path = entry.path();

            // Skip non-JSON files
            if path.extension().map_or(true, |ext| ext != "json") || !path.is_file() {
                continue;
            }
            files.push(path);
        }
        files.sort();
        Ok(files)
    }

    /// Loads and validates every definition in the directory.
    pub fn load_all(&self) -> DomainResult<Vec<Domain>> {
        let scope = ObservationScope::with_fields(
            "DOMAIN_LOAD",
            &[("dir", &self.domain_dir.display().to_string())],
        );

        let result: DomainResult<Vec<Domain>> = self
            .definition_files()
            .and_then(|files| files.iter().map(|path| Self::load_file(path)).collect());

        match &result {
            Ok(domains) => {
                let ids: Vec<_> = domains.iter().map(Domain::id).collect();
                scope.complete_with_fields(&[("domains", &ids.join(","))]);
            }
            Err(e) => scope.fail_fatal(&e.to_string()),
        }
        result
    }

    /// Reads one definition file without validating it.
    pub fn read_definition(path: &Path) -> DomainResult<DomainDefinition> {
        let content = fs::read_to_string(path).map_err(|e| DomainError::Io {
            path: path.display().to_string(),
            message: format!("Failed to read file: {}", e),
        })?;

        serde_json::from_str(&content).map_err(|e| DomainError::Malformed {
            path: path.display().to_string(),
            message: format!("Invalid JSON: {}", e),
        })
    }

    /// Reads and validates one definition file.
    pub fn load_file(path: &Path) -> DomainResult<Domain> {
        let definition = Self::read_definition(path)?;
        Domain::from_definition(definition)
    }

    /// Writes `definition` as `<dir>/<id>.json`, refusing to overwrite.
    pub fn save_definition(&self, definition: &DomainDefinition) -> DomainResult<PathBuf> {
        let path = self.domain_dir.join(format!("{}.json", definition.id));
        if path.exists() {
            return Err(DomainError::Duplicate(definition.id.clone()));
        }

        fs::create_dir_all(&self.domain_dir).map_err(|e| DomainError::Io {
            path: self.domain_dir.display().to_string(),
            message: format!("Failed to create domain directory: {}", e),
        })?;

        let content = serde_json::to_string_pretty(definition).map_err(|e| DomainError::Malformed {
            path: path.display().to_string(),
            message: format!("Failed to serialize definition: {}", e),
        })?;

        fs::write(&path, content).map_err(|e| DomainError::Io {
            path: path.display().to_string(),
            message: format!("Failed to write file: {}", e),
        })?;

        Ok(path)
    }
}
