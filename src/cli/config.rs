//! Configuration file for `vehidiag serve`
//!
//! JSON, validated on load. Every field has a default.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::errors::{CliError, CliResult};
use crate::http_server::HttpServerConfig;
use crate::observability::Severity;

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory of extra domain definitions (optional)
    #[serde(default)]
    pub domains_dir: Option<PathBuf>,

    /// Load the built-in domains (default true)
    #[serde(default = "default_include_builtin")]
    pub include_builtin: bool,

    /// Minimum log severity (default "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// JSON-lines archive of completed sessions (optional, in-memory if unset)
    #[serde(default)]
    pub archive_path: Option<PathBuf>,

    #[serde(default)]
    pub http: HttpServerConfig,
}

fn default_include_builtin() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            domains_dir: None,
            include_builtin: default_include_builtin(),
            log_level: default_log_level(),
            archive_path: None,
            http: HttpServerConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> CliResult<()> {
        self.min_severity()?;

        if !self.include_builtin && self.domains_dir.is_none() {
            return Err(CliError::config_error(
                "No domains to serve: include_builtin is false and domains_dir is not set",
            ));
        }

        if self.http.host.trim().is_empty() {
            return Err(CliError::config_error("http.host must not be empty"));
        }

        if self.http.port == 0 {
            return Err(CliError::config_error("http.port must be > 0"));
        }

        Ok(())
    }

    /// Parsed `log_level`
    pub fn min_severity(&self) -> CliResult<Severity> {
        self.log_level.parse().map_err(|e: String| {
            CliError::config_error(format!("Invalid log_level '{}': {}", self.log_level, e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_from_minimal_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("vehidiag.json");
        fs::write(&path, "{}").unwrap();

        let config = Config::load(&path).unwrap();
        assert!(config.include_builtin);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.http.port, 8700);
        assert!(config.archive_path.is_none());
        assert_eq!(config.min_severity().unwrap(), Severity::Info);
    }

    #[test]
    fn test_full_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("vehidiag.json");
        fs::write(
            &path,
            r#"{
                "domains_dir": "/srv/domains",
                "include_builtin": false,
                "log_level": "warn",
                "archive_path": "/var/lib/vehidiag/sessions.jsonl",
                "http": {"host": "0.0.0.0", "port": 9000, "cors_origins": []}
            }"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.domains_dir, Some(PathBuf::from("/srv/domains")));
        assert_eq!(config.http.socket_addr(), "0.0.0.0:9000");
        assert_eq!(config.min_severity().unwrap(), Severity::Warn);
    }

    #[test]
    fn test_invalid_log_level() {
        let config = Config {
            log_level: "chatty".into(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err.code_str(), "DIAG_CLI_CONFIG_ERROR");
    }

    #[test]
    fn test_no_domains_rejected() {
        let config = Config {
            include_builtin: false,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let err = Config::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(err.message().contains("Failed to read config"));
    }

    #[test]
    fn test_malformed_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("vehidiag.json");
        fs::write(&path, "{ not json").unwrap();
        let err = Config::load(&path).unwrap_err();
        assert!(err.message().contains("Invalid config JSON"));
    }
}
