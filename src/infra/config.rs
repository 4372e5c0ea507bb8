// src/infra/config.rs — Configuration loading (TOML)

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::infra::errors::TillerError;
use crate::infra::paths;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub responders: RespondersConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Override for the session-notebook directory. Defaults to the
    /// platform data dir (see `paths::reports_dir`).
    pub reports_dir: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RespondersConfig {
    /// SQLite database for the data responder. Defaults to `paths::db_path`.
    pub database: Option<String>,

    /// Command spawned for the knowledge-lookup server. It must speak
    /// line-delimited JSON-RPC on stdin/stdout.
    pub lookup_command: String,

    /// Command invoked per chart request: question on stdin, reply with
    /// generated .png paths on stdout.
    pub chart_command: String,

    /// Wall-clock budget for a single responder call, in seconds.
    pub timeout_seconds: u64,
}

impl Default for RespondersConfig {
    fn default() -> Self {
        Self {
            database: None,
            lookup_command: "wikipedia-mcp".into(),
            chart_command: "chart-renderer".into(),
            timeout_seconds: 120,
        }
    }
}

impl Config {
    /// Load from the default config path; absent file means defaults.
    pub fn load() -> Result<Self, TillerError> {
        Self::load_from(&paths::config_file_path())
    }

    pub fn load_from(path: &Path) -> Result<Self, TillerError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw)
            .map_err(|e| TillerError::Config(format!("{}: {}", path.display(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.responders.lookup_command, "wikipedia-mcp");
        assert_eq!(config.responders.timeout_seconds, 120);
        assert!(config.responders.database.is_none());
        assert!(config.session.reports_dir.is_none());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [responders]
            lookup_command = "my-knowledge-server"
            chart_command = "chart-renderer"
            timeout_seconds = 30
            "#,
        )
        .unwrap();
        assert_eq!(config.responders.lookup_command, "my-knowledge-server");
        assert_eq!(config.responders.timeout_seconds, 30);
        assert!(config.session.reports_dir.is_none());
    }

    #[test]
    fn test_missing_file_is_default() {
        let config = Config::load_from(Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(config.responders.chart_command, "chart-renderer");
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "not [ valid toml").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, TillerError::Config(_)));
    }
}
