//! Configuration — YAML file with defaults for every field.
//!
//! ```yaml
//! llm:
//!   model: trinity
//!   temperature: 0.7
//!   max_tokens: 4000
//! history:
//!   path: .ui-builder/versions.json
//!   capacity: 20
//! ```
//!
//! The API key is never read from this file; it comes from the environment or CLI.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::history::{DEFAULT_CAPACITY, DEFAULT_PATH};
use crate::llm::client::DEFAULT_BASE_URL;
use crate::llm::types::DEFAULT_MODEL;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub llm: LlmConfig,
    pub history: HistoryConfig,
}

/// Transport settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Model alias or full model ID.
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Sent as `HTTP-Referer` for OpenRouter attribution.
    pub referer: Option<String>,
    /// Sent as `X-Title` for OpenRouter attribution.
    pub title: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: 0.7,
            max_tokens: 4000,
            referer: None,
            title: Some("AI UI Builder".to_string()),
        }
    }
}

/// Version history settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Where versions are saved. `null` keeps history in memory only.
    pub path: Option<PathBuf>,
    pub capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            path: Some(PathBuf::from(DEFAULT_PATH)),
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl Config {
    /// Parse a config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Load a config file. A missing `path` argument yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.llm.model, DEFAULT_MODEL);
        assert_eq!(config.llm.base_url, "https://openrouter.ai/api/v1");
        assert_eq!(config.llm.max_tokens, 4000);
        assert_eq!(config.history.capacity, 20);
        assert_eq!(
            config.history.path.as_deref(),
            Some(Path::new(".ui-builder/versions.json"))
        );
    }

    #[test]
    fn null_history_path_disables_persistence() {
        let config = Config::from_yaml("history:\n  path: null\n").unwrap();
        assert!(config.history.path.is_none());
        assert_eq!(config.history.capacity, 20);
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let config = Config::from_yaml("llm:\n  model: trinity-mini\n  temperature: 0.3\n").unwrap();
        assert_eq!(config.llm.model, "trinity-mini");
        assert!((config.llm.temperature - 0.3).abs() < f32::EPSILON);
        assert_eq!(config.llm.max_tokens, 4000);
        assert_eq!(config.history.capacity, 20);
    }

    #[test]
    fn history_section() {
        let config =
            Config::from_yaml("history:\n  path: /tmp/versions.json\n  capacity: 5\n").unwrap();
        assert_eq!(config.history.capacity, 5);
        assert_eq!(
            config.history.path.as_deref(),
            Some(Path::new("/tmp/versions.json"))
        );
    }

    #[test]
    fn load_without_path_is_default() {
        let config = Config::load(None).unwrap();
        assert_eq!(config.llm.model, DEFAULT_MODEL);
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("ui-builder.yaml");
        std::fs::write(&path, "llm:\n  max_tokens: 1000\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.llm.max_tokens, 1000);
    }

    #[test]
    fn load_missing_file_errors() {
        let err = Config::load(Some(Path::new("/nonexistent/ui-builder.yaml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn load_invalid_yaml_errors() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "llm: [unclosed").unwrap();

        let err = Config::load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Yaml { .. }));
        assert!(err.to_string().contains("bad.yaml"));
    }
}
