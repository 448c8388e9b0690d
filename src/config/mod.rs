//! Configuration management.
//!
//! Settings come from a TOML file overlaid with `SCIPAPER_*` environment
//! variables (nested keys use `__`, e.g. `SCIPAPER_API__BASE_URL` reaches
//! `api.base_url`):
//!
//! ```toml
//! [api]
//! base_url = "http://127.0.0.1:8000"
//! timeout_secs = 30
//!
//! [ingest]
//! default_source = "arxiv"
//! max_results = 10
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Discovery service connection settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Ingest defaults
    #[serde(default)]
    pub ingest: IngestConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            ingest: IngestConfig::default(),
        }
    }
}

/// Connection settings for the discovery service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL the service listens on
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Defaults applied to ingest operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Source papers are pulled from when none is given on the command line
    #[serde(default = "default_source")]
    pub default_source: String,

    /// Cap on papers pulled per ingest
    #[serde(default = "default_max_results")]
    pub max_results: u32,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            default_source: default_source(),
            max_results: default_max_results(),
        }
    }
}

fn default_source() -> String {
    "arxiv".to_string()
}

fn default_max_results() -> u32 {
    10
}

impl Config {
    /// Save configuration to a TOML file, creating parent directories
    pub fn save(&self, path: &PathBuf) -> Result<(), ConfigFileError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| ConfigFileError::Io(e.to_string()))?;
            }
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigFileError::Serialize(e.to_string()))?;

        std::fs::write(path, content).map_err(|e| ConfigFileError::Io(e.to_string()))
    }
}

/// Configuration file errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialize error: {0}")]
    Serialize(String),
}

/// Load configuration from a file, with environment overrides
pub fn load_config(path: &PathBuf) -> Result<Config, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path.as_path()))
        .add_source(config::Environment::with_prefix("SCIPAPER").separator("__"))
        .build()?;

    settings.try_deserialize()
}

/// Get the default configuration
pub fn get_config() -> Config {
    Config::default()
}

/// Locate a configuration file in the conventional places
///
/// Probes `./scipaper.toml`, then `<config_dir>/scipaper/config.toml`.
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("scipaper.toml");
    if local.is_file() {
        return Some(local);
    }

    let user = dirs::config_dir()?.join("scipaper").join("config.toml");
    if user.is_file() {
        return Some(user);
    }
    None
}

/// Path `config init` writes to: `<config_dir>/scipaper/config.toml`
pub fn user_config_path() -> Option<PathBuf> {
    Some(dirs::config_dir()?.join("scipaper").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://127.0.0.1:8000");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.ingest.default_source, "arxiv");
        assert_eq!(config.ingest.max_results, 10);
    }

    #[test]
    fn test_load_config_fills_missing_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scipaper.toml");
        std::fs::write(
            &path,
            "[api]\nbase_url = \"http://paper-host:9000\"\n\n[ingest]\nmax_results = 25\n",
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.api.base_url, "http://paper-host:9000");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.ingest.default_source, "arxiv");
        assert_eq!(config.ingest.max_results, 25);
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.api.base_url = "http://10.0.0.7:8000".to_string();
        config.ingest.default_source = "pubmed".to_string();
        config.save(&path).unwrap();

        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded.api.base_url, "http://10.0.0.7:8000");
        assert_eq!(loaded.ingest.default_source, "pubmed");
    }

    #[test]
    fn test_load_config_missing_file_errors() {
        let path = PathBuf::from("/nonexistent/scipaper.toml");
        assert!(load_config(&path).is_err());
    }
}
