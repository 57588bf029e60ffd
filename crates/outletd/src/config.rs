//! Configuration management for outletd.
//!
//! Loads settings from an explicit path, then /etc/outletd/config.toml, or
//! uses defaults. The model API key is read from the environment variable
//! named in `[llm] api_key_env` and is the only setting whose absence stops
//! startup.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Config file path
pub const CONFIG_PATH: &str = "/etc/outletd/config.toml";

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the API binds to
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    "127.0.0.1:8000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

/// Outlet catalog location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite file holding the subway_outlets table
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "outlets.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Translator model settings (OpenAI-compatible chat completions)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL including the version segment
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Name of the environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default)]
    pub temperature: f64,

    #[serde(default = "default_top_p")]
    pub top_p: f64,

    /// Row limit suggested to the model when the question names none
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Sample rows shown to the model alongside the table DDL
    #[serde(default = "default_sample_rows")]
    pub sample_rows: usize,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}

fn default_api_key_env() -> String {
    "GROQ_API_KEY".to_string()
}

fn default_top_p() -> f64 {
    0.9
}

fn default_top_k() -> usize {
    5
}

fn default_sample_rows() -> usize {
    3
}

fn default_timeout() -> u64 {
    60
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            temperature: 0.0,
            top_p: default_top_p(),
            top_k: default_top_k(),
            sample_rows: default_sample_rows(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Full daemon configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub llm: LlmConfig,
}

impl Config {
    /// Load config from `path` if given (errors are fatal), else the system
    /// path, else defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from_path(path);
        }

        Ok(Self::load_from_path(Path::new(CONFIG_PATH)).unwrap_or_else(|e| {
            warn!("Config not found, using defaults: {}", e);
            Config::default()
        }))
    }

    fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Resolve the translator API key from the environment
    pub fn api_key(&self) -> Result<String> {
        match std::env::var(&self.llm.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => bail!(
                "{} is missing! Set it in the environment before starting outletd",
                self.llm.api_key_env
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.bind, "127.0.0.1:8000");
        assert_eq!(config.llm.model, "llama-3.3-70b-versatile");
        assert_eq!(config.llm.api_key_env, "GROQ_API_KEY");
        assert_eq!(config.llm.temperature, 0.0);
        assert_eq!(config.llm.top_p, 0.9);
        assert_eq!(config.llm.top_k, 5);
    }

    #[test]
    fn test_parse_toml() {
        let toml_str = r#"
[server]
bind = "0.0.0.0:9000"

[llm]
model = "llama-3.1-8b-instant"
top_k = 10
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:9000");
        assert_eq!(config.llm.model, "llama-3.1-8b-instant");
        assert_eq!(config.llm.top_k, 10);
        // Defaults for missing fields
        assert_eq!(config.database.path, "outlets.db");
        assert_eq!(config.llm.timeout_secs, 60);
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[database]\npath = \"/srv/outlets.db\"\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.database.path, "/srv/outlets.db");
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load(Some(&dir.path().join("nope.toml"))).is_err());
    }

    #[test]
    fn test_missing_api_key_fails() {
        let mut config = Config::default();
        config.llm.api_key_env = "OUTLETD_TEST_KEY_THAT_IS_NEVER_SET".to_string();
        let err = config.api_key().unwrap_err();
        assert!(err.to_string().contains("OUTLETD_TEST_KEY_THAT_IS_NEVER_SET"));
    }

    #[test]
    fn test_api_key_from_env() {
        let mut config = Config::default();
        config.llm.api_key_env = "OUTLETD_TEST_KEY_PRESENT".to_string();
        std::env::set_var("OUTLETD_TEST_KEY_PRESENT", "gsk_test");
        assert_eq!(config.api_key().unwrap(), "gsk_test");
    }
}
