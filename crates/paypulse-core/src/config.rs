//! Insights configuration
//!
//! Selects the AI backend and its settings. Resolution order:
//! 1. Embedded defaults (compiled into binary)
//! 2. Override file in data dir (~/.local/share/paypulse/config/insights.toml)
//! 3. Environment variables
//!
//! ```toml
//! [ai]
//! backend = "gemini"
//! model = "gemini-2.5-flash"
//! timeout_secs = 60
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/insights.toml");

/// Which AI backend serves structured generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    /// Google Gemini REST API
    #[default]
    Gemini,
    /// Local Ollama server
    Ollama,
    /// Scripted mock (no network)
    Mock,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::Ollama => "ollama",
            Self::Mock => "mock",
        }
    }
}

impl std::str::FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gemini" | "google" => Ok(Self::Gemini),
            "ollama" => Ok(Self::Ollama),
            "mock" => Ok(Self::Mock),
            _ => Err(format!("Unknown AI backend: {}", s)),
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// AI backend settings
#[derive(Debug, Clone, PartialEq)]
pub struct AiConfig {
    pub backend: BackendKind,
    /// Model name (backend default when unset)
    pub model: Option<String>,
    /// Base URL (backend default when unset; required for Ollama)
    pub host: Option<String>,
    /// API key (Gemini only)
    pub api_key: Option<String>,
    /// HTTP client timeout
    pub timeout: Duration,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            model: None,
            host: None,
            api_key: None,
            timeout: Duration::from_secs(60),
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub ai: AiConfig,
}

impl Config {
    /// Load the embedded defaults, the override file (if any) and the
    /// process environment
    pub fn load() -> Result<Self> {
        let mut config = load_file(default_config_path().as_deref())?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load from an explicit override path, then the process environment
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = load_file(Some(path))?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parse configuration from TOML content
    pub fn from_toml(content: &str) -> Result<Self> {
        parse_config(content)
    }

    /// Apply environment overrides using `lookup` to read variables
    ///
    /// Switching backends through `AI_BACKEND` discards the file's model and
    /// host, which belong to the previous backend.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(name) = lookup("AI_BACKEND") {
            match name.parse::<BackendKind>() {
                Ok(kind) if kind != self.ai.backend => {
                    self.ai.backend = kind;
                    self.ai.model = None;
                    self.ai.host = None;
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(backend = %name, "{}, keeping {}", e, self.ai.backend);
                }
            }
        }

        match self.ai.backend {
            BackendKind::Gemini => {
                if let Some(key) = lookup("GEMINI_API_KEY").or_else(|| lookup("API_KEY")) {
                    self.ai.api_key = Some(key);
                }
                if let Some(model) = lookup("GEMINI_MODEL") {
                    self.ai.model = Some(model);
                }
                if let Some(host) = lookup("GEMINI_HOST") {
                    self.ai.host = Some(host);
                }
            }
            BackendKind::Ollama => {
                if let Some(model) = lookup("OLLAMA_MODEL") {
                    self.ai.model = Some(model);
                }
                if let Some(host) = lookup("OLLAMA_HOST") {
                    self.ai.host = Some(host);
                }
            }
            BackendKind::Mock => {}
        }
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("paypulse").join("config").join("insights.toml"))
}

/// Load configuration (override first, then default)
fn load_file(override_path: Option<&Path>) -> Result<Config> {
    let content = match override_path {
        Some(path) if path.exists() => {
            debug!(path = %path.display(), "Loading insights config override");
            fs::read_to_string(path)
                .map_err(|e| Error::Config(format!("Failed to read config: {}", e)))?
        }
        _ => DEFAULT_CONFIG.to_string(),
    };

    parse_config(&content)
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    ai: Option<RawAiConfig>,
}

#[derive(Debug, Deserialize)]
struct RawAiConfig {
    backend: Option<String>,
    model: Option<String>,
    host: Option<String>,
    api_key: Option<String>,
    timeout_secs: Option<u64>,
}

/// Parse config from TOML content
fn parse_config(content: &str) -> Result<Config> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = Config::default();

    if let Some(ai) = raw.ai {
        if let Some(backend) = ai.backend {
            config.ai.backend = backend.parse().map_err(Error::Config)?;
        }
        config.ai.model = ai.model;
        config.ai.host = ai.host;
        config.ai.api_key = ai.api_key;
        if let Some(timeout) = ai.timeout_secs {
            config.ai.timeout = Duration::from_secs(timeout);
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_parse_default_config() {
        let config = Config::from_toml(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.ai.backend, BackendKind::Gemini);
        assert_eq!(config.ai.model.as_deref(), Some("gemini-2.5-flash"));
        assert_eq!(config.ai.timeout, Duration::from_secs(60));
        assert!(config.ai.api_key.is_none());
    }

    #[test]
    fn test_parse_empty_config_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_unknown_backend_is_config_error() {
        let err = Config::from_toml("[ai]\nbackend = \"carrier-pigeon\"").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_env_api_key_fallback() {
        let mut config = Config::from_toml(DEFAULT_CONFIG).unwrap();
        config.apply_env(env(&[("API_KEY", "legacy-key")]));
        assert_eq!(config.ai.api_key.as_deref(), Some("legacy-key"));

        config.apply_env(env(&[("GEMINI_API_KEY", "new-key"), ("API_KEY", "legacy-key")]));
        assert_eq!(config.ai.api_key.as_deref(), Some("new-key"));
    }

    #[test]
    fn test_env_backend_switch_drops_file_model() {
        let mut config = Config::from_toml(DEFAULT_CONFIG).unwrap();
        config.apply_env(env(&[
            ("AI_BACKEND", "ollama"),
            ("OLLAMA_HOST", "http://localhost:11434"),
        ]));
        assert_eq!(config.ai.backend, BackendKind::Ollama);
        assert!(config.ai.model.is_none());
        assert_eq!(config.ai.host.as_deref(), Some("http://localhost:11434"));
    }

    #[test]
    fn test_env_unknown_backend_is_ignored() {
        let mut config = Config::from_toml(DEFAULT_CONFIG).unwrap();
        config.apply_env(env(&[("AI_BACKEND", "nope")]));
        assert_eq!(config.ai.backend, BackendKind::Gemini);
        assert_eq!(config.ai.model.as_deref(), Some("gemini-2.5-flash"));
    }

    #[test]
    fn test_load_file_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("insights.toml");
        fs::write(&path, "[ai]\nbackend = \"mock\"\ntimeout_secs = 5\n").unwrap();

        let config = load_file(Some(&path)).unwrap();
        assert_eq!(config.ai.backend, BackendKind::Mock);
        assert_eq!(config.ai.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_load_file_missing_override_uses_embedded() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_file(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.ai.backend, BackendKind::Gemini);
    }
}
