//! Pluggable structured-generation backends
//!
//! This module provides a backend-agnostic interface for the one operation
//! the insights feature needs: generate text from a prompt, constrained to a
//! declared JSON output schema.
//!
//! # Architecture
//!
//! - `AIBackend` trait: defines the interface for all AI backends
//! - `AIClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `GeminiBackend`, `OllamaBackend`, `MockBackend`
//!
//! # Usage
//!
//! ```rust,ignore
//! let config = Config::load()?;
//! if let Some(client) = AIClient::from_config(&config.ai) {
//!     let text = client.generate_structured(&prompt, &schema).await?;
//! }
//! ```
//!
//! Backends only own transport. Parsing and validating the returned text is
//! the caller's job (see `parsing`).

mod gemini;
mod mock;
mod ollama;
pub mod parsing;
pub mod types;

pub use gemini::{GeminiBackend, DEFAULT_GEMINI_HOST, DEFAULT_GEMINI_MODEL};
pub use mock::{MockBackend, MockReply, CANNED_INSIGHT};
pub use ollama::{OllamaBackend, DEFAULT_OLLAMA_MODEL};
pub use types::*;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::warn;

use crate::config::{AiConfig, BackendKind};
use crate::error::Result;

/// Trait defining the interface for all AI backends
///
/// Backends should be Send + Sync to allow use across async tasks.
#[async_trait]
pub trait AIBackend: Send + Sync {
    /// Generate a response to `prompt` constrained to `schema`
    ///
    /// Returns the raw model text. Exactly one request is made; no retries.
    async fn generate_structured(&self, prompt: &str, schema: &ResponseSchema) -> Result<String>;

    /// Check if the backend is available
    async fn health_check(&self) -> bool;

    /// Get the model name (for logging)
    fn model(&self) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete AI client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum AIClient {
    /// Google Gemini (generateContent with responseSchema)
    Gemini(GeminiBackend),
    /// Local Ollama server (format = JSON schema)
    Ollama(OllamaBackend),
    /// Mock backend for testing
    Mock(MockBackend),
}

impl AIClient {
    /// Create an AI client from configuration
    ///
    /// Returns None if the selected backend is missing a required setting:
    /// an API key for Gemini, a host for Ollama.
    pub fn from_config(config: &AiConfig) -> Option<Self> {
        let http_client = http_client(config.timeout);

        match config.backend {
            BackendKind::Gemini => {
                let api_key = config.api_key.as_deref()?;
                let host = config.host.as_deref().unwrap_or(DEFAULT_GEMINI_HOST);
                let model = config.model.as_deref().unwrap_or(DEFAULT_GEMINI_MODEL);
                Some(AIClient::Gemini(GeminiBackend::with_client(
                    http_client,
                    host,
                    model,
                    api_key,
                )))
            }
            BackendKind::Ollama => {
                let host = config.host.as_deref()?;
                let model = config.model.as_deref().unwrap_or(DEFAULT_OLLAMA_MODEL);
                Some(AIClient::Ollama(OllamaBackend::with_client(
                    http_client,
                    host,
                    model,
                )))
            }
            BackendKind::Mock => Some(AIClient::Mock(MockBackend::new())),
        }
    }

    /// Create a Gemini backend directly
    pub fn gemini(api_key: &str, model: &str) -> Self {
        AIClient::Gemini(GeminiBackend::new(DEFAULT_GEMINI_HOST, model, api_key))
    }

    /// Create an Ollama backend directly
    pub fn ollama(host: &str, model: &str) -> Self {
        AIClient::Ollama(OllamaBackend::new(host, model))
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        AIClient::Mock(MockBackend::new())
    }

    /// Create a new instance with a different model
    pub fn with_model(&self, model: &str) -> Self {
        match self {
            AIClient::Gemini(b) => AIClient::Gemini(b.with_model(model)),
            AIClient::Ollama(b) => AIClient::Ollama(b.with_model(model)),
            AIClient::Mock(b) => AIClient::Mock(b.with_model(model)),
        }
    }
}

impl From<MockBackend> for AIClient {
    fn from(backend: MockBackend) -> Self {
        AIClient::Mock(backend)
    }
}

/// Build an HTTP client with the configured timeout
fn http_client(timeout: Duration) -> Client {
    Client::builder().timeout(timeout).build().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to build HTTP client with timeout, using defaults");
        Client::new()
    })
}

// Implement AIBackend for AIClient by delegating to the inner backend
#[async_trait]
impl AIBackend for AIClient {
    async fn generate_structured(&self, prompt: &str, schema: &ResponseSchema) -> Result<String> {
        match self {
            AIClient::Gemini(b) => b.generate_structured(prompt, schema).await,
            AIClient::Ollama(b) => b.generate_structured(prompt, schema).await,
            AIClient::Mock(b) => b.generate_structured(prompt, schema).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            AIClient::Gemini(b) => b.health_check().await,
            AIClient::Ollama(b) => b.health_check().await,
            AIClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            AIClient::Gemini(b) => b.model(),
            AIClient::Ollama(b) => b.model(),
            AIClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            AIClient::Gemini(b) => b.host(),
            AIClient::Ollama(b) => b.host(),
            AIClient::Mock(b) => b.host(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ai_client_mock() {
        let client = AIClient::mock();
        assert_eq!(client.model(), "mock");
        assert_eq!(client.host(), "mock://localhost");
    }

    #[tokio::test]
    async fn test_mock_health_check() {
        let client = AIClient::mock();
        assert!(client.health_check().await);
    }

    #[test]
    fn test_from_config_gemini_requires_api_key() {
        let mut config = AiConfig::default();
        assert!(AIClient::from_config(&config).is_none());

        config.api_key = Some("key".to_string());
        let client = AIClient::from_config(&config).unwrap();
        assert!(matches!(client, AIClient::Gemini(_)));
        assert_eq!(client.model(), DEFAULT_GEMINI_MODEL);
        assert_eq!(client.host(), DEFAULT_GEMINI_HOST);
    }

    #[test]
    fn test_from_config_ollama_requires_host() {
        let mut config = AiConfig {
            backend: BackendKind::Ollama,
            ..AiConfig::default()
        };
        assert!(AIClient::from_config(&config).is_none());

        config.host = Some("http://localhost:11434/".to_string());
        config.model = Some("qwen2.5".to_string());
        let client = AIClient::from_config(&config).unwrap();
        assert_eq!(client.host(), "http://localhost:11434");
        assert_eq!(client.model(), "qwen2.5");
    }

    #[test]
    fn test_with_model() {
        let client = AIClient::gemini("key", DEFAULT_GEMINI_MODEL).with_model("gemini-2.5-pro");
        assert_eq!(client.model(), "gemini-2.5-pro");
    }
}
