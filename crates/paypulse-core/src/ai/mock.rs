//! Mock backend for testing
//!
//! Returns scripted replies for structured generation and records every call.
//! Useful for unit tests and offline demos without an API key.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::types::ResponseSchema;
use super::AIBackend;

/// Canned reply used by `MockBackend::new()`
pub const CANNED_INSIGHT: &str = r#"{"spendingSummary":"Most of your recent spending went to groceries and entertainment subscriptions.","topCategory":"Groceries","actionableTip":"Review overlapping streaming subscriptions and keep only the one you use most.","spendingTrend":"stable"}"#;

/// What the mock returns from `generate_structured`
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Raw model text (may be invalid on purpose)
    Text(String),
    /// Simulated non-success response from the service
    Status { status: u16, body: String },
}

/// Mock AI backend for testing
///
/// Clones share the call counter and prompt log, so a test can keep a handle
/// while the client it built is moved into a session.
#[derive(Clone)]
pub struct MockBackend {
    /// Whether health_check should return true
    pub healthy: bool,
    reply: MockReply,
    delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    /// Create a new mock backend (healthy, returns a canned insight)
    pub fn new() -> Self {
        Self::replying(MockReply::Text(CANNED_INSIGHT.to_string()))
    }

    /// Create a mock that always returns `reply`
    pub fn replying(reply: MockReply) -> Self {
        Self {
            healthy: true,
            reply,
            delay: None,
            calls: Arc::new(AtomicUsize::new(0)),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock that returns the given model text
    pub fn with_text(text: &str) -> Self {
        Self::replying(MockReply::Text(text.to_string()))
    }

    /// Create a mock whose calls fail with a non-success status
    pub fn failing(status: u16, body: &str) -> Self {
        Self::replying(MockReply::Status {
            status,
            body: body.to_string(),
        })
    }

    /// Create an unhealthy mock backend
    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            ..Self::new()
        }
    }

    /// Delay every reply, to keep a request in flight
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Create a new instance with a different model (no-op for mock)
    pub fn with_model(&self, _model: &str) -> Self {
        self.clone()
    }

    /// Number of `generate_structured` calls made so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Prompts received, oldest first
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl AIBackend for MockBackend {
    async fn generate_structured(&self, prompt: &str, _schema: &ResponseSchema) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.reply {
            MockReply::Text(text) => Ok(text.clone()),
            MockReply::Status { status, body } => Err(Error::Api {
                status: *status,
                body: body.clone(),
            }),
        }
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}
