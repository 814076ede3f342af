//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `wallet` - Dashboard, history, receive and send
//! - `insights` - AI spending insights panel
//! - `ai` - AI backend connectivity test
//! - `prompts` - Prompt library management commands

pub mod ai;
pub mod insights;
pub mod prompts;
pub mod wallet;

// Re-export command functions for main.rs
pub use ai::*;
pub use insights::*;
pub use prompts::*;
pub use wallet::*;

use std::path::Path;

use anyhow::{Context, Result};
use paypulse_core::demo::demo_profile;
use paypulse_core::{AiConfig, BackendKind, Config, Transaction, Wallet};

/// Build the wallet for this run: the demo data, or the demo profile with
/// transactions loaded from a JSON file
pub fn load_wallet(transactions: Option<&Path>) -> Result<Wallet> {
    let Some(path) = transactions else {
        return Ok(Wallet::demo());
    };

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read transactions file {}", path.display()))?;
    let transactions = parse_transactions(&content)
        .with_context(|| format!("Invalid transactions file {}", path.display()))?;

    Ok(Wallet::new(demo_profile(), transactions))
}

/// Parse a JSON array of transactions
pub fn parse_transactions(content: &str) -> Result<Vec<Transaction>> {
    Ok(serde_json::from_str(content)?)
}

/// Load AI settings, with an optional backend override from the command line
pub fn load_ai_config(backend: Option<&str>) -> Result<AiConfig> {
    let mut config = Config::load().context("Failed to load insights config")?;

    if let Some(name) = backend {
        let kind: BackendKind = name.parse().map_err(anyhow::Error::msg)?;
        // Re-run env resolution as if AI_BACKEND selected this backend
        config.apply_env(|key| {
            if key == "AI_BACKEND" {
                Some(kind.to_string())
            } else {
                std::env::var(key).ok()
            }
        });
    }

    Ok(config.ai)
}

/// What to tell the user when a backend cannot be built from the config
pub fn missing_backend_hint(config: &AiConfig) -> &'static str {
    match config.backend {
        BackendKind::Gemini => "Set GEMINI_API_KEY (or API_KEY) to use Gemini",
        BackendKind::Ollama => "Set OLLAMA_HOST (e.g. http://localhost:11434) to use Ollama",
        BackendKind::Mock => "The mock backend needs no settings",
    }
}

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
