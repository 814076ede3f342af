//! PayPulse Core Library
//!
//! Shared functionality for the PayPulse wallet:
//! - Wallet state, simulated payments and transaction history
//! - Pluggable AI backends (Gemini, Ollama, mock) with schema-constrained output
//! - Spending insights: prompt projection, reply validation and the
//!   per-panel insight session
//! - Prompt library with user overrides
//! - Layered configuration (embedded defaults, file, environment)

pub mod ai;
pub mod config;
pub mod currency;
pub mod demo;
pub mod error;
pub mod insights;
pub mod models;
pub mod prompts;
pub mod wallet;

/// Test utilities including a mock AI server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use ai::{
    AIBackend, AIClient, FieldKind, GeminiBackend, MockBackend, OllamaBackend, ResponseSchema,
};
pub use config::{AiConfig, BackendKind, Config};
pub use currency::{format_inr, format_transaction_amount};
pub use error::{Error, Result};
pub use insights::{
    AnalysisError, AnalysisErrorKind, InsightRequester, InsightResult, InsightSession,
    SessionFailure, SessionState, SpendingTrend,
};
pub use models::{Direction, Transaction, TransactionStatus, UserProfile};
pub use prompts::{Prompt, PromptId, PromptInfo, PromptLibrary};
pub use wallet::{DirectionFilter, HistoryFilter, PaymentError, PaymentRequest, Wallet};
