//! Core types for spending insights

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::ai::ResponseSchema;
use crate::error::Error;
use crate::models::{Direction, Transaction};

/// Direction of spending over the analyzed period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpendingTrend {
    Increasing,
    Decreasing,
    Stable,
}

impl SpendingTrend {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpendingTrend::Increasing => "increasing",
            SpendingTrend::Decreasing => "decreasing",
            SpendingTrend::Stable => "stable",
        }
    }

    /// Every literal the model may return
    pub fn all() -> &'static [SpendingTrend] {
        &[
            SpendingTrend::Increasing,
            SpendingTrend::Decreasing,
            SpendingTrend::Stable,
        ]
    }
}

impl fmt::Display for SpendingTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SpendingTrend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "increasing" => Ok(SpendingTrend::Increasing),
            "decreasing" => Ok(SpendingTrend::Decreasing),
            "stable" => Ok(SpendingTrend::Stable),
            _ => Err(format!("Unknown spending trend: {}", s)),
        }
    }
}

/// Structured insight returned by the model
///
/// Deserializing enforces the contract: all four fields must be present and
/// be strings, and `spendingTrend` must be one of the three literals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightResult {
    pub spending_summary: String,
    pub top_category: String,
    pub actionable_tip: String,
    pub spending_trend: SpendingTrend,
}

impl InsightResult {
    /// Output schema declared to the model
    pub fn schema() -> ResponseSchema {
        let trends: Vec<&str> = SpendingTrend::all().iter().map(|t| t.as_str()).collect();
        ResponseSchema::new()
            .string("spendingSummary")
            .string("topCategory")
            .string("actionableTip")
            .enumeration("spendingTrend", &trends)
    }
}

/// A transaction reduced to what the model needs
///
/// Identifiers, status and UPI addresses are never included.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectedTransaction<'a> {
    pub date: DateTime<Utc>,
    pub amount: f64,
    #[serde(rename = "type")]
    pub direction: Direction,
    pub category: &'a str,
    pub payee: Option<&'a str>,
    pub note: Option<&'a str>,
}

impl<'a> From<&'a Transaction> for ProjectedTransaction<'a> {
    fn from(tx: &'a Transaction) -> Self {
        Self {
            date: tx.timestamp,
            amount: tx.magnitude(),
            direction: tx.direction,
            category: &tx.category,
            payee: tx.payee_name.as_deref(),
            note: tx.note.as_deref(),
        }
    }
}

/// Outbound payload: the ordered projection of a transaction history
///
/// Serializes as a bare JSON array.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct InsightRequest<'a> {
    pub transactions: Vec<ProjectedTransaction<'a>>,
}

impl<'a> InsightRequest<'a> {
    pub fn from_transactions(transactions: &'a [Transaction]) -> Self {
        Self {
            transactions: transactions.iter().map(ProjectedTransaction::from).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

/// Why an analysis failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisErrorKind {
    /// The external call could not complete (network, timeout, HTTP status, auth)
    TransportFailure,
    /// The call completed but the payload failed parsing or validation
    MalformedResponse,
}

impl AnalysisErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisErrorKind::TransportFailure => "transport_failure",
            AnalysisErrorKind::MalformedResponse => "malformed_response",
        }
    }
}

impl fmt::Display for AnalysisErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned by the insight requester
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct AnalysisError {
    pub kind: AnalysisErrorKind,
    pub message: String,
}

impl AnalysisError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: AnalysisErrorKind::TransportFailure,
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self {
            kind: AnalysisErrorKind::MalformedResponse,
            message: message.into(),
        }
    }

    pub fn is_transport(&self) -> bool {
        self.kind == AnalysisErrorKind::TransportFailure
    }

    pub fn is_malformed(&self) -> bool {
        self.kind == AnalysisErrorKind::MalformedResponse
    }
}

impl From<Error> for AnalysisError {
    fn from(err: Error) -> Self {
        let message = err.to_string();
        match err {
            Error::Http(_) | Error::Api { .. } | Error::Io(_) | Error::Config(_) => {
                AnalysisError::transport(message)
            }
            Error::Json(_) | Error::InvalidData(_) => AnalysisError::malformed(message),
        }
    }
}
