//! Domain models for PayPulse

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which way money moved in a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Money left the wallet
    Debit,
    /// Money arrived in the wallet
    Credit,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debit => "debit",
            Self::Credit => "credit",
        }
    }

    /// Display sign for amounts in this direction
    pub fn sign(&self) -> char {
        match self {
            Self::Debit => '-',
            Self::Credit => '+',
        }
    }
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debit" => Ok(Self::Debit),
            "credit" => Ok(Self::Credit),
            _ => Err(format!("Unknown direction: {}", s)),
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Settlement status of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    #[default]
    Success,
    Failed,
    Processing,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failed => "failed",
            Self::Processing => "processing",
        }
    }
}

impl std::str::FromStr for TransactionStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "success" => Ok(Self::Success),
            "failed" => Ok(Self::Failed),
            "processing" => Ok(Self::Processing),
            _ => Err(format!("Unknown transaction status: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A wallet transaction
///
/// Transactions are supplied by the wallet (or loaded from a JSON file) and
/// never mutated afterwards. The amount is a magnitude; `direction` carries
/// the sign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    #[serde(rename = "type")]
    pub direction: Direction,
    pub amount: f64,
    #[serde(rename = "date")]
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payee_name: Option<String>,
    /// Payee UPI address, display only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payee_upi: Option<String>,
    pub category: String,
    #[serde(default)]
    pub status: TransactionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Transaction {
    /// Amount as a non-negative magnitude
    pub fn magnitude(&self) -> f64 {
        self.amount.abs()
    }

    /// Amount with the direction's sign applied
    pub fn signed_amount(&self) -> f64 {
        match self.direction {
            Direction::Debit => -self.magnitude(),
            Direction::Credit => self.magnitude(),
        }
    }

    /// Name to show for the counterparty
    pub fn display_payee(&self) -> &str {
        self.payee_name
            .as_deref()
            .or(self.payee_upi.as_deref())
            .unwrap_or("Unknown")
    }
}

/// The wallet holder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub upi_id: String,
    pub balance: f64,
}
