//! In-memory wallet
//!
//! Holds the user profile and transaction history for one app run. Payments
//! are simulated: validation mirrors a payment form, then the balance is
//! debited and a transaction appended. Nothing is persisted.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::info;

use crate::models::{Direction, Transaction, TransactionStatus, UserProfile};

/// Category assigned to peer-to-peer payments
pub const TRANSFER_CATEGORY: &str = "Transfer";

/// Why a payment was rejected
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PaymentError {
    #[error("Invalid UPI ID format. Must contain '@'.")]
    InvalidUpiId,

    #[error("Please enter a valid amount.")]
    InvalidAmount,

    #[error("Insufficient balance: requested {requested:.2}, available {available:.2}")]
    InsufficientBalance { requested: f64, available: f64 },
}

/// A payment to record
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRequest {
    pub payee_upi: String,
    /// Verified display name, when known
    pub payee_name: Option<String>,
    pub amount: f64,
    pub note: Option<String>,
}

impl PaymentRequest {
    pub fn new(payee_upi: &str, amount: f64) -> Self {
        Self {
            payee_upi: payee_upi.to_string(),
            payee_name: None,
            amount,
            note: None,
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.payee_name = Some(name.to_string());
        self
    }

    pub fn with_note(mut self, note: &str) -> Self {
        self.note = Some(note.to_string());
        self
    }
}

/// Check a UPI address (`name@handle`)
pub fn validate_upi_id(upi_id: &str) -> Result<(), PaymentError> {
    if upi_id.trim().contains('@') {
        Ok(())
    } else {
        Err(PaymentError::InvalidUpiId)
    }
}

/// History filter by direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DirectionFilter {
    #[default]
    All,
    Debit,
    Credit,
}

impl DirectionFilter {
    fn matches(&self, direction: Direction) -> bool {
        match self {
            Self::All => true,
            Self::Debit => direction == Direction::Debit,
            Self::Credit => direction == Direction::Credit,
        }
    }
}

impl std::str::FromStr for DirectionFilter {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "debit" | "debits" => Ok(Self::Debit),
            "credit" | "credits" => Ok(Self::Credit),
            _ => Err(format!("Unknown filter: {}", s)),
        }
    }
}

/// Transaction history query
#[derive(Debug, Clone, Default)]
pub struct HistoryFilter {
    pub direction: DirectionFilter,
    /// Case-insensitive match on payee, category or amount
    pub search: Option<String>,
}

impl HistoryFilter {
    pub fn matches(&self, tx: &Transaction) -> bool {
        if !self.direction.matches(tx.direction) {
            return false;
        }

        let Some(term) = self.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) else {
            return true;
        };
        let term = term.to_lowercase();

        tx.payee_name
            .as_deref()
            .is_some_and(|p| p.to_lowercase().contains(&term))
            || tx.category.to_lowercase().contains(&term)
            || tx.magnitude().to_string().contains(&term)
    }
}

/// The user's wallet for one session
#[derive(Debug, Clone)]
pub struct Wallet {
    profile: UserProfile,
    transactions: Vec<Transaction>,
}

impl Wallet {
    pub fn new(profile: UserProfile, transactions: Vec<Transaction>) -> Self {
        Self {
            profile,
            transactions,
        }
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn balance(&self) -> f64 {
        self.profile.balance
    }

    /// All transactions in insertion order
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Most recent `limit` transactions, newest first
    pub fn recent(&self, limit: usize) -> Vec<&Transaction> {
        let mut sorted: Vec<&Transaction> = self.transactions.iter().collect();
        sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        sorted.truncate(limit);
        sorted
    }

    /// Transactions matching `filter`, newest first
    pub fn history(&self, filter: &HistoryFilter) -> Vec<&Transaction> {
        let mut matched: Vec<&Transaction> = self
            .transactions
            .iter()
            .filter(|tx| filter.matches(tx))
            .collect();
        matched.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        matched
    }

    /// Total of successful debits
    pub fn total_spent(&self) -> f64 {
        self.transactions
            .iter()
            .filter(|tx| tx.direction == Direction::Debit && tx.status == TransactionStatus::Success)
            .map(|tx| tx.magnitude())
            .sum()
    }

    /// Validate and record a payment at the current time
    pub fn record_payment(&mut self, request: PaymentRequest) -> Result<&Transaction, PaymentError> {
        self.record_payment_at(request, Utc::now())
    }

    /// Validate and record a payment with an explicit timestamp
    pub fn record_payment_at(
        &mut self,
        request: PaymentRequest,
        at: DateTime<Utc>,
    ) -> Result<&Transaction, PaymentError> {
        validate_upi_id(&request.payee_upi)?;

        if !request.amount.is_finite() || request.amount <= 0.0 {
            return Err(PaymentError::InvalidAmount);
        }
        if request.amount > self.profile.balance {
            return Err(PaymentError::InsufficientBalance {
                requested: request.amount,
                available: self.profile.balance,
            });
        }

        self.profile.balance -= request.amount;

        let payee_upi = request.payee_upi.trim().to_string();
        let tx = Transaction {
            id: format!("tx_{}_{}", at.timestamp_millis(), self.transactions.len() + 1),
            direction: Direction::Debit,
            amount: request.amount,
            timestamp: at,
            payee_name: Some(request.payee_name.unwrap_or_else(|| payee_upi.clone())),
            payee_upi: Some(payee_upi),
            category: TRANSFER_CATEGORY.to_string(),
            status: TransactionStatus::Success,
            note: request.note.filter(|n| !n.trim().is_empty()),
        };

        info!(
            id = %tx.id,
            amount = tx.amount,
            balance = self.profile.balance,
            "Payment recorded"
        );

        self.transactions.push(tx);
        Ok(&self.transactions[self.transactions.len() - 1])
    }

    /// UPI deep link for receiving money
    pub fn receive_uri(&self) -> String {
        format!(
            "upi://pay?pa={}&pn={}&cu=INR",
            self.profile.upi_id,
            encode_uri_component(&self.profile.name)
        )
    }
}

/// Percent-encode everything except the URI-component unreserved set
fn encode_uri_component(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(byte as char),
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}
