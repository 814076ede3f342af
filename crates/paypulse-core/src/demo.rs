//! Demo seed data
//!
//! The wallet starts from a fixed profile and six sample transactions spread
//! over the last five days, relative to the time the wallet is built.

use chrono::{DateTime, Duration, Utc};

use crate::models::{Direction, Transaction, TransactionStatus, UserProfile};
use crate::wallet::Wallet;

struct Seed {
    id: &'static str,
    direction: Direction,
    amount: f64,
    hours_ago: i64,
    payee: &'static str,
    category: &'static str,
    note: Option<&'static str>,
}

const SEED: &[Seed] = &[
    Seed {
        id: "tx_1",
        direction: Direction::Debit,
        amount: 450.0,
        hours_ago: 2,
        payee: "Starbucks Coffee",
        category: "Food & Drink",
        note: Some("Morning coffee"),
    },
    Seed {
        id: "tx_2",
        direction: Direction::Credit,
        amount: 2500.0,
        hours_ago: 24,
        payee: "Jane Smith",
        category: "Transfer",
        note: Some("Dinner split"),
    },
    Seed {
        id: "tx_3",
        direction: Direction::Debit,
        amount: 1299.0,
        hours_ago: 48,
        payee: "Netflix",
        category: "Entertainment",
        note: Some("Monthly Subscription"),
    },
    Seed {
        id: "tx_4",
        direction: Direction::Debit,
        amount: 240.0,
        hours_ago: 72,
        payee: "Uber Rides",
        category: "Transport",
        note: None,
    },
    Seed {
        id: "tx_5",
        direction: Direction::Debit,
        amount: 3500.0,
        hours_ago: 96,
        payee: "Grocery Mart",
        category: "Groceries",
        note: Some("Weekly supplies"),
    },
    Seed {
        id: "tx_6",
        direction: Direction::Debit,
        amount: 150.0,
        hours_ago: 120,
        payee: "Spotify",
        category: "Entertainment",
        note: None,
    },
];

/// The demo user
pub fn demo_profile() -> UserProfile {
    UserProfile {
        name: "Alex Doe".to_string(),
        upi_id: "alex.doe@paypulse".to_string(),
        balance: 12500.75,
    }
}

/// Sample transactions, newest first, timestamped relative to `now`
pub fn demo_transactions(now: DateTime<Utc>) -> Vec<Transaction> {
    SEED.iter()
        .map(|seed| Transaction {
            id: seed.id.to_string(),
            direction: seed.direction,
            amount: seed.amount,
            timestamp: now - Duration::hours(seed.hours_ago),
            payee_name: Some(seed.payee.to_string()),
            payee_upi: None,
            category: seed.category.to_string(),
            status: TransactionStatus::Success,
            note: seed.note.map(str::to_string),
        })
        .collect()
}

impl Wallet {
    /// Wallet seeded with the demo profile and transactions
    pub fn demo() -> Self {
        Self::new(demo_profile(), demo_transactions(Utc::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_transactions() {
        let now = Utc::now();
        let txs = demo_transactions(now);

        assert_eq!(txs.len(), 6);
        assert_eq!(txs[0].payee_name.as_deref(), Some("Starbucks Coffee"));
        assert_eq!(txs[0].timestamp, now - Duration::hours(2));
        assert_eq!(
            txs.iter().filter(|t| t.direction == Direction::Credit).count(),
            1
        );
        assert!(txs.windows(2).all(|w| w[0].timestamp > w[1].timestamp));
    }

    #[test]
    fn test_demo_wallet() {
        let wallet = Wallet::demo();
        assert_eq!(wallet.balance(), 12500.75);
        assert_eq!(wallet.profile().upi_id, "alex.doe@paypulse");
        assert_eq!(wallet.total_spent(), 5639.0);
    }
}
