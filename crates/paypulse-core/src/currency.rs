//! Indian-rupee display formatting
//!
//! Amounts use lakh grouping: the last three integer digits form one group,
//! everything above is grouped in pairs (`₹1,25,000.00`).

use crate::models::Transaction;

pub const RUPEE: char = '₹';

/// Format an amount as rupees with two decimals
pub fn format_inr(amount: f64) -> String {
    let paise = (amount.abs() * 100.0).round() as u64;
    let rupees = paise / 100;
    let fraction = paise % 100;
    let sign = if amount < 0.0 && paise > 0 { "-" } else { "" };

    format!("{}{}{}.{:02}", sign, RUPEE, group_lakh(rupees), fraction)
}

/// Format a transaction amount with its direction sign (`-₹450.00`)
pub fn format_transaction_amount(tx: &Transaction) -> String {
    format!("{}{}", tx.direction.sign(), format_inr(tx.magnitude()))
}

fn group_lakh(value: u64) -> String {
    let digits = value.to_string();
    if digits.len() <= 3 {
        return digits;
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 2 {
        groups.push(&head[end - 2..end]);
        end -= 2;
    }
    groups.push(&head[..end]);
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Direction, TransactionStatus};
    use chrono::Utc;

    #[test]
    fn test_format_small_amounts() {
        assert_eq!(format_inr(0.0), "₹0.00");
        assert_eq!(format_inr(450.0), "₹450.00");
        assert_eq!(format_inr(999.999), "₹1,000.00");
    }

    #[test]
    fn test_format_lakh_grouping() {
        assert_eq!(format_inr(12500.75), "₹12,500.75");
        assert_eq!(format_inr(125000.0), "₹1,25,000.00");
        assert_eq!(format_inr(12345678.9), "₹1,23,45,678.90");
    }

    #[test]
    fn test_format_negative() {
        assert_eq!(format_inr(-1299.0), "-₹1,299.00");
        assert_eq!(format_inr(-0.001), "₹0.00");
    }

    #[test]
    fn test_format_transaction_amount() {
        let tx = Transaction {
            id: "tx".into(),
            direction: Direction::Credit,
            amount: 2500.0,
            timestamp: Utc::now(),
            payee_name: None,
            payee_upi: None,
            category: "Transfer".into(),
            status: TransactionStatus::Success,
            note: None,
        };
        assert_eq!(format_transaction_amount(&tx), "+₹2,500.00");
    }
}
