//! Wallet command implementations (dashboard, history, receive, send)

use anyhow::{Context, Result};
use paypulse_core::currency::{format_inr, format_transaction_amount};
use paypulse_core::{
    Direction, DirectionFilter, HistoryFilter, PaymentRequest, Transaction, TransactionStatus,
    Wallet,
};

use super::truncate;

/// Number of transactions shown on the dashboard
const DASHBOARD_RECENT: usize = 3;

pub fn cmd_dashboard(wallet: &Wallet) -> Result<()> {
    let profile = wallet.profile();

    println!();
    println!("╭─────────────────────────────────────────╮");
    println!("│           💸 PayPulse Wallet            │");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  Hello, {}", profile.name);
    println!("  UPI ID:          {}", profile.upi_id);
    println!("  Balance:         {}", format_inr(wallet.balance()));
    println!("  Total spent:     {}", format_inr(wallet.total_spent()));
    println!();

    let recent = wallet.recent(DASHBOARD_RECENT);
    if recent.is_empty() {
        println!("  No transactions yet.");
    } else {
        println!("  📝 Recent Activity");
        println!("     ─────────────────────────────────────────────────────────");
        for tx in recent {
            println!("     {}", format_history_line(tx));
        }
    }

    println!();
    println!("  Run 'paypulse insights' for an AI analysis of your spending.");

    Ok(())
}

pub fn cmd_history(
    wallet: &Wallet,
    filter: &str,
    search: Option<&str>,
    limit: usize,
) -> Result<()> {
    let direction: DirectionFilter = filter.parse().map_err(anyhow::Error::msg)?;
    let filter = HistoryFilter {
        direction,
        search: search.map(str::to_string),
    };

    let transactions = wallet.history(&filter);

    if transactions.is_empty() {
        match search {
            Some(term) => println!("No transactions match '{}'.", term),
            None => println!("No transactions found."),
        }
        return Ok(());
    }

    println!();
    println!("📝 Transaction History ({} shown)", transactions.len().min(limit));
    println!("   ─────────────────────────────────────────────────────────────");

    for tx in transactions.into_iter().take(limit) {
        println!("   {}", format_history_line(tx));
    }

    Ok(())
}

pub fn cmd_receive(wallet: &Wallet) -> Result<()> {
    let profile = wallet.profile();

    println!();
    println!("📥 Receive Money");
    println!("   ─────────────────────────────");
    println!("   Name:    {}", profile.name);
    println!("   UPI ID:  {}", profile.upi_id);
    println!();
    println!("   Payment link:");
    println!("   {}", wallet.receive_uri());

    Ok(())
}

pub fn cmd_send(
    wallet: &mut Wallet,
    to: &str,
    amount: f64,
    name: Option<&str>,
    note: Option<&str>,
) -> Result<()> {
    let mut request = PaymentRequest::new(to, amount);
    if let Some(name) = name {
        request = request.with_name(name);
    }
    if let Some(note) = note {
        request = request.with_note(note);
    }

    let tx = wallet
        .record_payment(request)
        .context("Payment failed")?
        .clone();

    println!();
    println!("✅ Payment Successful");
    println!("   ─────────────────────────────");
    println!("   Paid:      {}", format_inr(tx.amount));
    println!("   To:        {}", tx.display_payee());
    if let Some(ref upi) = tx.payee_upi {
        println!("   UPI ID:    {}", upi);
    }
    if let Some(ref note) = tx.note {
        println!("   Note:      {}", note);
    }
    println!("   Reference: {}", tx.id);
    println!();
    println!("   New balance: {}", format_inr(wallet.balance()));
    println!("   (Simulated payment, nothing was transferred)");

    Ok(())
}

/// One history row: date, signed amount, payee and category
pub fn format_history_line(tx: &Transaction) -> String {
    let amount = format_transaction_amount(tx);
    let amount = match tx.direction {
        Direction::Debit => format!("\x1b[31m{:>12}\x1b[0m", amount), // Red for debits
        Direction::Credit => format!("\x1b[32m{:>12}\x1b[0m", amount), // Green for credits
    };

    let status = match tx.status {
        TransactionStatus::Success => "",
        TransactionStatus::Failed => " [failed]",
        TransactionStatus::Processing => " [processing]",
    };

    format!(
        "{} │ {} │ {} ({}){}",
        tx.timestamp.format("%d %b %H:%M"),
        amount,
        truncate(tx.display_payee(), 28),
        tx.category,
        status
    )
}
