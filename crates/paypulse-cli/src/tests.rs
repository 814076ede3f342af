//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::io::Write;

use chrono::{TimeZone, Utc};
use clap::Parser;
use paypulse_core::ai::CANNED_INSIGHT;
use paypulse_core::insights::{AnalysisError, FAILURE_MESSAGE};
use paypulse_core::{Direction, InsightResult, SessionState, Transaction, TransactionStatus, Wallet};

use crate::cli::{AiAction, Cli, Commands, PromptsAction};
use crate::commands::{self, truncate};

fn sample_tx(direction: Direction, amount: f64, payee: &str) -> Transaction {
    Transaction {
        id: "tx_test".to_string(),
        direction,
        amount,
        timestamp: Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 0).unwrap(),
        payee_name: Some(payee.to_string()),
        payee_upi: None,
        category: "Food & Drink".to_string(),
        status: TransactionStatus::Success,
        note: None,
    }
}

// ========== Argument Parsing Tests ==========

#[test]
fn test_parse_send() {
    let cli = Cli::try_parse_from([
        "paypulse", "send", "--to", "bob@upi", "--amount", "250.5", "--note", "Lunch",
    ])
    .unwrap();

    match cli.command {
        Commands::Send {
            to,
            amount,
            name,
            note,
        } => {
            assert_eq!(to, "bob@upi");
            assert_eq!(amount, 250.5);
            assert!(name.is_none());
            assert_eq!(note.as_deref(), Some("Lunch"));
        }
        _ => panic!("expected send"),
    }
}

#[test]
fn test_parse_send_requires_amount() {
    assert!(Cli::try_parse_from(["paypulse", "send", "--to", "bob@upi"]).is_err());
}

#[test]
fn test_parse_history_defaults() {
    let cli = Cli::try_parse_from(["paypulse", "history"]).unwrap();
    match cli.command {
        Commands::History {
            filter,
            search,
            limit,
        } => {
            assert_eq!(filter, "all");
            assert!(search.is_none());
            assert_eq!(limit, 20);
        }
        _ => panic!("expected history"),
    }
}

#[test]
fn test_parse_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "paypulse",
        "insights",
        "--backend",
        "mock",
        "--json",
        "--transactions",
        "txs.json",
        "-v",
    ])
    .unwrap();

    assert!(cli.verbose);
    assert_eq!(
        cli.transactions.as_deref(),
        Some(std::path::Path::new("txs.json"))
    );
    match cli.command {
        Commands::Insights {
            backend,
            model,
            json,
        } => {
            assert_eq!(backend.as_deref(), Some("mock"));
            assert!(model.is_none());
            assert!(json);
        }
        _ => panic!("expected insights"),
    }
}

#[test]
fn test_parse_subcommand_actions() {
    let cli = Cli::try_parse_from(["paypulse", "ai", "test", "--sample"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Ai {
            action: AiAction::Test { sample: true, .. }
        }
    ));

    let cli = Cli::try_parse_from(["paypulse", "prompts", "show", "spending_insights"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Prompts {
            action: Some(PromptsAction::Show { .. })
        }
    ));

    let cli = Cli::try_parse_from(["paypulse", "prompts"]).unwrap();
    assert!(matches!(cli.command, Commands::Prompts { action: None }));
}

// ========== Wallet Loading Tests ==========

#[test]
fn test_load_wallet_defaults_to_demo() {
    let wallet = commands::load_wallet(None).unwrap();
    assert_eq!(wallet.transactions().len(), 6);
    assert_eq!(wallet.profile().name, "Alex Doe");
}

#[test]
fn test_load_wallet_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"[{{"id":"t1","type":"debit","amount":99.5,"date":"2024-03-01T10:00:00Z","payeeName":"Cafe","category":"Food"}}]"#
    )
    .unwrap();

    let wallet = commands::load_wallet(Some(file.path())).unwrap();
    assert_eq!(wallet.transactions().len(), 1);
    assert_eq!(wallet.transactions()[0].amount, 99.5);
    assert_eq!(wallet.balance(), 12500.75);
}

#[test]
fn test_load_wallet_invalid_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"[{{"id":"t1","type":"refund"}}]"#).unwrap();

    let err = commands::load_wallet(Some(file.path())).unwrap_err();
    assert!(err.to_string().contains("Invalid transactions file"));

    let missing = commands::load_wallet(Some(std::path::Path::new("/nonexistent/txs.json")));
    assert!(missing.is_err());
}

// ========== Wallet Command Tests ==========

#[test]
fn test_cmd_dashboard() {
    let wallet = Wallet::demo();
    assert!(commands::cmd_dashboard(&wallet).is_ok());
}

#[test]
fn test_cmd_history_filters() {
    let wallet = Wallet::demo();
    assert!(commands::cmd_history(&wallet, "debit", None, 10).is_ok());
    assert!(commands::cmd_history(&wallet, "all", Some("netflix"), 10).is_ok());
    assert!(commands::cmd_history(&wallet, "all", Some("no such payee"), 10).is_ok());
}

#[test]
fn test_cmd_history_unknown_filter() {
    let wallet = Wallet::demo();
    let result = commands::cmd_history(&wallet, "refunds", None, 10);
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("Unknown filter"));
}

#[test]
fn test_cmd_receive() {
    assert!(commands::cmd_receive(&Wallet::demo()).is_ok());
}

#[test]
fn test_cmd_send() {
    let mut wallet = Wallet::demo();
    let result = commands::cmd_send(&mut wallet, "bob@upi", 500.0, Some("Bob"), None);
    assert!(result.is_ok());
    assert_eq!(wallet.balance(), 12000.75);
    assert_eq!(wallet.transactions().len(), 7);
}

#[test]
fn test_cmd_send_rejected() {
    let mut wallet = Wallet::demo();

    let err = commands::cmd_send(&mut wallet, "bob", 10.0, None, None).unwrap_err();
    assert!(format!("{:#}", err).contains("UPI ID"));

    let err = commands::cmd_send(&mut wallet, "bob@upi", 1_000_000.0, None, None).unwrap_err();
    assert!(format!("{:#}", err).contains("Insufficient balance"));

    assert_eq!(wallet.balance(), 12500.75);
    assert_eq!(wallet.transactions().len(), 6);
}

// ========== Insights Tests ==========

#[tokio::test]
async fn test_cmd_insights_with_mock_backend() {
    let wallet = Wallet::demo();
    let result = commands::cmd_insights(&wallet, Some("mock"), None, false).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_cmd_insights_unknown_backend() {
    let wallet = Wallet::demo();
    let result = commands::cmd_insights(&wallet, Some("skynet"), None, false).await;
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("Unknown AI backend"));
}

#[test]
fn test_render_panel_ready() {
    let result: InsightResult = serde_json::from_str(CANNED_INSIGHT).unwrap();
    let panel = commands::render_panel(&SessionState::Ready(result.clone()));

    assert!(panel.contains(&result.spending_summary));
    assert!(panel.contains("Top category:  Groceries"));
    assert!(panel.contains("stable"));
    assert!(panel.contains(&result.actionable_tip));
}

#[test]
fn test_render_panel_failed_shows_generic_message() {
    let state = SessionState::Failed(
        AnalysisError::malformed("Invalid spending insights JSON from AI: trailing garbage").into(),
    );
    let panel = commands::render_panel(&state);

    assert!(panel.contains(FAILURE_MESSAGE));
    assert!(!panel.contains("trailing garbage"));
}

#[test]
fn test_render_panel_idle_and_loading() {
    assert!(commands::render_panel(&SessionState::Idle).contains("Analyze"));
    assert!(commands::render_panel(&SessionState::Loading).contains("Analyzing"));
}

// ========== Formatting Tests ==========

#[test]
fn test_format_history_line() {
    let debit = commands::format_history_line(&sample_tx(Direction::Debit, 450.0, "Starbucks"));
    assert!(debit.contains("05 Mar 14:30"));
    assert!(debit.contains("-₹450.00"));
    assert!(debit.contains("Starbucks (Food & Drink)"));
    assert!(debit.contains("\x1b[31m"));

    let mut credit = sample_tx(Direction::Credit, 2500.0, "Jane Smith");
    credit.status = TransactionStatus::Processing;
    let line = commands::format_history_line(&credit);
    assert!(line.contains("+₹2,500.00"));
    assert!(line.contains("\x1b[32m"));
    assert!(line.ends_with("[processing]"));
}

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("a very long payee name", 10), "a very ...");
    assert_eq!(truncate("₹₹₹₹₹₹", 5), "₹₹...");
}
