//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// PayPulse - UPI wallet with AI spending insights
#[derive(Parser)]
#[command(name = "paypulse")]
#[command(about = "UPI wallet demo with AI spending insights", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Load transactions from a JSON file instead of the demo data
    #[arg(long, global = true)]
    pub transactions: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show balance and recent activity
    Dashboard,

    /// List transaction history
    History {
        /// Direction filter: all, debit, credit
        #[arg(short, long, default_value = "all")]
        filter: String,

        /// Search payee, category or amount
        #[arg(short, long)]
        search: Option<String>,

        /// Maximum number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Show UPI details for receiving money
    Receive,

    /// Send money to a UPI ID (simulated)
    Send {
        /// Payee UPI ID (name@bank)
        #[arg(long)]
        to: String,

        /// Amount in rupees
        #[arg(long)]
        amount: f64,

        /// Payee display name
        #[arg(long)]
        name: Option<String>,

        /// Note for the payment
        #[arg(long)]
        note: Option<String>,
    },

    /// Analyze spending with AI
    Insights {
        /// AI backend: gemini, ollama, mock (overrides config)
        #[arg(long)]
        backend: Option<String>,

        /// Model name (overrides config)
        #[arg(long)]
        model: Option<String>,

        /// Print the insight as JSON
        #[arg(long)]
        json: bool,
    },

    /// AI backend utilities
    Ai {
        #[command(subcommand)]
        action: AiAction,
    },

    /// Manage AI prompts (list, show, customize)
    Prompts {
        #[command(subcommand)]
        action: Option<PromptsAction>,
    },
}

#[derive(Subcommand)]
pub enum AiAction {
    /// Show the AI configuration and check the backend is reachable
    Test {
        /// AI backend: gemini, ollama, mock (overrides config)
        #[arg(long)]
        backend: Option<String>,

        /// Also run a sample analysis on the loaded transactions
        #[arg(long)]
        sample: bool,
    },
}

#[derive(Subcommand)]
pub enum PromptsAction {
    /// List all prompts and their override status
    List,

    /// Show the content of a specific prompt
    Show {
        /// Prompt ID (e.g., spending_insights)
        id: String,
    },

    /// Show the override directory path
    Path,
}
