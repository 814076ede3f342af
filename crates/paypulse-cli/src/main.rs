//! PayPulse CLI - UPI wallet with AI spending insights
//!
//! Usage:
//!   paypulse dashboard                      Balance and recent activity
//!   paypulse history --filter debit         Transaction history
//!   paypulse send --to bob@upi --amount 50  Simulated payment
//!   paypulse insights                       AI spending analysis

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let mut wallet = commands::load_wallet(cli.transactions.as_deref())?;

    match cli.command {
        Commands::Dashboard => commands::cmd_dashboard(&wallet),
        Commands::History {
            filter,
            search,
            limit,
        } => commands::cmd_history(&wallet, &filter, search.as_deref(), limit),
        Commands::Receive => commands::cmd_receive(&wallet),
        Commands::Send {
            to,
            amount,
            name,
            note,
        } => commands::cmd_send(&mut wallet, &to, amount, name.as_deref(), note.as_deref()),
        Commands::Insights {
            backend,
            model,
            json,
        } => commands::cmd_insights(&wallet, backend.as_deref(), model.as_deref(), json).await,
        Commands::Ai { action } => match action {
            AiAction::Test { backend, sample } => {
                commands::cmd_ai_test(&wallet, backend.as_deref(), sample).await
            }
        },
        Commands::Prompts { action } => match action {
            None | Some(PromptsAction::List) => commands::cmd_prompts_list(),
            Some(PromptsAction::Show { id }) => commands::cmd_prompts_show(&id),
            Some(PromptsAction::Path) => commands::cmd_prompts_path(),
        },
    }
}
