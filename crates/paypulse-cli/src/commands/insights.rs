//! AI spending insights command

use anyhow::{bail, Context, Result};
use paypulse_core::ai::AIBackend;
use paypulse_core::{
    AIClient, InsightRequester, InsightSession, SessionState, SpendingTrend, Wallet,
};

use super::{load_ai_config, missing_backend_hint};

/// Build an AI client from config and command-line overrides
pub fn build_client(backend: Option<&str>, model: Option<&str>) -> Result<AIClient> {
    let config = load_ai_config(backend)?;

    let Some(client) = AIClient::from_config(&config) else {
        bail!(
            "AI backend '{}' is not configured. {}",
            config.backend,
            missing_backend_hint(&config)
        );
    };

    Ok(match model {
        Some(model) => client.with_model(model),
        None => client,
    })
}

pub async fn cmd_insights(
    wallet: &Wallet,
    backend: Option<&str>,
    model: Option<&str>,
    json: bool,
) -> Result<()> {
    let client = build_client(backend, model)?;
    if !json {
        println!("✨ Analyzing your spending with {}...", client.model());
    }

    let requester = InsightRequester::new(client).context("Failed to load insights prompt")?;
    let session = InsightSession::new(requester);

    let state = session.trigger(wallet.transactions()).await;

    if json {
        if let SessionState::Ready(ref result) = state {
            println!("{}", serde_json::to_string_pretty(result)?);
        }
    } else {
        println!("{}", render_panel(&state));
    }

    match state {
        SessionState::Failed(failure) => {
            Err(anyhow::Error::new(failure.error).context(failure.message))
        }
        _ => Ok(()),
    }
}

/// Render the insights panel for a session state
pub fn render_panel(state: &SessionState) -> String {
    match state {
        SessionState::Idle => "  Tap 'Analyze' to get AI insights on your spending.".to_string(),
        SessionState::Loading => "  ⏳ Analyzing...".to_string(),
        SessionState::Ready(result) => {
            let lines = [
                String::new(),
                "╭─────────────────────────────────────────╮".to_string(),
                "│         ✨ AI Spending Insights         │".to_string(),
                "╰─────────────────────────────────────────╯".to_string(),
                String::new(),
                format!("  {}", result.spending_summary),
                String::new(),
                format!("  🏷️  Top category:  {}", result.top_category),
                format!(
                    "  {} Trend:         {}",
                    trend_icon(result.spending_trend),
                    result.spending_trend
                ),
                String::new(),
                format!("  💡 Tip: {}", result.actionable_tip),
                String::new(),
            ];
            lines.join("\n")
        }
        SessionState::Failed(failure) => format!("\n  ❌ {}\n", failure.message),
    }
}

fn trend_icon(trend: SpendingTrend) -> &'static str {
    match trend {
        SpendingTrend::Increasing => "📈",
        SpendingTrend::Decreasing => "📉",
        SpendingTrend::Stable => "➡️ ",
    }
}
