//! AI backend command implementations

use anyhow::Result;
use paypulse_core::ai::AIBackend;
use paypulse_core::{AIClient, InsightRequester, Wallet};

use super::{load_ai_config, missing_backend_hint};

/// Show the resolved AI configuration and test the backend
pub async fn cmd_ai_test(wallet: &Wallet, backend: Option<&str>, sample: bool) -> Result<()> {
    println!("🔍 Testing AI backend...\n");

    let config = load_ai_config(backend)?;

    println!("  Backend: {}", config.backend);
    println!(
        "  Model:   {}",
        config.model.as_deref().unwrap_or("(backend default)")
    );
    println!(
        "  Host:    {}",
        config.host.as_deref().unwrap_or("(backend default)")
    );
    println!(
        "  API key: {}",
        if config.api_key.is_some() { "set" } else { "not set" }
    );
    println!("  Timeout: {}s\n", config.timeout.as_secs());

    let Some(client) = AIClient::from_config(&config) else {
        println!("❌ Not configured");
        println!("\n⚠️  {}", missing_backend_hint(&config));
        return Ok(());
    };

    print!("Checking {} at {}... ", client.model(), client.host());
    if client.health_check().await {
        println!("✅ Connected");
    } else {
        println!("❌ Failed");
        println!("\n⚠️  Could not reach the AI backend at {}", client.host());
        return Ok(());
    }

    if !sample {
        return Ok(());
    }

    println!(
        "\n📋 Running a sample analysis on {} transactions...\n",
        wallet.transactions().len()
    );

    let requester = InsightRequester::new(client)?;
    match requester.request_insights(wallet.transactions()).await {
        Ok(result) => {
            println!("  Top category: {}", result.top_category);
            println!("  Trend:        {}", result.spending_trend);
            println!("  Summary:      {}", result.spending_summary);
        }
        Err(e) => {
            println!("  ❌ {}", e);
        }
    }

    Ok(())
}
