//! Insight Requester
//!
//! Turns a transaction history into a prompt, makes one structured-generation
//! call and validates the reply into an `InsightResult`.

use std::collections::HashMap;

use tracing::debug;

use crate::ai::parsing::parse_structured;
use crate::ai::{AIBackend, AIClient, ResponseSchema};
use crate::error::Result;
use crate::models::Transaction;
use crate::prompts::{Prompt, PromptId, PromptLibrary};

use super::types::{AnalysisError, InsightRequest, InsightResult};

/// Builds insight prompts and calls the AI backend
///
/// The prompt template is resolved once at construction, so a request can
/// only fail on the remote call or on the reply.
#[derive(Clone)]
pub struct InsightRequester {
    client: AIClient,
    prompt: Prompt,
    schema: ResponseSchema,
}

impl InsightRequester {
    /// Create a requester using the default prompt library
    pub fn new(client: AIClient) -> Result<Self> {
        Self::with_prompts(client, &mut PromptLibrary::new())
    }

    /// Create a requester resolving its prompt from `prompts`
    pub fn with_prompts(client: AIClient, prompts: &mut PromptLibrary) -> Result<Self> {
        let prompt = prompts.get(PromptId::SpendingInsights)?.clone();
        Ok(Self {
            client,
            prompt,
            schema: InsightResult::schema(),
        })
    }

    pub fn client(&self) -> &AIClient {
        &self.client
    }

    pub fn schema(&self) -> &ResponseSchema {
        &self.schema
    }

    /// Render the prompt for `transactions`
    ///
    /// Deterministic for a given history: the projection is embedded as
    /// compact JSON in input order, followed by the declared output shape.
    pub fn build_prompt(&self, transactions: &[Transaction]) -> Result<String> {
        let request = InsightRequest::from_transactions(transactions);
        let payload = serde_json::to_string(&request)?;
        let shape = self.schema.describe();

        let mut vars = HashMap::new();
        vars.insert("transactions", payload.as_str());
        vars.insert("output_shape", shape.as_str());

        Ok(self.prompt.render(&vars))
    }

    /// Request insights for `transactions`
    ///
    /// Makes exactly one outbound call. Transport problems become
    /// `TransportFailure`; unparseable or off-contract replies become
    /// `MalformedResponse`. Nothing is retried or cached.
    pub async fn request_insights(
        &self,
        transactions: &[Transaction],
    ) -> std::result::Result<InsightResult, AnalysisError> {
        let prompt = self.build_prompt(transactions)?;
        debug!(
            transactions = transactions.len(),
            prompt_chars = prompt.len(),
            model = self.client.model(),
            "Requesting spending insights"
        );

        let text = self
            .client
            .generate_structured(&prompt, &self.schema)
            .await?;

        Ok(parse_structured::<InsightResult>(&text, "spending insights")?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{GeminiBackend, MockBackend};
    use crate::insights::AnalysisErrorKind;
    use crate::insights::SpendingTrend;
    use crate::models::{Direction, TransactionStatus};
    use chrono::{TimeZone, Utc};

    fn requester(mock: &MockBackend) -> InsightRequester {
        InsightRequester::with_prompts(mock.clone().into(), &mut PromptLibrary::embedded_only())
            .unwrap()
    }

    fn sample_transactions() -> Vec<Transaction> {
        vec![
            Transaction {
                id: "tx_secret_1".to_string(),
                direction: Direction::Debit,
                amount: 450.0,
                timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
                payee_name: Some("Starbucks Coffee".to_string()),
                payee_upi: Some("starbucks@upi".to_string()),
                category: "Food & Drink".to_string(),
                status: TransactionStatus::Processing,
                note: Some("Morning coffee".to_string()),
            },
            Transaction {
                id: "tx_secret_2".to_string(),
                direction: Direction::Credit,
                amount: 2500.0,
                timestamp: Utc.with_ymd_and_hms(2024, 2, 29, 20, 0, 0).unwrap(),
                payee_name: Some("Jane Smith".to_string()),
                payee_upi: None,
                category: "Transfer".to_string(),
                status: TransactionStatus::Success,
                note: None,
            },
        ]
    }

    const VALID: &str = r#"{"spendingSummary":"Mostly coffee.","topCategory":"Food & Drink","actionableTip":"Brew at home.","spendingTrend":"increasing"}"#;

    #[test]
    fn test_build_prompt_embeds_projection_and_shape() {
        let mock = MockBackend::new();
        let requester = requester(&mock);
        let txs = sample_transactions();

        let prompt = requester.build_prompt(&txs).unwrap();
        let payload = serde_json::to_string(&InsightRequest::from_transactions(&txs)).unwrap();

        assert!(prompt.contains("financial advisor"));
        assert!(prompt.contains(&payload));
        for field in ["spendingSummary", "topCategory", "actionableTip", "spendingTrend"] {
            assert!(prompt.contains(field), "prompt missing {}", field);
        }
        assert!(prompt.contains(r#""increasing" | "decreasing" | "stable""#));

        assert!(!prompt.contains("tx_secret_1"));
        assert!(!prompt.contains("starbucks@upi"));
        assert!(!prompt.contains("processing"));
    }

    #[test]
    fn test_build_prompt_is_deterministic() {
        let mock = MockBackend::new();
        let requester = requester(&mock);
        let txs = sample_transactions();
        assert_eq!(
            requester.build_prompt(&txs).unwrap(),
            requester.build_prompt(&txs).unwrap()
        );
    }

    #[test]
    fn test_build_prompt_ignores_placeholders_in_notes() {
        let mock = MockBackend::new();
        let requester = requester(&mock);
        let mut txs = sample_transactions();
        txs[0].note = Some("{{output_shape}}".to_string());

        let prompt = requester.build_prompt(&txs).unwrap();
        assert_eq!(prompt.matches(r#""spendingSummary": "string""#).count(), 1);
    }

    #[tokio::test]
    async fn test_request_insights_success_unchanged() {
        let mock = MockBackend::with_text(VALID);
        let result = requester(&mock)
            .request_insights(&sample_transactions())
            .await
            .unwrap();

        assert_eq!(result.spending_summary, "Mostly coffee.");
        assert_eq!(result.top_category, "Food & Drink");
        assert_eq!(result.actionable_tip, "Brew at home.");
        assert_eq!(result.spending_trend, SpendingTrend::Increasing);
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn test_request_insights_empty_history_still_calls() {
        let mock = MockBackend::with_text(
            r#"{"spendingSummary":"No transactions yet.","topCategory":"N/A","actionableTip":"Start tracking your spending.","spendingTrend":"stable"}"#,
        );
        let result = requester(&mock).request_insights(&[]).await.unwrap();

        assert_eq!(result.spending_trend, SpendingTrend::Stable);
        assert_eq!(mock.calls(), 1);
        assert!(mock.prompts()[0].contains("Transactions:\n[]"));
    }

    #[tokio::test]
    async fn test_non_json_is_malformed() {
        let mock = MockBackend::with_text("I'm sorry, I can't help with that.");
        let err = requester(&mock)
            .request_insights(&sample_transactions())
            .await
            .unwrap_err();
        assert_eq!(err.kind, AnalysisErrorKind::MalformedResponse);
    }

    #[tokio::test]
    async fn test_missing_trend_is_malformed() {
        let mock = MockBackend::with_text(
            r#"{"spendingSummary":"s","topCategory":"c","actionableTip":"t"}"#,
        );
        let err = requester(&mock)
            .request_insights(&sample_transactions())
            .await
            .unwrap_err();
        assert!(err.is_malformed());
        assert!(err.message.contains("spendingTrend"));
    }

    #[tokio::test]
    async fn test_unknown_trend_is_malformed() {
        let mock = MockBackend::with_text(
            r#"{"spendingSummary":"s","topCategory":"c","actionableTip":"t","spendingTrend":"skyrocketing"}"#,
        );
        let err = requester(&mock)
            .request_insights(&sample_transactions())
            .await
            .unwrap_err();
        assert!(err.is_malformed());
    }

    #[tokio::test]
    async fn test_empty_reply_is_malformed() {
        let mock = MockBackend::with_text("");
        let err = requester(&mock).request_insights(&[]).await.unwrap_err();
        assert!(err.is_malformed());
    }

    #[tokio::test]
    async fn test_service_error_is_transport_failure() {
        let mock = MockBackend::failing(429, "quota exceeded");
        let err = requester(&mock)
            .request_insights(&sample_transactions())
            .await
            .unwrap_err();
        assert_eq!(err.kind, AnalysisErrorKind::TransportFailure);
        assert!(err.message.contains("quota exceeded"));
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_failure() {
        let client = AIClient::Gemini(GeminiBackend::new("http://127.0.0.1:1", "gemini-test", "key"));
        let requester =
            InsightRequester::with_prompts(client, &mut PromptLibrary::embedded_only()).unwrap();

        let err = requester
            .request_insights(&sample_transactions())
            .await
            .unwrap_err();
        assert!(err.is_transport());
        assert_eq!(err.kind, AnalysisErrorKind::TransportFailure);
    }
}
