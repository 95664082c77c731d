//! The four analysis tools.
//!
//! Each tool is a single-shot prompt-and-parse operation: fixed instruction
//! template embedding the query, one terminal completion with no tool schemas
//! attached, then a strict parse into the tool's typed output. Any failure is
//! contained as a `ToolOutcome::Error` so sibling tools in the same fan-out
//! are unaffected.

use crate::api_types::Message;
use crate::json_extract;
use crate::llm::{CompletionParams, LlmClient};
use crate::prompts;
use insight_core::{
    AnalysisToolId, InsightError, KeywordReport, SentimentScores, SummaryReport, ToolOutcome,
    ToolOutput, TopicAssessment,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

pub async fn run_tool(
    client: &dyn LlmClient,
    id: AnalysisToolId,
    query: &str,
    params: &CompletionParams,
) -> ToolOutcome {
    match execute(client, id, query, params).await {
        Ok(output) => ToolOutcome::Ok(output),
        Err(e) => {
            tracing::warn!(tool = %id, "analysis tool failed: {e}");
            ToolOutcome::Error(e.to_string())
        }
    }
}

async fn execute(
    client: &dyn LlmClient,
    id: AnalysisToolId,
    query: &str,
    params: &CompletionParams,
) -> Result<ToolOutput, InsightError> {
    let prompt = match id {
        AnalysisToolId::Sentiment => prompts::sentiment_prompt(query),
        AnalysisToolId::Topic => prompts::topic_prompt(query),
        AnalysisToolId::Keyword => prompts::keyword_prompt(query),
        AnalysisToolId::Summary => prompts::summary_prompt(query),
    };

    // Terminal call: no tool schemas attached, so the model cannot request
    // further tool invocations from inside a tool.
    let response = client
        .complete(
            prompts::TOOL_SYSTEM,
            vec![Message::user(prompt)],
            Vec::new(),
            params.clone(),
        )
        .await
        .map_err(|e| InsightError::Provider(e.to_string()))?;

    let value = json_extract::parse_object(&response.text())?;
    match id {
        AnalysisToolId::Sentiment => Ok(ToolOutput::Sentiment(parse::<SentimentScores>(value)?)),
        AnalysisToolId::Topic => Ok(ToolOutput::Topic(parse::<TopicAssessment>(value)?)),
        AnalysisToolId::Keyword => Ok(ToolOutput::Keywords(parse::<KeywordReport>(value)?)),
        AnalysisToolId::Summary => Ok(ToolOutput::Summary(parse::<SummaryReport>(value)?)),
    }
}

fn parse<T: DeserializeOwned>(value: Value) -> Result<T, InsightError> {
    serde_json::from_value(value)
        .map_err(|e| InsightError::Provider(format!("malformed tool output: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api_types::{ContentBlock, MessagesResponse, Tool};
    use anyhow::Result;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Always answers with the same text; records how many tool schemas were
    /// attached to the last call.
    struct CannedClient {
        reply: String,
        calls: AtomicUsize,
        tools_seen: AtomicUsize,
    }

    impl CannedClient {
        fn new(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                calls: AtomicUsize::new(0),
                tools_seen: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl LlmClient for CannedClient {
        async fn complete(
            &self,
            _system: &str,
            _messages: Vec<Message>,
            tools: Vec<Tool>,
            _params: CompletionParams,
        ) -> Result<MessagesResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.tools_seen.store(tools.len(), Ordering::SeqCst);
            Ok(MessagesResponse {
                content: vec![ContentBlock::Text {
                    text: self.reply.clone(),
                }],
                stop_reason: Some("end_turn".to_string()),
            })
        }
    }

    #[tokio::test]
    async fn sentiment_tool_parses_typed_scores() {
        let client = CannedClient::new(
            "```json\n{\"positive\": 0.7, \"negative\": 0.2, \"neutral\": 0.1}\n```",
        );
        let outcome = run_tool(
            &client,
            AnalysisToolId::Sentiment,
            "great product",
            &CompletionParams::default(),
        )
        .await;
        match outcome {
            ToolOutcome::Ok(ToolOutput::Sentiment(scores)) => {
                assert_eq!(scores.positive, 0.7);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        // Terminal call: no tool schemas attached.
        assert_eq!(client.tools_seen.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn topic_tool_rejects_unknown_category() {
        let client = CannedClient::new(r#"{"category": "Billing", "score": 0.8}"#);
        let outcome = run_tool(
            &client,
            AnalysisToolId::Topic,
            "charged twice",
            &CompletionParams::default(),
        )
        .await;
        assert!(outcome.is_error());
    }

    #[tokio::test]
    async fn garbled_output_is_a_contained_error() {
        let client = CannedClient::new("cannot comply");
        let outcome = run_tool(
            &client,
            AnalysisToolId::Summary,
            "box damaged",
            &CompletionParams::default(),
        )
        .await;
        match outcome {
            ToolOutcome::Error(message) => assert!(message.contains("unparseable")),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
