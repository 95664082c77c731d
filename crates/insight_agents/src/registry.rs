//! Static tool catalog: schema per tool id, dispatch by closed enum.
//!
//! Dispatch matches on [`AnalysisToolId`] rather than a string-keyed handler
//! map, so an unregistered identifier is unrepresentable past the parse
//! boundary; the parse failure itself is a contained, reported condition.

use crate::api_types::{Tool, ToolInputSchema};
use crate::llm::{CompletionParams, LlmClient};
use crate::tools;
use insight_core::{AnalysisToolId, ToolOutcome};
use serde_json::{json, Value};
use std::sync::Arc;

pub struct ToolRegistry {
    client: Arc<dyn LlmClient>,
    params: CompletionParams,
}

impl ToolRegistry {
    pub fn new(client: Arc<dyn LlmClient>, params: CompletionParams) -> Self {
        Self { client, params }
    }

    /// Schemas for all four analysis tools, for the sub-agent's selection call.
    pub fn schemas(&self) -> Vec<Tool> {
        AnalysisToolId::ALL.iter().map(|id| Self::describe(*id)).collect()
    }

    /// Static schema for one tool. Every tool takes a single `query` string.
    pub fn describe(id: AnalysisToolId) -> Tool {
        let description = match id {
            AnalysisToolId::Sentiment => {
                "Analyze the sentiment of the text: positive, negative and neutral scores."
            }
            AnalysisToolId::Topic => {
                "Categorize the text into one of: Product Quality, Delivery, Support."
            }
            AnalysisToolId::Keyword => {
                "Extract context-aware keywords from the text with relevance scores."
            }
            AnalysisToolId::Summary => {
                "Summarize the text and produce actionable recommendations."
            }
        };
        Tool {
            name: id.wire_name().to_string(),
            description: description.to_string(),
            input_schema: ToolInputSchema {
                schema_type: "object".to_string(),
                properties: json!({
                    "query": {
                        "type": "string",
                        "description": "The feedback text to analyze."
                    }
                }),
                required: vec!["query".to_string()],
            },
        }
    }

    /// Execute one tool invocation. Argument problems and tool failures are
    /// contained as error outcomes, never propagated.
    pub async fn dispatch(&self, id: AnalysisToolId, input: &Value) -> ToolOutcome {
        let query = match input.get("query").and_then(Value::as_str) {
            Some(q) => q,
            None => {
                tracing::warn!(tool = %id, "tool invocation missing 'query' argument");
                return ToolOutcome::Error("missing required 'query' argument".to_string());
            }
        };
        tools::run_tool(self.client.as_ref(), id, query, &self.params).await
    }
}
