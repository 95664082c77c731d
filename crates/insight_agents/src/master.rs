//! Top-level router: answer directly or delegate once to the sub-agent.

use crate::api_types::{Message, Tool, ToolInputSchema};
use crate::llm::{CompletionParams, LlmClient};
use crate::prompts;
use crate::subagent::SubAgent;
use anyhow::Result;
use insight_core::{AgentResponse, FeedbackRequest};
use serde_json::json;
use std::sync::Arc;

/// The delegation handle — the only tool schema the router ever sees.
pub const DELEGATE_TOOL_NAME: &str = "delegate_feedback_analysis";

pub struct MasterAgent {
    client: Arc<dyn LlmClient>,
    sub: SubAgent,
    params: CompletionParams,
}

impl MasterAgent {
    pub fn new(client: Arc<dyn LlmClient>, sub: SubAgent, params: CompletionParams) -> Self {
        Self { client, sub, params }
    }

    /// Schema for the delegation handle. Takes no arguments: the original
    /// request is forwarded to the sub-agent verbatim, never paraphrased by
    /// the model.
    pub fn delegation_schema() -> Tool {
        Tool {
            name: DELEGATE_TOOL_NAME.to_string(),
            description: "Hand the request to the specialized feedback-analysis sub-agent. \
                          Use for any input containing instructions or product-related \
                          details. It can run sentiment analysis, topic categorization, \
                          keyword contextualization and summarization."
                .to_string(),
            input_schema: ToolInputSchema {
                schema_type: "object".to_string(),
                properties: json!({}),
                required: Vec::new(),
            },
        }
    }

    /// Run the router to completion. Never fails: any provider or dispatch
    /// error becomes an error-shaped response, which downstream caches and
    /// returns like any other result.
    pub async fn run(&self, request: &FeedbackRequest) -> AgentResponse {
        match self.route(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(
                    feedback_id = %request.feedback_id,
                    "master agent failed: {e:#}"
                );
                AgentResponse::Error {
                    message: e.to_string(),
                }
            }
        }
    }

    async fn route(&self, request: &FeedbackRequest) -> Result<AgentResponse> {
        tracing::info!(feedback_id = %request.feedback_id, "master agent route decision");

        let response = self
            .client
            .complete(
                prompts::MASTER_SYSTEM,
                vec![Message::user(prompts::master_prompt(request))],
                vec![Self::delegation_schema()],
                self.params.clone(),
            )
            .await?;

        let delegations = response
            .tool_invocations()
            .into_iter()
            .filter(|invocation| {
                if invocation.name == DELEGATE_TOOL_NAME {
                    true
                } else {
                    tracing::warn!(
                        feedback_id = %request.feedback_id,
                        tool = %invocation.name,
                        "router requested a tool other than the delegation handle; ignoring"
                    );
                    false
                }
            })
            .count();

        if delegations == 0 {
            return Ok(AgentResponse::Direct {
                text: response.text(),
            });
        }

        // At-most-once delegation, enforced structurally: one request or
        // several, the sub-agent runs exactly once.
        if delegations > 1 {
            tracing::warn!(
                feedback_id = %request.feedback_id,
                extra = delegations - 1,
                "ignoring extra delegation requests in one turn"
            );
        }

        self.sub.run(request).await
    }
}
