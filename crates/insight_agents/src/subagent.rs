//! Specialized sub-agent: tool selection and concurrent fan-out.
//!
//! One completion call with all four analysis-tool schemas attached decides
//! which tools run. Requested invocations are independent and execute
//! concurrently; results are reassembled in the order the model requested
//! them, so output order is deterministic.

use crate::api_types::Message;
use crate::llm::{CompletionParams, LlmClient};
use crate::prompts;
use crate::registry::ToolRegistry;
use anyhow::Result;
use futures_util::future;
use insight_core::{AgentResponse, AnalysisToolId, FeedbackRequest, ToolReport};
use serde_json::Value;
use std::sync::Arc;

pub struct SubAgent {
    client: Arc<dyn LlmClient>,
    registry: Arc<ToolRegistry>,
    params: CompletionParams,
}

impl SubAgent {
    pub fn new(
        client: Arc<dyn LlmClient>,
        registry: Arc<ToolRegistry>,
        params: CompletionParams,
    ) -> Self {
        Self {
            client,
            registry,
            params,
        }
    }

    /// Run the sub-agent to completion for one request.
    ///
    /// Returns `AgentResponse::Analysis` with one entry per requested tool,
    /// or `AgentResponse::Direct` when the model answers without tools.
    pub async fn run(&self, request: &FeedbackRequest) -> Result<AgentResponse> {
        tracing::info!(feedback_id = %request.feedback_id, "sub-agent tool selection");

        let response = self
            .client
            .complete(
                prompts::SUBAGENT_SYSTEM,
                vec![Message::user(prompts::subagent_prompt(request))],
                self.registry.schemas(),
                self.params.clone(),
            )
            .await?;

        let invocations = response.tool_invocations();
        if invocations.is_empty() {
            return Ok(AgentResponse::Direct {
                text: response.text(),
            });
        }

        // Resolve identifiers first. Unknown names are reported and skipped;
        // the remaining invocations still run.
        let mut selected: Vec<(AnalysisToolId, Value)> = Vec::with_capacity(invocations.len());
        for invocation in invocations {
            match invocation.name.parse::<AnalysisToolId>() {
                Ok(id) => selected.push((id, invocation.input)),
                Err(e) => {
                    tracing::warn!(feedback_id = %request.feedback_id, "skipping invocation: {e}")
                }
            }
        }

        tracing::info!(
            feedback_id = %request.feedback_id,
            tools = selected.len(),
            "dispatching tool fan-out"
        );

        // Invocations share no mutable state; join_all keeps request order.
        let outcomes = future::join_all(
            selected
                .iter()
                .map(|(id, input)| self.registry.dispatch(*id, input)),
        )
        .await;

        let results = selected
            .into_iter()
            .zip(outcomes)
            .map(|((tool, _), outcome)| ToolReport { tool, outcome })
            .collect();

        Ok(AgentResponse::Analysis { results })
    }
}
