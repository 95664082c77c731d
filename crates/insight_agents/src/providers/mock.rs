//! Mock provider — deterministic responses for local runs without API keys.

use crate::api_types::{ContentBlock, Message, MessagesResponse, Tool};
use crate::llm::{CompletionParams, LlmClient};
use anyhow::Result;

#[derive(Debug, Clone)]
pub struct MockProvider {
    model: String,
}

impl MockProvider {
    pub fn new(model: &str) -> Self {
        Self {
            model: model.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl LlmClient for MockProvider {
    async fn complete(
        &self,
        _system: &str,
        _messages: Vec<Message>,
        _tools: Vec<Tool>,
        _params: CompletionParams,
    ) -> Result<MessagesResponse> {
        Ok(MessagesResponse {
            content: vec![ContentBlock::Text {
                text: format!("(Mock {} Response) I received your prompt.", self.model),
            }],
            stop_reason: Some("end_turn".to_string()),
        })
    }
}
