use crate::api_types::{Message, MessagesResponse, Tool};
use anyhow::Result;
use async_trait::async_trait;
use insight_core::config::LlmConfig;

/// Parameters for one completion call.
#[derive(Debug, Clone)]
pub struct CompletionParams {
    pub max_tokens: u32,
    /// Sampling temperature. Kept low — tool outputs must parse as JSON.
    pub temperature: f32,
}

impl CompletionParams {
    pub fn from_config(cfg: &LlmConfig) -> Self {
        Self {
            max_tokens: cfg.max_tokens,
            temperature: cfg.temperature,
        }
    }
}

impl Default for CompletionParams {
    fn default() -> Self {
        Self {
            max_tokens: 1024,
            temperature: 0.2,
        }
    }
}

/// Opaque completion provider: prompt + tool schemas in, text or requested
/// tool invocations out. Blocking, network-bound; no retry here by design.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(
        &self,
        system: &str,
        messages: Vec<Message>,
        tools: Vec<Tool>,
        params: CompletionParams,
    ) -> Result<MessagesResponse>;
}
