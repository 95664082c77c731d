pub mod mock;
pub mod openai;

pub use mock::MockProvider;
pub use openai::OpenAiClient;

use crate::llm::LlmClient;
use anyhow::{bail, Result};
use insight_core::config::LlmConfig;
use std::sync::Arc;

/// Build a completion client from config.
pub fn from_config(cfg: &LlmConfig) -> Result<Arc<dyn LlmClient>> {
    match cfg.provider.as_str() {
        "openai" => Ok(Arc::new(OpenAiClient::new(&cfg.model, cfg.base_url.as_deref())?)),
        "mock" => Ok(Arc::new(MockProvider::new(&cfg.model))),
        other => bail!("Unknown LLM provider: {other}"),
    }
}
