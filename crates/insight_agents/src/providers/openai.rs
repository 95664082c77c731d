//! OpenAI-compatible chat-completions client.
//!
//! Works against any endpoint that speaks the /chat/completions protocol
//! (OpenAI, Azure-style proxies, local gateways) via `base_url`.

use crate::api_types::{ContentBlock, Message, MessagesResponse, Role, Tool};
use crate::llm::{CompletionParams, LlmClient};
use anyhow::{bail, Context, Result};
use reqwest::Client;
use serde_json::{json, Value};
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(model: &str, base_url: Option<&str>) -> Result<Self> {
        let api_key = env::var("OPENAI_API_KEY").unwrap_or_else(|_| "mock".to_string());
        let base_url = base_url
            .map(str::to_string)
            .or_else(|| env::var("OPENAI_BASE_URL").ok())
            .unwrap_or_else(|| "https://api.openai.com/v1".to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(60))
                .build()?,
            api_key,
            base_url,
            model: model.to_string(),
        })
    }
}

#[async_trait::async_trait]
impl LlmClient for OpenAiClient {
    async fn complete(
        &self,
        system: &str,
        messages: Vec<Message>,
        tools: Vec<Tool>,
        params: CompletionParams,
    ) -> Result<MessagesResponse> {
        if self.api_key == "mock" {
            // No key configured: behave like the mock provider so local runs
            // don't hit the network.
            return Ok(MessagesResponse {
                content: vec![ContentBlock::Text {
                    text: "(Mock OpenAI Response) I received your prompt.".to_string(),
                }],
                stop_reason: Some("stop".to_string()),
            });
        }

        let openai_tools: Vec<Value> = tools
            .iter()
            .map(|t| {
                json!({
                    "type": "function",
                    "function": {
                        "name": t.name,
                        "description": t.description,
                        "parameters": t.input_schema
                    }
                })
            })
            .collect();

        let mut openai_messages = vec![json!({
            "role": "system",
            "content": system
        })];
        for msg in &messages {
            let role = match msg.role {
                Role::User => "user",
                Role::Assistant => "assistant",
            };
            let text = msg
                .content
                .iter()
                .filter_map(|block| match block {
                    ContentBlock::Text { text } => Some(text.as_str()),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join("\n");
            openai_messages.push(json!({ "role": role, "content": text }));
        }

        let mut body = json!({
            "model": self.model,
            "messages": openai_messages,
            "max_tokens": params.max_tokens,
            "temperature": params.temperature,
        });
        if !openai_tools.is_empty() {
            body["tools"] = Value::Array(openai_tools);
        }

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("Completion request failed")?;

        let status = response.status();
        let payload: Value = response
            .json()
            .await
            .context("Completion response was not JSON")?;
        if !status.is_success() {
            bail!("Completion provider returned {status}: {payload}");
        }

        let message = payload
            .pointer("/choices/0/message")
            .context("Malformed completion response: no choices[0].message")?;

        let mut content = Vec::new();
        if let Some(text) = message.get("content").and_then(Value::as_str) {
            if !text.is_empty() {
                content.push(ContentBlock::Text {
                    text: text.to_string(),
                });
            }
        }
        if let Some(calls) = message.get("tool_calls").and_then(Value::as_array) {
            for call in calls {
                let id = call
                    .get("id")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                let name = call
                    .pointer("/function/name")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                let arguments = call
                    .pointer("/function/arguments")
                    .and_then(Value::as_str)
                    .unwrap_or("{}");
                let input = serde_json::from_str(arguments).unwrap_or_else(|_| json!({}));
                content.push(ContentBlock::ToolUse { id, name, input });
            }
        }

        let stop_reason = payload
            .pointer("/choices/0/finish_reason")
            .and_then(Value::as_str)
            .map(str::to_string);

        Ok(MessagesResponse {
            content,
            stop_reason,
        })
    }
}
