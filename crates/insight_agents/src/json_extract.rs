//! Normalize and strictly parse JSON emitted by the completion provider.
//!
//! Models asked for "exactly one JSON object" still like to wrap it in a
//! markdown code fence. Stripping a known fence wrapper is the only
//! normalization performed; anything that still fails to parse is a provider
//! error, never silently let through.

use insight_core::InsightError;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static RE_FENCED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(?:json)?\s*\n?(.*?)```").unwrap());

/// Strip a surrounding markdown code fence if present. Normalization only —
/// no attempt to repair malformed JSON.
pub fn strip_fences(text: &str) -> String {
    let trimmed = text.trim();
    if let Some(caps) = RE_FENCED.captures(trimmed) {
        return caps.get(1).map_or("", |m| m.as_str()).trim().to_string();
    }
    trimmed.to_string()
}

/// Parse model output as a single JSON object.
pub fn parse_object(text: &str) -> Result<Value, InsightError> {
    let normalized = strip_fences(text);
    let value: Value = serde_json::from_str(&normalized)
        .map_err(|e| InsightError::Provider(format!("unparseable model output: {e}")))?;
    if !value.is_object() {
        return Err(InsightError::Provider(
            "model output is not a JSON object".to_string(),
        ));
    }
    Ok(value)
}
