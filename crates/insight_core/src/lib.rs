pub mod config;
pub mod error;
pub mod fingerprint;

pub use config::InsightConfig;
pub use error::InsightError;
pub use fingerprint::Fingerprint;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// A validated customer-feedback request, created at the system boundary.
/// Read-only inside the agent pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRequest {
    pub feedback_id: String,
    pub customer_name: String,
    pub feedback_text: String,
    pub timestamp: String,
    #[serde(default)]
    pub instructions: String,
}

impl FeedbackRequest {
    /// Content fingerprint over (feedback_text, instructions) — the cache key.
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::of(&self.feedback_text, &self.instructions)
    }
}

// ============================================================================
// Analysis tools — closed identifier set and typed outputs
// ============================================================================

/// The closed set of analysis tools the sub-agent can dispatch to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisToolId {
    #[serde(rename = "sentiment_analysis")]
    Sentiment,
    #[serde(rename = "topic_categorization")]
    Topic,
    #[serde(rename = "keyword_contextualization")]
    Keyword,
    #[serde(rename = "summarization")]
    Summary,
}

impl AnalysisToolId {
    pub const ALL: [AnalysisToolId; 4] = [
        AnalysisToolId::Sentiment,
        AnalysisToolId::Topic,
        AnalysisToolId::Keyword,
        AnalysisToolId::Summary,
    ];

    /// Name shown to the completion provider in tool schemas.
    pub fn wire_name(&self) -> &'static str {
        match self {
            AnalysisToolId::Sentiment => "sentiment_analysis",
            AnalysisToolId::Topic => "topic_categorization",
            AnalysisToolId::Keyword => "keyword_contextualization",
            AnalysisToolId::Summary => "summarization",
        }
    }
}

impl FromStr for AnalysisToolId {
    type Err = InsightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sentiment_analysis" => Ok(AnalysisToolId::Sentiment),
            "topic_categorization" => Ok(AnalysisToolId::Topic),
            "keyword_contextualization" => Ok(AnalysisToolId::Keyword),
            "summarization" => Ok(AnalysisToolId::Summary),
            other => Err(InsightError::ToolNotFound(other.to_string())),
        }
    }
}

impl fmt::Display for AnalysisToolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Sentiment scores; the model is instructed to make them sum to 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentScores {
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TopicCategory {
    #[serde(rename = "Product Quality")]
    ProductQuality,
    Delivery,
    Support,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicAssessment {
    pub category: TopicCategory,
    pub score: f64,
}

/// Keyword → relevance score. Ordered map so cached payloads round-trip
/// byte-for-byte.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordReport {
    pub keywords: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryReport {
    pub summary: String,
    pub recommendations: Vec<String>,
}

/// Structured output of one analysis tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolOutput {
    Sentiment(SentimentScores),
    Topic(TopicAssessment),
    Keywords(KeywordReport),
    Summary(SummaryReport),
}

/// Result of one tool invocation: typed output or a contained error.
/// A failing tool never aborts its siblings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "result", rename_all = "snake_case")]
pub enum ToolOutcome {
    Ok(ToolOutput),
    Error(String),
}

impl ToolOutcome {
    pub fn is_error(&self) -> bool {
        matches!(self, ToolOutcome::Error(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolReport {
    pub tool: AnalysisToolId,
    #[serde(flatten)]
    pub outcome: ToolOutcome,
}

// ============================================================================
// Agent response — the unit that gets cached
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AgentResponse {
    /// Direct free-text answer from the master agent (greetings, small talk).
    Direct { text: String },
    /// Ordered tool reports from the sub-agent fan-out. Order matches the
    /// order the model requested the invocations in.
    Analysis { results: Vec<ToolReport> },
    /// Error-shaped response; cached and returned like any other result.
    Error { message: String },
}

// ============================================================================
// Safety verdict
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyViolation {
    pub category: String,
    pub confidence: String,
    pub severity: String,
    pub action: String,
}

/// Verdict from the content-safety classifier, produced once per request
/// before any model call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GuardrailVerdict {
    pub blocked: bool,
    #[serde(default)]
    pub violations: Vec<PolicyViolation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<serde_json::Value>,
}

impl GuardrailVerdict {
    pub fn allowed() -> Self {
        Self::default()
    }
}

// ============================================================================
// Cache entry
// ============================================================================

/// One cached agent response, keyed by (feedback_id, fingerprint).
/// At most one entry per key pair; writes are upserts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedEntry {
    pub payload: AgentResponse,
    pub last_updated: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

// ============================================================================
// External collaborator seams
// ============================================================================

/// Opaque content-safety classifier (e.g. a hosted guardrail service).
#[async_trait]
pub trait SafetyClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> anyhow::Result<GuardrailVerdict>;
}

/// Opaque durable key-value store with per-entry TTL. Upsert semantics are
/// the store's concern (last-writer-wins).
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, feedback_id: &str, cache_key: &str)
        -> anyhow::Result<Option<CachedEntry>>;

    async fn put(
        &self,
        feedback_id: &str,
        cache_key: &str,
        payload: &AgentResponse,
        ttl: Duration,
    ) -> anyhow::Result<DateTime<Utc>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_id_round_trips_through_wire_name() {
        for id in AnalysisToolId::ALL {
            assert_eq!(id.wire_name().parse::<AnalysisToolId>().unwrap(), id);
        }
    }

    #[test]
    fn unknown_tool_name_is_tool_not_found() {
        let err = "word_cloud".parse::<AnalysisToolId>().unwrap_err();
        assert!(matches!(err, InsightError::ToolNotFound(name) if name == "word_cloud"));
    }

    #[test]
    fn tool_report_serializes_with_flattened_outcome() {
        let report = ToolReport {
            tool: AnalysisToolId::Sentiment,
            outcome: ToolOutcome::Ok(ToolOutput::Sentiment(SentimentScores {
                positive: 0.7,
                negative: 0.1,
                neutral: 0.2,
            })),
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["tool"], "sentiment_analysis");
        assert_eq!(json["status"], "ok");
        assert_eq!(json["result"]["positive"], 0.7);

        let back: ToolReport = serde_json::from_value(json).unwrap();
        assert_eq!(back, report);
    }

    #[test]
    fn agent_response_round_trips() {
        let response = AgentResponse::Analysis {
            results: vec![
                ToolReport {
                    tool: AnalysisToolId::Topic,
                    outcome: ToolOutcome::Ok(ToolOutput::Topic(TopicAssessment {
                        category: TopicCategory::Delivery,
                        score: 0.92,
                    })),
                },
                ToolReport {
                    tool: AnalysisToolId::Keyword,
                    outcome: ToolOutcome::Error("unparseable model output".to_string()),
                },
            ],
        };
        let encoded = serde_json::to_string(&response).unwrap();
        let decoded: AgentResponse = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, response);
        // Byte-for-byte stable re-encoding (BTreeMap keeps key order fixed).
        assert_eq!(serde_json::to_string(&decoded).unwrap(), encoded);
    }

    #[test]
    fn topic_category_uses_display_names() {
        let json = serde_json::to_value(TopicCategory::ProductQuality).unwrap();
        assert_eq!(json, "Product Quality");
    }
}
