//! Request orchestration: fingerprint → cache lookup → safety gate → master
//! agent → cache write. The externally visible entry point of the pipeline.

use crate::cache::ResultCache;
use crate::llm::{CompletionParams, LlmClient};
use crate::master::MasterAgent;
use crate::registry::ToolRegistry;
use crate::safety::{GateDecision, SafetyGate};
use crate::subagent::SubAgent;
use chrono::{DateTime, Utc};
use futures_util::future;
use insight_core::config::ClassifierErrorPolicy;
use insight_core::{
    AgentResponse, CacheStore, FeedbackRequest, GuardrailVerdict, InsightConfig, PolicyViolation,
    SafetyClassifier,
};
use serde::Serialize;
use std::sync::Arc;

/// What the transport layer gets back for one request. Always a well-formed
/// JSON-shaped object, never an unhandled fault.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Reply {
    /// Cache hit: the stored payload with its original write timestamp.
    CacheHit {
        cache_key: String,
        feedback_id: String,
        cached_result: AgentResponse,
        last_updated: DateTime<Utc>,
    },
    /// Blocked by the safety gate; the agent pipeline never ran.
    Blocked(GuardrailVerdict),
    /// Fresh result. `last_updated` is absent when the cache write failed.
    Fresh {
        #[serde(flatten)]
        request: FeedbackRequest,
        agent_response: AgentResponse,
        #[serde(skip_serializing_if = "Option::is_none")]
        last_updated: Option<DateTime<Utc>>,
    },
}

pub struct Orchestrator {
    master: MasterAgent,
    gate: SafetyGate,
    cache: ResultCache,
    on_classifier_error: ClassifierErrorPolicy,
}

impl Orchestrator {
    /// Wire the full pipeline from its three external collaborators.
    pub fn new(
        client: Arc<dyn LlmClient>,
        classifier: Arc<dyn SafetyClassifier>,
        store: Arc<dyn CacheStore>,
        config: &InsightConfig,
    ) -> Self {
        let params = CompletionParams::from_config(&config.llm);
        let registry = Arc::new(ToolRegistry::new(client.clone(), params.clone()));
        let sub = SubAgent::new(client.clone(), registry, params.clone());
        Self {
            master: MasterAgent::new(client, sub, params),
            gate: SafetyGate::new(classifier),
            cache: ResultCache::new(store, config.cache.ttl()),
            on_classifier_error: config.safety.on_classifier_error,
        }
    }

    /// Process one request to completion.
    pub async fn handle(&self, request: FeedbackRequest) -> Reply {
        let fingerprint = request.fingerprint();
        tracing::info!(
            feedback_id = %request.feedback_id,
            cache_key = %fingerprint,
            "handling feedback request"
        );

        // A hit short-circuits everything: no safety check, no model call.
        if let Some(entry) = self.cache.get(&request.feedback_id, &fingerprint).await {
            tracing::info!(feedback_id = %request.feedback_id, "cache hit");
            return Reply::CacheHit {
                cache_key: fingerprint.to_string(),
                feedback_id: request.feedback_id,
                cached_result: entry.payload,
                last_updated: entry.last_updated,
            };
        }

        match self.gate.check(&request).await {
            GateDecision::Allowed(_) => {}
            GateDecision::Blocked(verdict) => return Reply::Blocked(verdict),
            GateDecision::Unavailable(reason) => match self.on_classifier_error {
                ClassifierErrorPolicy::Closed => {
                    tracing::warn!(
                        feedback_id = %request.feedback_id,
                        "safety check unavailable, failing closed"
                    );
                    return Reply::Blocked(unavailable_verdict(&reason));
                }
                ClassifierErrorPolicy::Open => {
                    tracing::warn!(
                        feedback_id = %request.feedback_id,
                        "safety check unavailable, failing open: {reason}"
                    );
                }
            },
        }

        let agent_response = self.master.run(&request).await;

        // Write only after the full aggregate is assembled; error-shaped
        // responses are cached as-is.
        let last_updated = self
            .cache
            .put(&request.feedback_id, &fingerprint, &agent_response)
            .await;

        Reply::Fresh {
            request,
            agent_response,
            last_updated,
        }
    }

    /// Independent per-item fan-out; no shared transaction.
    pub async fn handle_batch(&self, requests: Vec<FeedbackRequest>) -> Vec<Reply> {
        future::join_all(requests.into_iter().map(|request| self.handle(request))).await
    }
}

/// Blocked-shaped verdict for a failed-closed safety check. The category is
/// distinct from any real policy violation so callers can tell them apart.
fn unavailable_verdict(reason: &str) -> GuardrailVerdict {
    GuardrailVerdict {
        blocked: true,
        violations: vec![PolicyViolation {
            category: "safety_check_unavailable".to_string(),
            confidence: "NONE".to_string(),
            severity: "NONE".to_string(),
            action: reason.to_string(),
        }],
        usage: None,
    }
}
