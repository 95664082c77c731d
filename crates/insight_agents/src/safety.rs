//! Pre-flight content-safety gate.
//!
//! Wraps the opaque classifier behind a never-throws adapter: the outcome is
//! allowed, blocked, or unavailable — a classifier failure is an explicit
//! third state, distinct from both verdicts. What unavailable means for the
//! request (fail open or closed) is the orchestrator's call, per config.

use async_trait::async_trait;
use insight_core::{FeedbackRequest, GuardrailVerdict, SafetyClassifier};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub enum GateDecision {
    Allowed(GuardrailVerdict),
    Blocked(GuardrailVerdict),
    /// The classifier itself failed; no verdict exists.
    Unavailable(String),
}

pub struct SafetyGate {
    classifier: Arc<dyn SafetyClassifier>,
}

impl SafetyGate {
    pub fn new(classifier: Arc<dyn SafetyClassifier>) -> Self {
        Self { classifier }
    }

    /// Classify the full serialized request. No side effects beyond the
    /// outbound classification call.
    pub async fn check(&self, request: &FeedbackRequest) -> GateDecision {
        let serialized = match serde_json::to_string(request) {
            Ok(s) => s,
            Err(e) => return GateDecision::Unavailable(format!("request serialization: {e}")),
        };

        match self.classifier.classify(&serialized).await {
            Ok(verdict) if verdict.blocked => {
                tracing::info!(
                    feedback_id = %request.feedback_id,
                    violations = verdict.violations.len(),
                    "request blocked by safety gate"
                );
                GateDecision::Blocked(verdict)
            }
            Ok(verdict) => GateDecision::Allowed(verdict),
            Err(e) => {
                tracing::error!(
                    feedback_id = %request.feedback_id,
                    "safety classifier failed: {e:#}"
                );
                GateDecision::Unavailable(e.to_string())
            }
        }
    }
}

/// Stand-in classifier for local runs where no external guardrail provider is
/// wired. Allows everything.
#[derive(Debug, Default)]
pub struct AllowAllClassifier;

#[async_trait]
impl SafetyClassifier for AllowAllClassifier {
    async fn classify(&self, _text: &str) -> anyhow::Result<GuardrailVerdict> {
        Ok(GuardrailVerdict::allowed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;
    use insight_core::PolicyViolation;

    struct FailingClassifier;

    #[async_trait]
    impl SafetyClassifier for FailingClassifier {
        async fn classify(&self, _text: &str) -> anyhow::Result<GuardrailVerdict> {
            bail!("guardrail endpoint unreachable")
        }
    }

    struct BlockingClassifier;

    #[async_trait]
    impl SafetyClassifier for BlockingClassifier {
        async fn classify(&self, _text: &str) -> anyhow::Result<GuardrailVerdict> {
            Ok(GuardrailVerdict {
                blocked: true,
                violations: vec![PolicyViolation {
                    category: "HATE".to_string(),
                    confidence: "HIGH".to_string(),
                    severity: "HIGH".to_string(),
                    action: "BLOCKED".to_string(),
                }],
                usage: None,
            })
        }
    }

    fn request() -> FeedbackRequest {
        FeedbackRequest {
            feedback_id: "fb-1".into(),
            customer_name: "Ada".into(),
            feedback_text: "hello".into(),
            timestamp: "2026-08-27T00:00:00Z".into(),
            instructions: String::new(),
        }
    }

    #[tokio::test]
    async fn classifier_failure_is_unavailable_not_blocked() {
        let gate = SafetyGate::new(Arc::new(FailingClassifier));
        match gate.check(&request()).await {
            GateDecision::Unavailable(reason) => assert!(reason.contains("unreachable")),
            other => panic!("unexpected decision: {other:?}"),
        }
    }

    #[tokio::test]
    async fn blocked_verdict_carries_violations() {
        let gate = SafetyGate::new(Arc::new(BlockingClassifier));
        match gate.check(&request()).await {
            GateDecision::Blocked(verdict) => {
                assert_eq!(verdict.violations.len(), 1);
                assert_eq!(verdict.violations[0].category, "HATE");
            }
            other => panic!("unexpected decision: {other:?}"),
        }
    }

    #[tokio::test]
    async fn allow_all_allows() {
        let gate = SafetyGate::new(Arc::new(AllowAllClassifier));
        assert!(matches!(
            gate.check(&request()).await,
            GateDecision::Allowed(_)
        ));
    }
}
