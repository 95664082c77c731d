//! Property-based tests for insight_core.
//!
//! Uses proptest to verify invariants that must hold for ALL possible inputs,
//! not just hand-picked examples.

use insight_core::{
    AgentResponse, AnalysisToolId, Fingerprint, KeywordReport, SentimentScores, SummaryReport,
    ToolOutcome, ToolOutput, ToolReport,
};
use proptest::prelude::*;
use std::collections::BTreeMap;

// ============================================================================
// Strategies
// ============================================================================

fn arb_tool_id() -> impl Strategy<Value = AnalysisToolId> {
    prop_oneof![
        Just(AnalysisToolId::Sentiment),
        Just(AnalysisToolId::Topic),
        Just(AnalysisToolId::Keyword),
        Just(AnalysisToolId::Summary),
    ]
}

fn arb_tool_report() -> impl Strategy<Value = ToolReport> {
    (arb_tool_id(), prop_oneof![
        (0.0f64..=1.0, 0.0f64..=1.0, 0.0f64..=1.0).prop_map(|(p, n, u)| {
            ToolOutcome::Ok(ToolOutput::Sentiment(SentimentScores {
                positive: p,
                negative: n,
                neutral: u,
            }))
        }),
        proptest::collection::btree_map("[a-z]{1,8}", 0.0f64..=1.0, 0..4).prop_map(|keywords| {
            ToolOutcome::Ok(ToolOutput::Keywords(KeywordReport { keywords }))
        }),
        (".{0,40}", proptest::collection::vec(".{0,20}", 0..3)).prop_map(|(summary, recs)| {
            ToolOutcome::Ok(ToolOutput::Summary(SummaryReport {
                summary,
                recommendations: recs,
            }))
        }),
        ".{0,60}".prop_map(ToolOutcome::Error),
    ])
        .prop_map(|(tool, outcome)| ToolReport { tool, outcome })
}

fn arb_agent_response() -> impl Strategy<Value = AgentResponse> {
    prop_oneof![
        ".{0,80}".prop_map(|text| AgentResponse::Direct { text }),
        proptest::collection::vec(arb_tool_report(), 0..5)
            .prop_map(|results| AgentResponse::Analysis { results }),
        ".{0,80}".prop_map(|message| AgentResponse::Error { message }),
    ]
}

// ============================================================================
// Fingerprint invariants
// ============================================================================

proptest! {
    /// Computing the fingerprint twice yields identical values.
    #[test]
    fn fingerprint_is_deterministic(text in ".{0,200}", instructions in ".{0,100}") {
        prop_assert_eq!(
            Fingerprint::of(&text, &instructions),
            Fingerprint::of(&text, &instructions)
        );
    }

    /// Changing the feedback text changes the fingerprint.
    #[test]
    fn fingerprint_is_sensitive_to_text(
        a in ".{0,200}", b in ".{0,200}", instructions in ".{0,100}"
    ) {
        prop_assume!(a != b);
        prop_assert_ne!(
            Fingerprint::of(&a, &instructions),
            Fingerprint::of(&b, &instructions)
        );
    }

    /// Changing the instructions changes the fingerprint.
    #[test]
    fn fingerprint_is_sensitive_to_instructions(
        text in ".{0,200}", a in ".{0,100}", b in ".{0,100}"
    ) {
        prop_assume!(a != b);
        prop_assert_ne!(
            Fingerprint::of(&text, &a),
            Fingerprint::of(&text, &b)
        );
    }

    /// Moving bytes across the field boundary changes the fingerprint.
    #[test]
    fn fingerprint_has_no_boundary_ambiguity(
        text in "[a-z]{1,50}", instructions in "[a-z]{1,50}"
    ) {
        // Shift the last char of text onto the front of instructions.
        let shifted_text = &text[..text.len() - 1];
        let shifted_instructions = format!("{}{}", &text[text.len() - 1..], instructions);
        prop_assert_ne!(
            Fingerprint::of(&text, &instructions),
            Fingerprint::of(shifted_text, &shifted_instructions)
        );
    }
}

// ============================================================================
// Payload round-trip invariants
// ============================================================================

proptest! {
    /// Any agent response survives a serialize → deserialize → serialize
    /// cycle byte-for-byte (the cache stores serialized payloads).
    #[test]
    fn agent_response_round_trips_byte_for_byte(response in arb_agent_response()) {
        let encoded = serde_json::to_string(&response).unwrap();
        let decoded: AgentResponse = serde_json::from_str(&encoded).unwrap();
        prop_assert_eq!(&decoded, &response);
        prop_assert_eq!(serde_json::to_string(&decoded).unwrap(), encoded);
    }
}

// ============================================================================
// Ordered keyword map
// ============================================================================

#[test]
fn keyword_report_serializes_keys_in_order() {
    let mut keywords = BTreeMap::new();
    keywords.insert("zebra".to_string(), 0.1);
    keywords.insert("apple".to_string(), 0.9);
    let report = KeywordReport { keywords };
    let json = serde_json::to_string(&report).unwrap();
    assert!(json.find("apple").unwrap() < json.find("zebra").unwrap());
}
