//! Agent delegation and tool-dispatch pipeline for customer-feedback analysis.
//!
//! A request flows: fingerprint → cache lookup → safety gate → master agent
//! (direct answer or one delegation to the sub-agent) → sub-agent tool
//! fan-out → cache write. The [`orchestrator::Orchestrator`] is the only
//! externally visible entry point.

pub mod api_types;
pub mod cache;
pub mod json_extract;
pub mod llm;
pub mod master;
pub mod orchestrator;
pub mod prompts;
pub mod providers;
pub mod registry;
pub mod safety;
pub mod subagent;
pub mod tools;

pub use cache::{MemoryStore, ResultCache};
pub use master::MasterAgent;
pub use orchestrator::{Orchestrator, Reply};
pub use registry::ToolRegistry;
pub use safety::{AllowAllClassifier, GateDecision, SafetyGate};
pub use subagent::SubAgent;
