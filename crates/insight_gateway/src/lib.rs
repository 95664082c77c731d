//! HTTP gateway for the feedback-analysis service.
//!
//! Thin JSON transport over the orchestrator: one endpoint per request, one
//! for batches, plus a health check.

pub mod server;

pub use server::{router, serve, BatchReply, BatchRequest};
