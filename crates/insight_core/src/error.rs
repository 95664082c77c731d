use thiserror::Error;

/// Failure taxonomy for the agent pipeline.
///
/// All of these are contained close to where they occur and converted into
/// structured payloads; none of them should abort a whole request turn.
#[derive(Debug, Error)]
pub enum InsightError {
    /// Completion call failed or returned unparseable output. Recovered
    /// per-tool, surfaced as an error entry among the sibling results.
    #[error("completion provider failure: {0}")]
    Provider(String),

    /// The model requested a tool identifier outside the registered set.
    /// Skipped and logged; the other invocations in the turn still run.
    #[error("unknown analysis tool: {0}")]
    ToolNotFound(String),

    /// The content-safety classifier was unreachable or returned garbage.
    #[error("safety classifier failure: {0}")]
    SafetyProvider(String),

    /// Cache read/write failure. A miss on read, a no-op on write.
    #[error("cache store failure: {0}")]
    Store(String),
}
