use anyhow::Context;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use insight_agents::{Orchestrator, Reply};
use insight_core::FeedbackRequest;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Shared state for the gateway server.
#[derive(Clone)]
struct AppState {
    orchestrator: Arc<Orchestrator>,
}

/// Build the gateway router:
/// - `POST /invoke` — process one feedback request
/// - `POST /batch-invoke` — process a batch, one reply per item
/// - `GET /health` — health check
pub fn router(orchestrator: Arc<Orchestrator>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/invoke", post(invoke))
        .route("/batch-invoke", post(batch_invoke))
        .layer(CorsLayer::permissive())
        .with_state(AppState { orchestrator })
}

/// Bind and serve until shutdown.
pub async fn serve(orchestrator: Arc<Orchestrator>, host: &str, port: u16) -> anyhow::Result<()> {
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Gateway failed to bind {addr}"))?;
    tracing::info!("Gateway listening on {addr}");
    axum::serve(listener, router(orchestrator))
        .await
        .context("Gateway server error")?;
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    pub requests: Vec<FeedbackRequest>,
}

#[derive(Debug, Serialize)]
pub struct BatchReply {
    pub message: String,
    pub output: Vec<Reply>,
}

// ============================================================================
// Route handlers
// ============================================================================

async fn health() -> &'static str {
    "ok"
}

async fn invoke(
    State(state): State<AppState>,
    Json(request): Json<FeedbackRequest>,
) -> Json<Reply> {
    Json(state.orchestrator.handle(request).await)
}

async fn batch_invoke(
    State(state): State<AppState>,
    Json(batch): Json<BatchRequest>,
) -> Json<BatchReply> {
    let count = batch.requests.len();
    let output = state.orchestrator.handle_batch(batch.requests).await;
    Json(BatchReply {
        message: format!("Processed {count} feedback requests"),
        output,
    })
}
