use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status, the configured model and whether generation is usable.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "interview-chain",
        "model": state.chain.settings().model,
        "credential_configured": state.config.openai_api_key.is_some(),
        "active_sessions": state.sessions.len().await,
    }))
}
