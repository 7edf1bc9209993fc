//! Health check endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::state::AppState;

/// Response for GET /health.
#[derive(Serialize)]
pub(crate) struct HealthResponse {
    /// Always `"ok"` while the server is answering.
    status: &'static str,
    /// Whether the Mermaid CLI answered its version probe.
    mermaid_cli_available: bool,
    /// Server version.
    version: String,
}

/// Handle GET /health.
pub(crate) async fn get_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        mermaid_cli_available: state.mermaid.is_available().await,
        version: state.version.clone(),
    })
}
