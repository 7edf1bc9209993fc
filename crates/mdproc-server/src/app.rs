//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::security;
use crate::state::AppState;

/// Create the application router.
///
/// # Arguments
///
/// * `state` - Shared application state
/// * `cors` - Whether to answer cross-origin requests permissively
pub(crate) fn create_router(state: Arc<AppState>, cors: bool) -> Router {
    let limit = state.max_upload_bytes;

    let mut router = Router::new()
        .route("/", get(handlers::index::get_index))
        .route("/health", get(handlers::health::get_health))
        .route(
            "/convert/confluence",
            post(handlers::convert::convert_confluence),
        )
        .route("/convert/mermaid", post(handlers::convert::convert_mermaid))
        .layer(DefaultBodyLimit::max(limit));

    if cors {
        router = router.layer(CorsLayer::permissive());
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(security::content_type_options_layer())
                .layer(security::frame_options_layer()),
        )
        .with_state(state)
}
