use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handler;
use crate::state::AppState;

/// Build the axum router with all Blocker endpoints.
///
/// Request bodies are capped at the service's blob size limit, so an
/// oversized upload is refused while it streams in.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.service.max_blob_size();
    Router::new()
        .route("/health", get(handler::health_handler))
        .route(
            "/blobs",
            get(handler::missing_key_handler).post(handler::ingest_handler),
        )
        .route("/blobs/", get(handler::missing_key_handler))
        .route("/blobs/:key", get(handler::retrieve_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
