use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::catalog::DocStore;
use crate::config::ServiceConfig;
use crate::metrics::SearchMetrics;
use crate::search::SearchEngine;

use super::handlers::*;

/// Application state shared across all handlers
pub struct AppState {
    pub config: ServiceConfig,
    pub engine: Arc<SearchEngine>,
    pub catalog: Arc<DocStore>,
    pub metrics: Arc<SearchMetrics>,
}

/// Create the HTTP router with all endpoints
pub fn create_router(state: AppState) -> Router {
    let state = Arc::new(state);

    Router::new()
        // Document ingestion
        .route("/v1/docs/upsert", post(upsert_document))
        // Corpus and index builds
        .route("/v1/corpus/build", post(build_corpus))
        .route("/v1/index/build", post(build_index))
        .route("/v1/index/rebuild", post(rebuild_index))
        // Index lifecycle
        .route("/v1/index/set_current", post(set_current))
        .route("/v1/index/load", post(load_index))
        // Search
        .route("/v1/search", post(search))
        // Health and metrics
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
