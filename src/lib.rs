pub mod analysis;
pub mod config;
pub mod error;
pub mod models;
pub mod ocr;
pub mod routes;
pub mod services;
pub mod swagger;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_helpers;


use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use analysis::DocumentAnalyzer;
use config::Config;

/// Shared, immutable application state. Every request gets a clone of the
/// `Arc`; nothing in here is mutated after startup.
pub struct AppState {
    pub config: Config,
    pub analyzer: DocumentAnalyzer,
}

/// Build the full HTTP application for the given state.
pub fn build_router(state: Arc<AppState>) -> Router {
    let body_limit = state.config.max_file_size_bytes();

    Router::new()
        .merge(routes::extract::router())
        .nest("/api", routes::health::router())
        .merge(swagger::create_swagger_router())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
