use axum::{extract::State, routing::get, Json, Router};
use std::sync::Arc;

use crate::{models::HealthResponse, AppState};

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health_check))
}

#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        ocr_enabled: cfg!(feature = "ocr"),
        signature_strategy: state.analyzer.config().signature.strategy.to_string(),
    })
}
