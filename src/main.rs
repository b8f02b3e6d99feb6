use anyhow::Context;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use formaudit::{
    analysis::DocumentAnalyzer, build_router, config::Config,
    services::rasterizer::PdftoppmRasterizer, AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("formaudit=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;

    if !PdftoppmRasterizer::is_available().await {
        warn!("pdftoppm not found on PATH; every document will be reported with all fields missing");
    }
    if !cfg!(feature = "ocr") {
        warn!("Built without the 'ocr' feature; text recognition is disabled");
    }

    let analyzer = DocumentAnalyzer::from_config(&config)?;
    let server_address = config.server_address.clone();
    let state = Arc::new(AppState { config, analyzer });

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&server_address)
        .await
        .with_context(|| format!("Failed to bind {}", server_address))?;
    info!("Server starting on {}", server_address);
    info!("API docs available at http://{}/swagger-ui", server_address);

    axum::serve(listener, app).await?;

    Ok(())
}
