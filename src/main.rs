use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use flat_valuer::api::HttpEstimationApi;
use flat_valuer::{routes, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();

    info!("🏠 Flat Valuer");
    info!(api = %config.api_url, timeout_secs = config.timeout_secs, "Using estimation service");

    let api = HttpEstimationApi::new(&config.api_url, config.timeout())?;
    let state = Arc::new(AppState::new(Arc::new(api)));
    let app = routes::router(state, config.max_upload_bytes());

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;
    info!("🚀 Listening on http://{}", config.bind);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
