//! AI Discovery Digest — Binary Entrypoint
//! Boots the Axum HTTP server with the newsletter pipeline as shared state.

use std::net::SocketAddr;

use anyhow::Context;
use ai_discovery_digest::{config::AppConfig, init_tracing, metrics::Metrics, router, AppState, Pipeline};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when the file is absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = AppConfig::from_env().context("loading configuration")?;
    let metrics = Metrics::init(cfg.cache_ttl)?;

    let pipeline = Pipeline::from_config(&cfg)?;
    let app = router(AppState::new(pipeline)).merge(metrics.router());

    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr} (is the port already in use?)"))?;

    tracing::info!(
        %addr,
        environment = %std::env::var("APP_ENV").unwrap_or_else(|_| "development".into()),
        "server running"
    );
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
