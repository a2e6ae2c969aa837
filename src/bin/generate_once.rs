//! Runs the pipeline once and prints the newsletter HTML without sending it.
//!
//! Usage: `generate-once [OUTPUT_PATH]`

use anyhow::Context;
use ai_discovery_digest::{config::AppConfig, init_tracing, Pipeline};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = AppConfig::from_env().context("loading configuration")?;
    let pipeline = Pipeline::from_config(&cfg)?;
    let html = pipeline.run().await?;

    match std::env::args().nth(1) {
        Some(path) => {
            tokio::fs::write(&path, &html)
                .await
                .with_context(|| format!("writing {path}"))?;
            tracing::info!(%path, bytes = html.len(), "newsletter written");
        }
        None => println!("{html}"),
    }
    Ok(())
}
