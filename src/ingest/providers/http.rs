use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::histogram;

use crate::error::SourceFetchError;
use crate::ingest::types::{SourceDescriptor, SourceFetcher};

const USER_AGENT: &str = "ai-discovery-digest/0.1";

/// Fetches source endpoints over HTTP and parses their bodies as JSON.
#[derive(Clone)]
pub struct HttpSourceFetcher {
    client: reqwest::Client,
}

impl HttpSourceFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(Duration::from_secs(10))
            .timeout(timeout)
            .build()
            .context("building source http client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl SourceFetcher for HttpSourceFetcher {
    async fn fetch_json(
        &self,
        source: &SourceDescriptor,
    ) -> Result<serde_json::Value, SourceFetchError> {
        let t0 = std::time::Instant::now();
        let res = self.fetch_inner(source).await;
        histogram!("ingest_fetch_ms", "outcome" => if res.is_ok() { "ok" } else { "error" })
            .record(t0.elapsed().as_secs_f64() * 1_000.0);
        res
    }
}

impl HttpSourceFetcher {
    async fn fetch_inner(
        &self,
        source: &SourceDescriptor,
    ) -> Result<serde_json::Value, SourceFetchError> {
        let request_err = |e: reqwest::Error| SourceFetchError::Request {
            source_name: source.source_name.clone(),
            message: e.to_string(),
        };

        let resp = self
            .client
            .get(&source.endpoint_url)
            .send()
            .await
            .map_err(request_err)?;

        let status = resp.status();
        if !status.is_success() {
            // The body is still parsed; an error document simply yields no items.
            tracing::warn!(source = %source.source_name, %status, "source returned non-success status");
        }

        let body = resp.bytes().await.map_err(request_err)?;
        let value = serde_json::from_slice(&body).map_err(|e| SourceFetchError::Decode {
            source_name: source.source_name.clone(),
            message: e.to_string(),
        })?;
        Ok(value)
    }
}
