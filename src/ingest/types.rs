// src/ingest/types.rs
use serde::{Deserialize, Serialize};

use crate::error::SourceFetchError;

/// One upstream discovery endpoint. Fixed at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDescriptor {
    pub endpoint_url: String,
    pub source_name: String, // e.g. "GitHub", "HuggingFace"
}

impl SourceDescriptor {
    pub fn new(endpoint_url: impl Into<String>, source_name: impl Into<String>) -> Self {
        Self {
            endpoint_url: endpoint_url.into(),
            source_name: source_name.into(),
        }
    }
}

/// Uniform record produced from any upstream item shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedItem {
    pub title: String,
    pub description: String,
    pub url: String,
    pub source: String,
}

/// Items of all sources, concatenated in source-list order.
pub type AggregatedFeed = Vec<NormalizedItem>;

/// Retrieves the raw JSON document of a source endpoint.
#[async_trait::async_trait]
pub trait SourceFetcher: Send + Sync {
    async fn fetch_json(
        &self,
        source: &SourceDescriptor,
    ) -> Result<serde_json::Value, SourceFetchError>;
}
