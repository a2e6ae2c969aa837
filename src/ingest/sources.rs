// src/ingest/sources.rs
use super::types::SourceDescriptor;

/// The discovery endpoints polled on every aggregation pass, in output order.
pub fn default_sources() -> Vec<SourceDescriptor> {
    vec![
        SourceDescriptor::new(
            "https://trendgpt-backend.onrender.com/scrape/github-repositories",
            "GitHub",
        ),
        SourceDescriptor::new(
            "https://trendgpt-backend.onrender.com/scrape/github-developers",
            "GitHub Developer",
        ),
        SourceDescriptor::new(
            "https://ai-discovery-agent-frontend.onrender.com/api/papers",
            "Hugging face research papers",
        ),
        SourceDescriptor::new(
            "https://fetch-url.onrender.com/fetch-url?url=https://huggingface.co/api/trending?limit=10&type=all&isapi=1",
            "HuggingFace",
        ),
    ]
}
