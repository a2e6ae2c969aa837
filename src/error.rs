//! Error taxonomy for the newsletter pipeline.
//!
//! Per-source failures ([`SourceFetchError`]) are absorbed inside the aggregator.
//! Stage-terminal failures ([`PipelineError`]) propagate to the caller unchanged.

use thiserror::Error;

/// Failure to fetch or decode a single data source. Never surfaced past the aggregator.
#[derive(Debug, Error)]
pub enum SourceFetchError {
    /// Network-level failure (connect, TLS, timeout, body read).
    #[error("request to {source_name} failed: {message}")]
    Request {
        source_name: String,
        message: String,
    },

    /// The response body was not valid JSON.
    #[error("response from {source_name} is not valid JSON: {message}")]
    Decode {
        source_name: String,
        message: String,
    },
}

/// Stage-terminal failures of a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The completion service produced no usable newsletter content.
    #[error("Failed to generate newsletter content: {0}")]
    Generation(String),

    /// The mail service rejected every delivery attempt.
    #[error("Failed to send newsletter after {attempts} attempts: {message}")]
    Delivery { attempts: u32, message: String },
}

impl PipelineError {
    /// Structured details for the HTTP error body.
    pub fn details(&self) -> serde_json::Value {
        match self {
            Self::Generation(_) => serde_json::json!({}),
            Self::Delivery { attempts, .. } => serde_json::json!({ "attempts": attempts }),
        }
    }
}

/// Invalid or missing process configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}
