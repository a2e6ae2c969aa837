//! # Content synthesizer
//! Turns the serialized feed into the final newsletter HTML via the completion
//! service, with results cached under a content fingerprint.
//!
//! No retries here: a failed generation is fatal to the run because every
//! attempt costs upstream resources.

pub mod completion;
pub mod markup;
pub mod prompt;
pub mod template;

use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{Datelike, Local, NaiveDate};
use metrics::counter;

use crate::cache::{CachedValue, SharedCache};
use crate::error::PipelineError;
use completion::CompletionClient;

/// Length of the encoded-input prefix used in summary cache keys.
pub const FINGERPRINT_LEN: usize = 40;

/// `summary_` + a 40 char prefix of the base64 encoded input.
///
/// Cheap, not collision-free: inputs sharing their first ~30 bytes map to the
/// same key.
pub fn summary_cache_key(feed_text: &str) -> String {
    let encoded = STANDARD.encode(feed_text.as_bytes());
    let end = encoded.len().min(FINGERPRINT_LEN);
    format!("summary_{}", &encoded[..end])
}

/// Long US date form, e.g. `Monday, October 19, 2026`.
pub fn long_date_label(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

pub struct ContentSynthesizer {
    client: Arc<dyn CompletionClient>,
    cache: SharedCache,
}

impl ContentSynthesizer {
    pub fn new(client: Arc<dyn CompletionClient>, cache: SharedCache) -> Self {
        Self { client, cache }
    }

    pub async fn synthesize(&self, feed_text: &str) -> Result<String, PipelineError> {
        self.synthesize_on(feed_text, Local::now().date_naive()).await
    }

    /// Same as [`Self::synthesize`] with an explicit issue date.
    pub async fn synthesize_on(
        &self,
        feed_text: &str,
        date: NaiveDate,
    ) -> Result<String, PipelineError> {
        let key = summary_cache_key(feed_text);
        let date_label = long_date_label(date);

        if let Some(CachedValue::Synthesis { summary, html }) = self.cache.get(&key) {
            counter!("cache_hits_total", "kind" => "synthesis").increment(1);
            return Ok(match html {
                Some(html) => {
                    tracing::info!("using cached newsletter");
                    html
                }
                None => {
                    tracing::info!("using cached summary, re-rendering template");
                    template::render_newsletter(&summary, &date_label, date.year())
                }
            });
        }

        tracing::info!(provider = self.client.name(), "no cached summary, calling completion service");
        counter!("completion_requests_total").increment(1);
        let user = prompt::user_prompt(&date_label, feed_text);
        let content = self
            .client
            .complete(prompt::SYSTEM_PROMPT, &user)
            .await
            .map_err(|e| PipelineError::Generation(format!("{e:#}")))?
            .ok_or_else(|| {
                PipelineError::Generation("completion service returned no content".into())
            })?;

        let summary = markup::ensure_markup(content);
        let html = template::render_newsletter(&summary, &date_label, date.year());

        self.cache.set(
            key,
            CachedValue::Synthesis {
                summary,
                html: Some(html.clone()),
            },
        );
        tracing::info!(bytes = html.len(), "newsletter generated");
        Ok(html)
    }
}
