//! # Pipeline orchestrator
//! aggregate -> serialize -> synthesize, with delivery as a separate step so
//! generation and sending can be observed or retried independently.

use std::sync::Arc;

use anyhow::{Context, Result};
use metrics::gauge;

use crate::cache;
use crate::config::{AppConfig, MailTransportKind};
use crate::error::PipelineError;
use crate::ingest::providers::http::HttpSourceFetcher;
use crate::ingest::sources::default_sources;
use crate::ingest::types::{NormalizedItem, SourceFetcher};
use crate::ingest::SourceAggregator;
use crate::notify::mail::{HttpMailTransport, MailTransport};
use crate::notify::smtp::SmtpMailTransport;
use crate::notify::{DeliveryResult, Dispatcher};
use crate::synth::completion::{ChatCompletionClient, CompletionClient};
use crate::synth::ContentSynthesizer;

/// Numbered text block handed to the synthesizer, one line per item:
/// `(n) [source] title: description`, 1-indexed.
pub fn serialize_feed(items: &[NormalizedItem]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, it)| format!("({}) [{}] {}: {}", i + 1, it.source, it.title, it.description))
        .collect::<Vec<_>>()
        .join("\n")
}

pub struct Pipeline {
    aggregator: SourceAggregator,
    synthesizer: ContentSynthesizer,
    dispatcher: Dispatcher,
}

impl Pipeline {
    /// Stages are expected to share one cache.
    pub fn new(
        aggregator: SourceAggregator,
        synthesizer: ContentSynthesizer,
        dispatcher: Dispatcher,
    ) -> Self {
        Self {
            aggregator,
            synthesizer,
            dispatcher,
        }
    }

    /// Production wiring: HTTP sources, chat completion service, configured mail transport.
    pub fn from_config(cfg: &AppConfig) -> Result<Self> {
        let cache = cache::shared(cfg.cache_ttl);

        let fetcher: Arc<dyn SourceFetcher> =
            Arc::new(HttpSourceFetcher::new(cfg.http_timeout)?);
        let aggregator = SourceAggregator::new(default_sources(), fetcher, cache.clone());

        let client: Arc<dyn CompletionClient> = Arc::new(ChatCompletionClient::new(
            cfg.completion_url.clone(),
            cfg.api_key.clone(),
            cfg.completion_model.clone(),
            cfg.http_timeout,
        )?);
        let synthesizer = ContentSynthesizer::new(client, cache);

        let transport: Arc<dyn MailTransport> = match (&cfg.mail_transport, &cfg.smtp) {
            (MailTransportKind::Smtp, Some(smtp)) => {
                Arc::new(SmtpMailTransport::new(smtp).context("building smtp transport")?)
            }
            _ => Arc::new(HttpMailTransport::new(
                cfg.mail_endpoint.clone(),
                cfg.http_timeout,
            )),
        };
        let dispatcher = Dispatcher::new(transport, cfg.retry);

        Ok(Self::new(aggregator, synthesizer, dispatcher))
    }

    /// Generate the newsletter HTML. Does not send it.
    pub async fn run(&self) -> Result<String, PipelineError> {
        tracing::info!("fetching data from sources");
        let feed = self.aggregator.aggregate().await;
        tracing::info!(items = feed.len(), "feed aggregated");

        let text = serialize_feed(&feed);
        tracing::info!("generating newsletter");
        let html = self.synthesizer.synthesize(&text).await?;

        gauge!("pipeline_last_run_ts").set(chrono::Utc::now().timestamp() as f64);
        Ok(html)
    }

    pub async fn deliver(&self, content: &str) -> Result<DeliveryResult, PipelineError> {
        self.dispatcher.dispatch(content).await
    }

    /// `run` followed by `deliver`, as the HTTP trigger does.
    pub async fn run_and_deliver(&self) -> Result<DeliveryResult, PipelineError> {
        let html = self.run().await?;
        self.deliver(&html).await
    }
}
