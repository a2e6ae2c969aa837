// src/ingest/mod.rs
pub mod normalize;
pub mod providers;
pub mod sources;
pub mod types;

use std::sync::Arc;

use metrics::{counter, describe_counter, describe_histogram};
use once_cell::sync::{Lazy, OnceCell};
use regex::Regex;

use crate::cache::{CachedValue, SharedCache};
use crate::error::SourceFetchError;
use crate::ingest::normalize::items_from_payload;
use crate::ingest::types::{AggregatedFeed, NormalizedItem, SourceDescriptor, SourceFetcher};

/// Cache key of the merged feed of a whole pass.
pub const FEED_CACHE_KEY: &str = "all_api_data";

/// Outcome of a single source within one aggregation pass.
pub type SourceOutcome = (SourceDescriptor, Result<Vec<NormalizedItem>, SourceFetchError>);

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("ingest_items_total", "Normalized items kept per pass.");
        describe_counter!(
            "ingest_source_errors_total",
            "Source fetch/parse errors (source skipped)."
        );
        describe_counter!("cache_hits_total", "Shared cache hits by value kind.");
        describe_histogram!("ingest_fetch_ms", "Source fetch time in milliseconds.");
    });
}

/// Per-source cache key: `api_` + lower-cased name with whitespace runs collapsed to `_`.
pub fn source_cache_key(source_name: &str) -> String {
    static RE_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));
    let lowered = source_name.to_lowercase();
    format!("api_{}", RE_WS.replace_all(&lowered, "_"))
}

/// Concatenate successful outcomes in order; failed sources are logged and
/// contribute nothing.
pub fn merge_source_results(outcomes: Vec<SourceOutcome>) -> AggregatedFeed {
    let mut feed = Vec::new();
    for (source, outcome) in outcomes {
        match outcome {
            Ok(mut items) => feed.append(&mut items),
            Err(e) => {
                tracing::warn!(error = %e, source = %source.source_name, "source skipped");
                counter!("ingest_source_errors_total", "source" => source.source_name.clone())
                    .increment(1);
            }
        }
    }
    feed
}

/// Queries every configured source in order and merges their items.
pub struct SourceAggregator {
    sources: Vec<SourceDescriptor>,
    fetcher: Arc<dyn SourceFetcher>,
    cache: SharedCache,
}

impl SourceAggregator {
    pub fn new(
        sources: Vec<SourceDescriptor>,
        fetcher: Arc<dyn SourceFetcher>,
        cache: SharedCache,
    ) -> Self {
        Self {
            sources,
            fetcher,
            cache,
        }
    }

    /// Build the aggregated feed, serving it from cache while it is fresh.
    ///
    /// Sources are fetched sequentially in list order. A failing source is
    /// skipped; if every source fails the feed is empty, not an error.
    pub async fn aggregate(&self) -> AggregatedFeed {
        ensure_metrics_described();

        if let Some(CachedValue::Feed(feed)) = self.cache.get(FEED_CACHE_KEY) {
            tracing::info!(items = feed.len(), "using cached feed");
            counter!("cache_hits_total", "kind" => "feed").increment(1);
            return feed;
        }

        tracing::info!(sources = self.sources.len(), "no cached feed, fetching sources");
        let mut outcomes = Vec::with_capacity(self.sources.len());
        for source in &self.sources {
            let outcome = self.fetch_source(source).await;
            outcomes.push((source.clone(), outcome));
        }

        let feed = merge_source_results(outcomes);
        counter!("ingest_items_total").increment(feed.len() as u64);

        self.cache.set(FEED_CACHE_KEY, CachedValue::Feed(feed.clone()));
        feed
    }

    /// Items of one source, from its cached raw payload or a fresh fetch.
    async fn fetch_source(
        &self,
        source: &SourceDescriptor,
    ) -> Result<Vec<NormalizedItem>, SourceFetchError> {
        let key = source_cache_key(&source.source_name);

        let payload = match self.cache.get(&key) {
            Some(CachedValue::SourcePayload(v)) => {
                tracing::debug!(source = %source.source_name, "using cached source payload");
                counter!("cache_hits_total", "kind" => "source").increment(1);
                v
            }
            _ => {
                tracing::debug!(source = %source.source_name, url = %source.endpoint_url, "fetching source");
                let v = self.fetcher.fetch_json(source).await?;
                // Cached whatever its shape; non-arrays simply yield no items.
                self.cache.set(key, CachedValue::SourcePayload(v.clone()));
                v
            }
        };

        Ok(items_from_payload(&payload, &source.source_name))
    }
}
