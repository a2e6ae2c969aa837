//! # Expiring cache
//! In-process key/value store with a fixed absolute TTL per entry.
//!
//! Expiration is lazy: an expired entry is removed by the `get` that observes it,
//! there is no background sweep. `set` always recomputes expiry as `now + ttl`
//! and overwrites whatever was stored (last writer wins).

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::ingest::types::NormalizedItem;

/// Default entry lifetime (10 minutes).
pub const DEFAULT_TTL: Duration = Duration::from_secs(10 * 60);

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    expiry: Instant,
}

/// Thread-safe expiring map. The lock is never held across an `.await`.
#[derive(Debug)]
pub struct TtlCache<V> {
    inner: Mutex<HashMap<String, CacheEntry<V>>>,
    ttl: Duration,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    pub fn with_default_ttl() -> Self {
        Self::new(DEFAULT_TTL)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get(&self, key: &str) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    pub fn set(&self, key: impl Into<String>, value: V) {
        self.set_at(key, value, Instant::now());
    }

    /// Read `key` as of `now`. An entry is readable only while `now < expiry`;
    /// an expired entry is evicted and reported as absent.
    pub fn get_at(&self, key: &str, now: Instant) -> Option<V> {
        let mut map = self.lock();
        match map.get(key) {
            Some(entry) if now < entry.expiry => Some(entry.value.clone()),
            Some(_) => {
                map.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn set_at(&self, key: impl Into<String>, value: V, now: Instant) {
        let entry = CacheEntry {
            value,
            expiry: now + self.ttl,
        };
        self.lock().insert(key.into(), entry);
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of stored entries, including expired ones not yet observed.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, CacheEntry<V>>> {
        // A panic while holding the lock cannot leave the map half-written.
        match self.inner.lock() {
            Ok(g) => g,
            Err(poison) => poison.into_inner(),
        }
    }
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::with_default_ttl()
    }
}

/// Everything the pipeline stages keep in the shared cache.
#[derive(Debug, Clone, PartialEq)]
pub enum CachedValue {
    /// Raw parsed response of one source endpoint, whatever its shape.
    SourcePayload(serde_json::Value),
    /// The merged, normalized feed of a whole aggregation pass.
    Feed(Vec<NormalizedItem>),
    /// A completed synthesis: the summary fragment and, once rendered, the full HTML.
    Synthesis {
        summary: String,
        html: Option<String>,
    },
}

/// Cache shared by the aggregator and the synthesizer; owned by the pipeline.
pub type SharedCache = Arc<TtlCache<CachedValue>>;

pub fn shared(ttl: Duration) -> SharedCache {
    Arc::new(TtlCache::new(ttl))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_after_set_within_ttl_returns_value() {
        let cache = TtlCache::new(Duration::from_secs(60));
        let t0 = Instant::now();
        cache.set_at("k", 42u32, t0);
        assert_eq!(cache.get_at("k", t0 + Duration::from_secs(59)), Some(42));
    }

    #[test]
    fn expiry_is_exclusive_and_eviction_sticks() {
        let cache = TtlCache::new(Duration::from_secs(60));
        let t0 = Instant::now();
        cache.set_at("k", "v".to_string(), t0);

        let at_expiry = t0 + Duration::from_secs(60);
        assert_eq!(cache.get_at("k", at_expiry), None);
        assert_eq!(cache.len(), 0, "expired entry is evicted on access");
        // Even a read "in the past" cannot resurrect it.
        assert_eq!(cache.get_at("k", t0), None);
    }

    #[test]
    fn set_overwrites_and_refreshes_expiry() {
        let cache = TtlCache::new(Duration::from_secs(10));
        let t0 = Instant::now();
        cache.set_at("k", 1, t0);
        cache.set_at("k", 2, t0 + Duration::from_secs(8));
        assert_eq!(cache.get_at("k", t0 + Duration::from_secs(15)), Some(2));
    }

    #[test]
    fn clear_drops_everything() {
        let cache: TtlCache<i32> = TtlCache::default();
        cache.set("a", 1);
        cache.set("b", 2);
        assert_eq!(cache.len(), 2);
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.ttl(), DEFAULT_TTL);
    }
}
