use crate::api_client::PriceSource;
use crate::config::Config;
use crate::indicators::IndicatorEngine;
use crate::models::{DateRange, PriceSeries};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub symbol: String,
    pub range: DateRange,
}

pub struct CachedSeries {
    pub series: Arc<PriceSeries>,
    pub fetched_at: Instant,
}

#[derive(Clone)]
pub struct AppState {
    pub inner: Arc<RwLock<AppStateInner>>,
    pub config: Arc<Config>,
    pub source: Arc<dyn PriceSource>,
    pub engine: IndicatorEngine,
}

pub struct AppStateInner {
    pub series_cache: HashMap<CacheKey, CachedSeries>,
}

impl AppState {
    pub fn new(config: Config, source: Arc<dyn PriceSource>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(AppStateInner {
                series_cache: HashMap::new(),
            })),
            config: Arc::new(config),
            source,
            engine: IndicatorEngine::new(),
        }
    }

    /// Cached series for `key` if it is younger than the configured TTL.
    pub async fn cached_series(&self, key: &CacheKey) -> Option<Arc<PriceSeries>> {
        let state = self.inner.read().await;
        state
            .series_cache
            .get(key)
            .filter(|entry| entry.fetched_at.elapsed() < self.config.cache_ttl)
            .map(|entry| Arc::clone(&entry.series))
    }

    pub async fn store_series(&self, key: CacheKey, series: Arc<PriceSeries>) {
        let max_entries = self.config.cache_max_entries;
        if max_entries == 0 {
            return;
        }

        let ttl = self.config.cache_ttl;
        let mut state = self.inner.write().await;
        state.series_cache.retain(|_, entry| entry.fetched_at.elapsed() < ttl);

        // Bounded: drop the oldest fetches first
        while state.series_cache.len() >= max_entries && !state.series_cache.contains_key(&key) {
            let oldest = state
                .series_cache
                .iter()
                .min_by_key(|(_, entry)| entry.fetched_at)
                .map(|(k, _)| k.clone());
            match oldest {
                Some(oldest) => {
                    state.series_cache.remove(&oldest);
                }
                None => break,
            }
        }

        state.series_cache.insert(
            key,
            CachedSeries {
                series,
                fetched_at: Instant::now(),
            },
        );
    }

    pub async fn cache_len(&self) -> usize {
        self.inner.read().await.series_cache.len()
    }
}
