//! FX Rate Service
//!
//! Orchestrates lookups, conversions and historical queries through the
//! rate provider port, with every provider answer going through a cache.
//! Contains NO infrastructure logic - pure orchestration.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tokio::time::sleep;
use tracing::{debug, info, instrument};

use fx_types::{
    ConversionResult, CurrencyCode, HistoricalSeries, Page, RateError, RateProvider, RateSnapshot,
};

use crate::aggregator::HistoricalAggregator;
use crate::cache::{CacheConfig, SnapshotCache};
use crate::conversion;
use crate::pagination::Paginator;

/// Settings for [`RateService`].
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub cache: CacheConfig,
    /// Origin used when building next-page links.
    pub public_base_url: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            cache: CacheConfig::default(),
            public_base_url: "http://localhost:3000".into(),
        }
    }
}

/// Application service for rate operations.
///
/// Generic over `P: RateProvider` - the adapter is injected at compile time,
/// so tests swap in an in-memory provider.
pub struct RateService<P: RateProvider> {
    provider: Arc<P>,
    latest: Arc<SnapshotCache<RateSnapshot>>,
    history: Arc<SnapshotCache<HistoricalSeries>>,
    aggregator: HistoricalAggregator<P>,
    paginator: Paginator,
}

impl<P: RateProvider> RateService<P> {
    /// Creates a service with default settings.
    pub fn new(provider: P) -> Self {
        Self::with_config(provider, ServiceConfig::default())
    }

    pub fn with_config(provider: P, config: ServiceConfig) -> Self {
        let provider = Arc::new(provider);
        let latest = Arc::new(SnapshotCache::with_config(config.cache.clone()));
        let history = Arc::new(SnapshotCache::with_config(config.cache));

        Self {
            aggregator: HistoricalAggregator::new(provider.clone(), history.clone()),
            paginator: Paginator::new(config.public_base_url),
            provider,
            latest,
            history,
        }
    }

    /// Returns a reference to the underlying provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Latest Rates
    // ─────────────────────────────────────────────────────────────────────────────

    /// Latest snapshot for `base`, served from cache when fresh.
    #[instrument(skip(self, base), fields(base = %base))]
    pub async fn lookup(&self, base: &CurrencyCode) -> Result<Arc<RateSnapshot>, RateError> {
        let provider = &self.provider;
        self.latest
            .get_or_fetch(base.as_str(), move || provider.latest(base))
            .await
    }

    /// Converts `amount` of `from` using the cached latest snapshot.
    ///
    /// Conversion results are never cached; only the snapshot is.
    #[instrument(skip(self, from, to), fields(from = %from))]
    pub async fn convert(
        &self,
        amount: Decimal,
        from: &CurrencyCode,
        to: Option<&CurrencyCode>,
    ) -> Result<ConversionResult, RateError> {
        let snapshot = self.lookup(from).await?;
        conversion::convert(&snapshot, amount, to)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Historical Rates
    // ─────────────────────────────────────────────────────────────────────────────

    /// One page of the historical series for `base` over `[from, to]`.
    #[instrument(skip(self, base), fields(base = %base))]
    pub async fn historical(
        &self,
        base: &CurrencyCode,
        from: NaiveDate,
        to: NaiveDate,
        page_size: u32,
        page: u32,
    ) -> Result<Page<HistoricalSeries>, RateError> {
        let series = self.aggregator.get_series(base, from, to).await?;
        let slice = self.paginator.paginate(&series, page_size, page);
        debug!(
            total_pages = slice.total_pages,
            entries = slice.items.len(),
            "Serving historical page"
        );

        Ok(slice.map(|rates| HistoricalSeries {
            base: series.base.clone(),
            start_date: series.start_date,
            end_date: series.end_date,
            rates,
            skipped_ranges: series.skipped_ranges.clone(),
        }))
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Cache Maintenance
    // ─────────────────────────────────────────────────────────────────────────────

    /// Drops expired entries from both caches. Returns how many were removed.
    pub fn evict_expired(&self) -> usize {
        self.latest.evict_expired() + self.history.evict_expired()
    }

    pub fn clear_cache(&self) {
        self.latest.clear();
        self.history.clear();
    }

    /// Background task that periodically evicts expired cache entries.
    pub fn cache_sweeper(&self, interval: Duration) -> CacheSweeper {
        CacheSweeper {
            latest: self.latest.clone(),
            history: self.history.clone(),
            interval,
        }
    }
}

/// Periodic eviction of expired cache entries.
pub struct CacheSweeper {
    latest: Arc<SnapshotCache<RateSnapshot>>,
    history: Arc<SnapshotCache<HistoricalSeries>>,
    interval: Duration,
}

impl CacheSweeper {
    pub fn sweep(&self) -> usize {
        self.latest.evict_expired() + self.history.evict_expired()
    }

    #[instrument(skip(self))]
    pub async fn run(self) {
        info!("Starting cache sweeper every {:?}", self.interval);
        loop {
            sleep(self.interval).await;
            let evicted = self.sweep();
            if evicted > 0 {
                info!(
                    evicted,
                    remaining = self.latest.len() + self.history.len(),
                    "Evicted expired cache entries"
                );
            }
        }
    }
}
