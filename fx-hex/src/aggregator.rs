//! Historical series assembly.
//!
//! The provider refuses spans longer than [`MAX_UPSTREAM_SPAN_DAYS`], so long
//! windows are split into contiguous chunks, fetched one after another and
//! merged. A chunk that fails is recorded in `skipped_ranges` instead of
//! failing the whole request.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, instrument, warn};

use fx_types::{
    CurrencyCode, DateRange, HistoricalSeries, MAX_UPSTREAM_SPAN_DAYS, RateError, RateProvider,
};

use crate::cache::SnapshotCache;

/// Builds and caches historical series over arbitrary date windows.
pub struct HistoricalAggregator<P: RateProvider> {
    provider: Arc<P>,
    cache: Arc<SnapshotCache<HistoricalSeries>>,
}

impl<P: RateProvider> HistoricalAggregator<P> {
    pub fn new(provider: Arc<P>, cache: Arc<SnapshotCache<HistoricalSeries>>) -> Self {
        Self { provider, cache }
    }

    /// Cache key of a series: `CODE|from|to`.
    pub fn cache_key(base: &CurrencyCode, range: &DateRange) -> String {
        format!("{}|{}|{}", base, range.start, range.end)
    }

    /// Cache key of one upstream chunk: `chunk|CODE|from|to`.
    pub fn chunk_key(base: &CurrencyCode, range: &DateRange) -> String {
        format!("chunk|{}", Self::cache_key(base, range))
    }

    /// Returns the series for `base` over `[from, to]`.
    ///
    /// `from` must be strictly before `to`. Assembled series are cached under
    /// their full window; chunks are cached under their own windows.
    #[instrument(skip(self, base), fields(base = %base))]
    pub async fn get_series(
        &self,
        base: &CurrencyCode,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Arc<HistoricalSeries>, RateError> {
        if from >= to {
            return Err(RateError::InvalidRange { from, to });
        }
        let range = DateRange::new(from, to)?;
        let key = Self::cache_key(base, &range);

        self.cache
            .get_or_fetch(&key, move || self.assemble(base, range))
            .await
    }

    async fn assemble(
        &self,
        base: &CurrencyCode,
        range: DateRange,
    ) -> Result<HistoricalSeries, RateError> {
        if range.days() <= MAX_UPSTREAM_SPAN_DAYS {
            return self.fetch_within(base, range).await;
        }

        let chunks = range.chunks(MAX_UPSTREAM_SPAN_DAYS);
        debug!(
            days = range.days(),
            chunks = chunks.len(),
            "Splitting historical request"
        );

        let mut merged: Option<HistoricalSeries> = None;
        let mut skipped = Vec::new();
        let mut failures = Vec::new();

        for chunk in chunks {
            let key = Self::chunk_key(base, &chunk);
            match self
                .cache
                .get_or_fetch(&key, move || self.fetch_within(base, chunk))
                .await
            {
                Ok(part) => {
                    let series = merged
                        .get_or_insert_with(|| HistoricalSeries::empty(part.base.clone(), range));
                    series.merge_first_seen(&part.rates);
                }
                Err(err) => {
                    warn!(
                        start = %chunk.start,
                        end = %chunk.end,
                        error = %err,
                        "Skipping historical chunk"
                    );
                    skipped.push(chunk);
                    failures.push(err);
                }
            }
        }

        match merged {
            Some(mut series) => {
                series.skipped_ranges = skipped;
                Ok(series)
            }
            None => Err(all_chunks_failed(base, failures)),
        }
    }

    /// One provider call, with dates outside `range` dropped and the bounds
    /// set to `range` itself.
    async fn fetch_within(
        &self,
        base: &CurrencyCode,
        range: DateRange,
    ) -> Result<HistoricalSeries, RateError> {
        let upstream = self.provider.range(base, range).await?;
        let mut series = HistoricalSeries::empty(upstream.base.clone(), range);
        series.merge_first_seen(&upstream.rates);
        Ok(series)
    }
}

/// Collapses the chunk errors of a request where nothing succeeded.
///
/// Unlike a plain `UpstreamUnavailable` for every total failure, an
/// `UnknownCurrency` from any chunk wins so the caller gets a 400 for a bad
/// code instead of a 500.
fn all_chunks_failed(base: &CurrencyCode, failures: Vec<RateError>) -> RateError {
    if let Some(unknown) = failures
        .iter()
        .find(|err| matches!(err, RateError::UnknownCurrency(_)))
    {
        return unknown.clone();
    }
    RateError::UpstreamUnavailable(format!(
        "all {} historical requests for {} failed",
        failures.len(),
        base
    ))
}
