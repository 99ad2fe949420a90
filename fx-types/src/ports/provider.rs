//! Rate provider port.
//!
//! This trait defines the interface to the upstream rate source.
//! Implementations can be HTTP clients, mock providers, etc.

use crate::domain::{CurrencyCode, DateRange, HistoricalSeries, RateSnapshot};
use crate::error::RateError;

/// Port trait for upstream exchange rate providers.
///
/// Implementations are responsible for their own retry and deadline policy;
/// callers treat every error as final.
#[async_trait::async_trait]
pub trait RateProvider: Send + Sync + 'static {
    /// Latest published rates for `base`.
    ///
    /// Fails with `RateError::UnknownCurrency` when the provider does not
    /// quote `base`.
    async fn latest(&self, base: &CurrencyCode) -> Result<RateSnapshot, RateError>;

    /// Daily rates for `base` over `range`.
    ///
    /// `range` must not exceed `MAX_UPSTREAM_SPAN_DAYS`; longer ranges are the
    /// aggregator's job.
    async fn range(
        &self,
        base: &CurrencyCode,
        range: DateRange,
    ) -> Result<HistoricalSeries, RateError>;
}

