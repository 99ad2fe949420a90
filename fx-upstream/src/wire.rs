//! Response bodies of the Frankfurter API.

use chrono::NaiveDate;
use serde::Deserialize;

use fx_types::{CurrencyCode, DailyRates, HistoricalSeries, RateSeries, RateSnapshot};

/// `GET /latest?from=CODE`
#[derive(Debug, Deserialize)]
pub(crate) struct LatestResponse {
    pub base: CurrencyCode,
    pub date: NaiveDate,
    pub rates: DailyRates,
}

impl From<LatestResponse> for RateSnapshot {
    fn from(resp: LatestResponse) -> Self {
        RateSnapshot {
            base: resp.base,
            as_of: resp.date,
            rates: resp.rates,
        }
    }
}

/// `GET /{from}..{to}?from=CODE`
#[derive(Debug, Deserialize)]
pub(crate) struct RangeResponse {
    pub base: CurrencyCode,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub rates: RateSeries,
}

impl From<RangeResponse> for HistoricalSeries {
    fn from(resp: RangeResponse) -> Self {
        HistoricalSeries {
            base: resp.base,
            start_date: resp.start_date,
            end_date: resp.end_date,
            rates: resp.rates,
            skipped_ranges: Vec::new(),
        }
    }
}
