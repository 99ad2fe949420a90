//! Domain models for the FX gateway.

pub mod conversion;
pub mod currency;
pub mod page;
pub mod rates;

pub use conversion::ConversionResult;
pub use currency::{CurrencyCode, NON_CONVERTIBLE_CURRENCIES, ParseCurrencyError};
pub use page::Page;
pub use rates::{
    DailyRates, DateRange, HistoricalSeries, MAX_UPSTREAM_SPAN_DAYS, RateSeries, RateSnapshot,
};
