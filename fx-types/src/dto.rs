//! Data Transfer Objects (DTOs) for requests and responses.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{CurrencyCode, DateRange, HistoricalSeries, Page, RateSeries};

/// Largest page the historical endpoint serves.
pub const MAX_PAGE_SIZE: u32 = 90;

// ─────────────────────────────────────────────────────────────────────────────
// Conversion DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Query string of the conversion endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertQuery {
    /// Amount of `from` to convert
    pub amount: Decimal,
    /// Source currency code
    pub from: String,
    /// Optional target currency; every convertible currency when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Historical DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Query string of the historical rates endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalQuery {
    /// First day, `yyyy-mm-dd`
    pub from_date: String,
    /// Last day, `yyyy-mm-dd`
    pub to_date: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_page")]
    pub page: u32,
}

fn default_page_size() -> u32 {
    MAX_PAGE_SIZE
}

fn default_page() -> u32 {
    1
}

/// One page of historical rates.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HistoricalRatesResponse {
    pub base: CurrencyCode,
    #[schema(value_type = String, example = "2024-07-08")]
    pub start_date: NaiveDate,
    #[schema(value_type = String, example = "2024-07-10")]
    pub end_date: NaiveDate,
    #[schema(example = 3)]
    pub total_pages: u32,
    #[schema(example = 1)]
    pub page_size: u32,
    #[schema(example = 1)]
    pub current_page: u32,
    /// Link to the next page, absent on the last page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page_url: Option<String>,
    /// Rates for the dates on this page
    #[schema(value_type = Object, example = json!({"2024-07-08": {"AUD": "1.48784"}}))]
    pub rates: RateSeries,
    /// Sub-ranges missing because the provider failed to return them
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped_ranges: Vec<DateRange>,
}

impl From<Page<HistoricalSeries>> for HistoricalRatesResponse {
    fn from(page: Page<HistoricalSeries>) -> Self {
        let series = page.items;
        Self {
            base: series.base,
            start_date: series.start_date,
            end_date: series.end_date,
            total_pages: page.total_pages,
            page_size: page.page_size,
            current_page: page.page_number,
            next_page_url: page.next_page_url,
            rates: series.rates,
            skipped_ranges: series.skipped_ranges,
        }
    }
}
