//! OpenAPI specification and documentation.

#![allow(dead_code)] // Path functions are only used by utoipa for documentation generation

use fx_types::{
    ConversionResult, CurrencyCode, DateRange, HistoricalRatesResponse, RateSnapshot,
};
use utoipa::OpenApi;

// Dummy functions to generate path documentation
// These are not the actual handlers, just for OpenAPI path generation

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = inline(serde_json::Value), example = json!({"status": "healthy"}))
    )
)]
async fn health() {}

/// Latest rates for a base currency
#[utoipa::path(
    get,
    path = "/api/exchange-rates/{currency}",
    tag = "rates",
    params(
        ("currency" = String, Path, description = "Three-letter base currency code", example = "USD")
    ),
    responses(
        (status = 200, description = "Latest published rates", body = RateSnapshot),
        (status = 400, description = "Invalid or unknown currency"),
        (status = 408, description = "Rate provider timed out"),
        (status = 500, description = "Rate provider unavailable")
    )
)]
async fn exchange_rates() {}

/// Convert an amount using the latest rates
#[utoipa::path(
    get,
    path = "/api/convert",
    tag = "rates",
    params(
        ("amount" = String, Query, description = "Decimal amount to convert", example = "2"),
        ("from" = String, Query, description = "Source currency", example = "USD"),
        ("to" = Option<String>, Query, description = "Target currency; every convertible currency when omitted", example = "AUD")
    ),
    responses(
        (status = 200, description = "Converted amounts", body = ConversionResult),
        (status = 400, description = "Invalid amount or unsupported currency"),
        (status = 408, description = "Rate provider timed out"),
        (status = 500, description = "Rate provider unavailable")
    )
)]
async fn convert() {}

/// Paged historical rates over a date window
#[utoipa::path(
    get,
    path = "/api/historical-rates/{currency}",
    tag = "rates",
    params(
        ("currency" = String, Path, description = "Three-letter base currency code", example = "USD"),
        ("from_date" = String, Query, description = "First day, yyyy-mm-dd", example = "2024-07-08"),
        ("to_date" = String, Query, description = "Last day, yyyy-mm-dd", example = "2024-07-10"),
        ("page_size" = Option<u32>, Query, description = "Dates per page, 1 to 90", example = 90),
        ("page" = Option<u32>, Query, description = "1-based page number", example = 1)
    ),
    responses(
        (status = 200, description = "One page of rates", body = HistoricalRatesResponse),
        (status = 400, description = "Invalid dates, range or paging"),
        (status = 408, description = "Rate provider timed out"),
        (status = 500, description = "Rate provider unavailable")
    )
)]
async fn historical_rates() {}

/// OpenAPI documentation for the FX API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "FX Gateway API",
        version = "0.1.0",
        description = "Cached exchange rates, conversions and paged historical series backed by the Frankfurter API"
    ),
    paths(health, exchange_rates, convert, historical_rates),
    components(
        schemas(
            CurrencyCode,
            RateSnapshot,
            ConversionResult,
            DateRange,
            HistoricalRatesResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "rates", description = "Latest rates, conversion and history"),
    )
)]
pub struct ApiDoc;
