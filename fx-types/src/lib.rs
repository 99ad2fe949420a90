//! # FX Types
//!
//! Domain types and port traits for the FX gateway.
//! This crate has ZERO external IO dependencies - only data structures,
//! rate-set invariants, and trait definitions.
//!
//! ## Architecture
//!
//! This crate represents the **innermost core** of the hexagonal architecture:
//! - `domain/` - Pure domain types (CurrencyCode, RateSnapshot, HistoricalSeries, Page)
//! - `ports/` - Trait definitions that adapters must implement
//! - `dto/` - Data Transfer Objects for API boundaries
//! - `error/` - Core and application error types

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    ConversionResult, CurrencyCode, DailyRates, DateRange, HistoricalSeries, Page,
    ParseCurrencyError, RateSeries, RateSnapshot, MAX_UPSTREAM_SPAN_DAYS,
    NON_CONVERTIBLE_CURRENCIES,
};
pub use dto::*;
pub use error::{AppError, RateError};
pub use ports::RateProvider;
