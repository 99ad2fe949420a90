//! # FX Upstream
//!
//! Outbound adapter for the FX gateway: a [`FrankfurterClient`] implementing
//! the `RateProvider` port, and the [`RetryPolicy`] every upstream call runs
//! under (decorrelated-jitter backoff on transient failures plus an overall
//! deadline).

mod client;
pub mod error;
pub mod retry;
mod wire;

pub use client::{DEFAULT_BASE_URL, FrankfurterClient};
pub use error::UpstreamError;
pub use retry::RetryPolicy;
