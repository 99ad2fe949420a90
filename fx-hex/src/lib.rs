//! # FX Hex
//!
//! Rate engine and HTTP adapter for the FX gateway.
//!
//! ## Architecture
//!
//! - `cache` - Snapshot cache with sliding/absolute expiry
//! - `aggregator` - Chunked assembly of long historical windows
//! - `conversion` / `pagination` - Pure computations over cached data
//! - `service` - Application service (orchestrates the above)
//! - `inbound/` - HTTP adapter (Axum server)
//!
//! The service is generic over `P: RateProvider`, allowing different
//! provider implementations to be injected.

pub mod aggregator;
pub mod cache;
pub mod conversion;
pub mod inbound;
pub mod openapi;
pub mod pagination;
pub mod service;


pub use cache::{CacheConfig, SnapshotCache};
pub use service::{CacheSweeper, RateService, ServiceConfig};
