//! HTTP Inbound Adapter
//!
//! Axum-based HTTP server that drives the rate service.

mod handlers;
mod server;
pub mod validation;

pub use server::HttpServer;
