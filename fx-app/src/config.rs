//! Configuration loading from environment.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;

use fx_hex::{CacheConfig, ServiceConfig};
use fx_upstream::{DEFAULT_BASE_URL, RetryPolicy};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub frankfurter_base_url: String,
    pub public_base_url: String,
    pub retry: RetryPolicy,
    pub cache: CacheConfig,
    /// `None` disables the background sweep.
    pub sweep_interval: Option<Duration>,
    pub otlp_endpoint: Option<String>,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration through `lookup`, applying defaults for anything
    /// missing or blank.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port: u16 = parse_or(&get, "PORT", 3000)?;

        let frankfurter_base_url =
            get("FRANKFURTER_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let public_base_url =
            get("PUBLIC_BASE_URL").unwrap_or_else(|| format!("http://localhost:{}", port));

        let retry = RetryPolicy {
            max_retries: parse_or(&get, "UPSTREAM_MAX_RETRIES", 3)?,
            median_first_delay: Duration::from_millis(parse_or(
                &get,
                "UPSTREAM_MEDIAN_FIRST_DELAY_MS",
                1000,
            )?),
            deadline: Duration::from_secs(parse_or(&get, "UPSTREAM_TIMEOUT_SECS", 30)?),
        };

        let cache = CacheConfig {
            sliding_expiry: Duration::from_secs(parse_or(&get, "CACHE_SLIDING_SECS", 1800)?),
            absolute_expiry: Duration::from_secs(parse_or(&get, "CACHE_ABSOLUTE_SECS", 3600)?),
            max_entries: parse_or(&get, "CACHE_MAX_ENTRIES", 10_000)?,
        };
        if cache.max_entries == 0 {
            anyhow::bail!("CACHE_MAX_ENTRIES must be at least 1");
        }

        let sweep_secs: u64 = parse_or(&get, "CACHE_SWEEP_INTERVAL_SECS", 300)?;
        let sweep_interval = (sweep_secs > 0).then(|| Duration::from_secs(sweep_secs));

        Ok(Self {
            port,
            frankfurter_base_url,
            public_base_url,
            retry,
            cache,
            sweep_interval,
            otlp_endpoint: get("OTEL_EXPORTER_OTLP_ENDPOINT"),
        })
    }

    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            cache: self.cache.clone(),
            public_base_url: self.public_base_url.clone(),
        }
    }
}

fn parse_or<T>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has invalid value {:?}", key, raw)),
        None => Ok(default),
    }
}
