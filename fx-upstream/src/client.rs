//! HTTP client for the Frankfurter rate API.

use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use fx_types::{CurrencyCode, DateRange, HistoricalSeries, RateError, RateProvider, RateSnapshot};

use crate::error::UpstreamError;
use crate::retry::RetryPolicy;
use crate::wire::{LatestResponse, RangeResponse};

/// Default public Frankfurter endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.frankfurter.app/";

/// Rate provider backed by the Frankfurter API.
///
/// Every request goes through the configured [`RetryPolicy`].
pub struct FrankfurterClient {
    base_url: String,
    http: reqwest::Client,
    retry: RetryPolicy,
}

impl FrankfurterClient {
    /// Creates a client with the default retry policy.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::builder()
                .user_agent(concat!("fx-gateway/", env!("CARGO_PKG_VERSION")))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            retry: RetryPolicy::default(),
        }
    }

    /// Sets the retry policy.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, UpstreamError> {
        self.retry
            .execute(move || async move {
                let resp = self.http.get(url).send().await?;
                let status = resp.status();
                if !status.is_success() {
                    return Err(UpstreamError::Status(status.as_u16()));
                }
                let body = resp.text().await?;
                serde_json::from_str(&body).map_err(|e| UpstreamError::Decode(e.to_string()))
            })
            .await
    }
}

/// Maps a failed upstream call for `base` onto the core taxonomy.
fn rate_error(err: UpstreamError, base: &CurrencyCode) -> RateError {
    match err {
        UpstreamError::Status(404) => RateError::UnknownCurrency(base.to_string()),
        UpstreamError::DeadlineExceeded => RateError::Timeout,
        other => RateError::UpstreamUnavailable(format!("{} ({})", other, base)),
    }
}

#[async_trait::async_trait]
impl RateProvider for FrankfurterClient {
    #[instrument(skip(self, base), fields(base = %base))]
    async fn latest(&self, base: &CurrencyCode) -> Result<RateSnapshot, RateError> {
        let url = format!("{}/latest?from={}", self.base_url, base);
        let resp: LatestResponse = self
            .get_json(&url)
            .await
            .map_err(|e| rate_error(e, base))?;

        debug!(date = %resp.date, rates = resp.rates.len(), "Fetched latest rates");
        Ok(resp.into())
    }

    #[instrument(skip(self, base, range), fields(base = %base, start = %range.start, end = %range.end))]
    async fn range(
        &self,
        base: &CurrencyCode,
        range: DateRange,
    ) -> Result<HistoricalSeries, RateError> {
        let url = format!(
            "{}/{}..{}?from={}",
            self.base_url, range.start, range.end, base
        );
        let resp: RangeResponse = self
            .get_json(&url)
            .await
            .map_err(|e| rate_error(e, base))?;

        debug!(days = resp.rates.len(), "Fetched historical rates");
        Ok(resp.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_with_trailing_slash() {
        let client = FrankfurterClient::new(DEFAULT_BASE_URL);
        assert_eq!(client.base_url, "https://api.frankfurter.app");
    }

    #[test]
    fn test_error_mapping() {
        let usd: CurrencyCode = "USD".parse().unwrap();

        assert_eq!(
            rate_error(UpstreamError::Status(404), &usd),
            RateError::UnknownCurrency("USD".into())
        );
        assert_eq!(
            rate_error(UpstreamError::DeadlineExceeded, &usd),
            RateError::Timeout
        );
        assert!(matches!(
            rate_error(UpstreamError::Status(502), &usd),
            RateError::UpstreamUnavailable(_)
        ));
        assert!(matches!(
            rate_error(UpstreamError::Decode("eof".into()), &usd),
            RateError::UpstreamUnavailable(_)
        ));
    }
}
