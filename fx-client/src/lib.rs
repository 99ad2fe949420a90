//! # FX Client SDK
//!
//! A typed Rust client for the FX gateway API.

use chrono::NaiveDate;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;

use fx_types::{ConversionResult, CurrencyCode, HistoricalRatesResponse, RateSnapshot};

/// Error type for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// FX gateway API client.
pub struct FxClient {
    base_url: String,
    http: Client,
}

impl FxClient {
    /// Creates a new client.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    /// Checks if the API is healthy.
    pub async fn health(&self) -> Result<bool, ClientError> {
        let resp = self
            .http
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        Ok(resp.status().is_success())
    }

    /// Latest rates for `base`.
    pub async fn exchange_rates(&self, base: &CurrencyCode) -> Result<RateSnapshot, ClientError> {
        self.get(&format!("/api/exchange-rates/{}", base), &[]).await
    }

    /// Converts `amount` of `from` into `to`, or into every convertible
    /// currency when `to` is `None`.
    pub async fn convert(
        &self,
        amount: Decimal,
        from: &CurrencyCode,
        to: Option<&CurrencyCode>,
    ) -> Result<ConversionResult, ClientError> {
        let mut query = vec![
            ("amount", amount.to_string()),
            ("from", from.to_string()),
        ];
        if let Some(to) = to {
            query.push(("to", to.to_string()));
        }
        self.get("/api/convert", &query).await
    }

    /// One page of historical rates.
    pub async fn historical_rates(
        &self,
        base: &CurrencyCode,
        from: NaiveDate,
        to: NaiveDate,
        page_size: u32,
        page: u32,
    ) -> Result<HistoricalRatesResponse, ClientError> {
        let query = [
            ("from_date", from.to_string()),
            ("to_date", to.to_string()),
            ("page_size", page_size.to_string()),
            ("page", page.to_string()),
        ];
        self.get(&format!("/api/historical-rates/{}", base), &query)
            .await
    }

    /// Fetches the page after `page`, or `None` on the last page.
    ///
    /// Follows the server-provided link as-is.
    pub async fn follow_next(
        &self,
        page: &HistoricalRatesResponse,
    ) -> Result<Option<HistoricalRatesResponse>, ClientError> {
        let Some(url) = &page.next_page_url else {
            return Ok(None);
        };
        let resp = self.http.get(url).send().await?;
        self.handle_response(resp).await.map(Some)
    }

    /// Every page of a historical query, merged into the first page.
    pub async fn historical_rates_all(
        &self,
        base: &CurrencyCode,
        from: NaiveDate,
        to: NaiveDate,
        page_size: u32,
    ) -> Result<HistoricalRatesResponse, ClientError> {
        let mut merged = self.historical_rates(base, from, to, page_size, 1).await?;
        let mut current = merged.clone();
        while let Some(next) = self.follow_next(&current).await? {
            merged.rates.extend(next.rates.clone());
            current = next;
        }
        merged.next_page_url = None;
        merged.current_page = current.current_page;
        Ok(merged)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ClientError> {
        let resp = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .query(query)
            .send()
            .await?;
        self.handle_response(resp).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            Ok(serde_json::from_str(&body)?)
        } else {
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
                .unwrap_or(body);
            Err(ClientError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}
