//! Integration tests for the Frankfurter client.
//!
//! A throwaway axum server on an ephemeral port stands in for the provider.
//! The `from` currency selects its behaviour:
//! - `USD` answers normally
//! - `XXX` answers 404
//! - `FLK` answers 503 twice, then succeeds
//! - `DWN` always answers 500
//! - `BAD` answers 200 with a malformed body
//! - `SLO` answers after a long pause

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use fx_types::{CurrencyCode, DateRange, RateError, RateProvider};
use fx_upstream::{FrankfurterClient, RetryPolicy};
use rust_decimal_macros::dec;
use serde_json::json;
use tokio::net::TcpListener;

#[derive(Default)]
struct Hits {
    by_code: std::sync::Mutex<HashMap<String, u32>>,
    total: AtomicU32,
}

impl Hits {
    fn record(&self, code: &str) -> u32 {
        self.total.fetch_add(1, Ordering::SeqCst);
        let mut map = self.by_code.lock().unwrap();
        let count = map.entry(code.to_string()).or_insert(0);
        *count += 1;
        *count
    }

    fn count(&self, code: &str) -> u32 {
        self.by_code.lock().unwrap().get(code).copied().unwrap_or(0)
    }
}

async fn scripted(code: &str, hits: &Hits, body: serde_json::Value) -> Response {
    let n = hits.record(code);
    match code {
        "XXX" => (StatusCode::NOT_FOUND, Json(json!({"message": "not found"}))).into_response(),
        "FLK" if n <= 2 => StatusCode::SERVICE_UNAVAILABLE.into_response(),
        "DWN" => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        "BAD" => (StatusCode::OK, "{\"rates\": [").into_response(),
        "SLO" => {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(body).into_response()
        }
        _ => Json(body).into_response(),
    }
}

async fn latest(
    State(hits): State<Arc<Hits>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let code = params.get("from").cloned().unwrap_or_default();
    let body = json!({
        "amount": 1.0,
        "base": code,
        "date": "2024-09-06",
        "rates": {"AUD": 1.4864, "BGN": 1.7615, "TRY": 33.99}
    });
    scripted(&code, &hits, body).await
}

async fn range(
    State(hits): State<Arc<Hits>>,
    Path(span): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let code = params.get("from").cloned().unwrap_or_default();
    let (start, end) = span.split_once("..").unwrap_or(("", ""));
    let body = json!({
        "amount": 1.0,
        "base": code,
        "start_date": start,
        "end_date": end,
        "rates": {
            start: {"AUD": 1.48784},
            end: {"AUD": 1.4864}
        }
    });
    scripted(&code, &hits, body).await
}

async fn spawn_provider() -> (String, Arc<Hits>) {
    let hits = Arc::new(Hits::default());
    let app = Router::new()
        .route("/latest", get(latest))
        .route("/{span}", get(range))
        .with_state(hits.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/", addr), hits)
}

fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_retries: 3,
        median_first_delay: Duration::from_millis(1),
        deadline: Duration::from_secs(5),
    }
}

fn code(s: &str) -> CurrencyCode {
    s.parse().unwrap()
}

#[tokio::test]
async fn test_latest_parses_snapshot() {
    let (url, hits) = spawn_provider().await;
    let client = FrankfurterClient::new(url).with_retry_policy(fast_retry());

    let snapshot = client.latest(&code("usd")).await.unwrap();

    assert_eq!(snapshot.base, code("USD"));
    assert_eq!(snapshot.as_of.to_string(), "2024-09-06");
    assert_eq!(snapshot.rates[&code("AUD")], dec!(1.4864));
    assert_eq!(hits.count("USD"), 1);
}

#[tokio::test]
async fn test_range_parses_series() {
    let (url, _hits) = spawn_provider().await;
    let client = FrankfurterClient::new(url).with_retry_policy(fast_retry());
    let window = DateRange::new(
        "2024-07-08".parse().unwrap(),
        "2024-07-10".parse().unwrap(),
    )
    .unwrap();

    let series = client.range(&code("USD"), window).await.unwrap();

    assert_eq!(series.start_date, window.start);
    assert_eq!(series.end_date, window.end);
    assert_eq!(series.len(), 2);
}

#[tokio::test]
async fn test_not_found_is_unknown_currency_without_retry() {
    let (url, hits) = spawn_provider().await;
    let client = FrankfurterClient::new(url).with_retry_policy(fast_retry());

    let result = client.latest(&code("XXX")).await;

    assert_eq!(result, Err(RateError::UnknownCurrency("XXX".into())));
    assert_eq!(hits.count("XXX"), 1);
}

#[tokio::test]
async fn test_transient_failures_are_retried() {
    let (url, hits) = spawn_provider().await;
    let client = FrankfurterClient::new(url).with_retry_policy(fast_retry());

    let snapshot = client.latest(&code("FLK")).await.unwrap();

    assert_eq!(snapshot.base, code("FLK"));
    assert_eq!(hits.count("FLK"), 3);
}

#[tokio::test]
async fn test_exhausted_retries_are_upstream_unavailable() {
    let (url, hits) = spawn_provider().await;
    let client = FrankfurterClient::new(url).with_retry_policy(fast_retry());

    let result = client.latest(&code("DWN")).await;

    assert!(matches!(result, Err(RateError::UpstreamUnavailable(_))));
    assert_eq!(hits.count("DWN"), 4);
}

#[tokio::test]
async fn test_malformed_body_is_upstream_unavailable() {
    let (url, hits) = spawn_provider().await;
    let client = FrankfurterClient::new(url).with_retry_policy(fast_retry());

    let result = client.latest(&code("BAD")).await;

    assert!(matches!(result, Err(RateError::UpstreamUnavailable(_))));
    assert_eq!(hits.count("BAD"), 1);
}

#[tokio::test]
async fn test_deadline_is_timeout() {
    let (url, _hits) = spawn_provider().await;
    let client = FrankfurterClient::new(url).with_retry_policy(RetryPolicy {
        deadline: Duration::from_millis(200),
        ..fast_retry()
    });

    let result = client.latest(&code("SLO")).await;

    assert_eq!(result, Err(RateError::Timeout));
}

#[tokio::test]
async fn test_connection_refused_is_upstream_unavailable() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = FrankfurterClient::new(format!("http://{}", addr)).with_retry_policy(fast_retry());
    let result = client.latest(&code("USD")).await;

    assert!(matches!(result, Err(RateError::UpstreamUnavailable(_))));
}
