//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use utoipa::OpenApi;

use fx_types::{AppError, ConvertQuery, HistoricalQuery, HistoricalRatesResponse, RateProvider};

use super::validation;
use crate::RateService;
use crate::openapi::ApiDoc;

/// Application state shared across handlers.
pub struct AppState<P: RateProvider> {
    pub service: RateService<P>,
}

/// Wrapper to implement IntoResponse for AppError (orphan rule workaround).
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl From<fx_types::RateError> for ApiError {
    fn from(err: fx_types::RateError) -> Self {
        ApiError(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Timeout(msg) => (StatusCode::REQUEST_TIMEOUT, msg.clone()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        tracing::error!(status = status.as_u16(), "Request failed: {}", message);

        let body = serde_json::json!({
            "error": message,
            "code": status.as_u16()
        });

        (status, Json(body)).into_response()
    }
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// Latest rates for a base currency.
#[tracing::instrument(skip(state))]
pub async fn exchange_rates<P: RateProvider>(
    State(state): State<Arc<AppState<P>>>,
    Path(currency): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let base = validation::parse_currency(&currency)?;
    let snapshot = state.service.lookup(&base).await?;
    Ok(Json(snapshot.as_ref().clone()))
}

/// Convert an amount into one or every convertible currency.
#[tracing::instrument(skip(state))]
pub async fn convert<P: RateProvider>(
    State(state): State<Arc<AppState<P>>>,
    Query(query): Query<ConvertQuery>,
) -> Result<impl IntoResponse, ApiError> {
    validation::check_amount(query.amount)?;
    let from = validation::parse_convertible_currency(&query.from)?;
    let to = query
        .to
        .as_deref()
        .map(validation::parse_convertible_currency)
        .transpose()?;

    let result = state
        .service
        .convert(query.amount, &from, to.as_ref())
        .await?;
    Ok(Json(result))
}

/// One page of historical rates.
#[tracing::instrument(skip(state))]
pub async fn historical_rates<P: RateProvider>(
    State(state): State<Arc<AppState<P>>>,
    Path(currency): Path<String>,
    Query(query): Query<HistoricalQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let base = validation::parse_currency(&currency)?;
    let today = Utc::now().date_naive();
    let from = validation::parse_from_date(&query.from_date, today)?;
    let to = validation::parse_to_date(&query.to_date, today)?;
    validation::check_paging(query.page_size, query.page)?;

    let page = state
        .service
        .historical(&base, from, to, query.page_size, query.page)
        .await?;
    Ok(Json(HistoricalRatesResponse::from(page)))
}

/// Machine-readable API description.
pub async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
