//! Error types for the FX gateway.

use chrono::NaiveDate;

use crate::domain::ParseCurrencyError;

/// Core errors produced by the rate engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RateError {
    #[error("fromDate {from} should be earlier than toDate {to}")]
    InvalidRange { from: NaiveDate, to: NaiveDate },

    #[error("Currency code {0} is not supported")]
    UnknownCurrency(String),

    #[error("Rate provider unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Request to the rate provider timed out")]
    Timeout,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Application-level errors (for HTTP responses).
///
/// Maps cleanly to HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<RateError> for AppError {
    fn from(err: RateError) -> Self {
        match err {
            RateError::InvalidRange { .. } | RateError::UnknownCurrency(_) => {
                AppError::BadRequest(err.to_string())
            }
            RateError::Timeout => AppError::Timeout("The request to the server timed out.".into()),
            RateError::UpstreamUnavailable(_) | RateError::Internal(_) => {
                AppError::Internal(err.to_string())
            }
        }
    }
}

impl From<ParseCurrencyError> for AppError {
    fn from(err: ParseCurrencyError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_map_to_bad_request() {
        let from: NaiveDate = "2024-02-01".parse().unwrap();
        let err: AppError = RateError::InvalidRange { from, to: from }.into();
        assert!(matches!(err, AppError::BadRequest(_)));

        let err: AppError = RateError::UnknownCurrency("XYZ".into()).into();
        assert!(matches!(err, AppError::BadRequest(msg) if msg.contains("XYZ")));
    }

    #[test]
    fn test_timeout_maps_to_timeout() {
        let err: AppError = RateError::Timeout.into();
        assert!(matches!(err, AppError::Timeout(_)));
    }

    #[test]
    fn test_upstream_failures_map_to_internal() {
        let err: AppError = RateError::UpstreamUnavailable("503".into()).into();
        assert!(matches!(err, AppError::Internal(_)));
        let err: AppError = RateError::Internal("bug".into()).into();
        assert!(matches!(err, AppError::Internal(_)));
    }
}
