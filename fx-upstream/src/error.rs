//! Transport-level errors for calls to the rate provider.

/// Failure of a single upstream call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UpstreamError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("upstream returned HTTP {0}")]
    Status(u16),

    #[error("unparseable upstream body: {0}")]
    Decode(String),

    #[error("upstream deadline exceeded")]
    DeadlineExceeded,
}

impl UpstreamError {
    /// Connection failures, 5xx and 429 are worth another attempt.
    pub fn is_transient(&self) -> bool {
        match self {
            UpstreamError::Transport(_) => true,
            UpstreamError::Status(status) => *status == 429 || (500..=599).contains(status),
            UpstreamError::Decode(_) | UpstreamError::DeadlineExceeded => false,
        }
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            UpstreamError::Decode(err.to_string())
        } else {
            UpstreamError::Transport(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(UpstreamError::Transport("connection refused".into()).is_transient());
        assert!(UpstreamError::Status(429).is_transient());
        assert!(UpstreamError::Status(500).is_transient());
        assert!(UpstreamError::Status(503).is_transient());
        assert!(!UpstreamError::Status(404).is_transient());
        assert!(!UpstreamError::Status(422).is_transient());
        assert!(!UpstreamError::Decode("eof".into()).is_transient());
        assert!(!UpstreamError::DeadlineExceeded.is_transient());
    }
}
