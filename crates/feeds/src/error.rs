//! Error types for market data operations.

use thiserror::Error;

/// Errors that can occur while reading public market data.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Fetch failed: {0}")]
    Fetch(String),

    #[error("Failed to parse response: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for FeedError {
    fn from(err: serde_json::Error) -> Self {
        FeedError::Parse(err.to_string())
    }
}

/// Result type for feed operations.
pub type FeedResult<T> = Result<T, FeedError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_error_is_parse() {
        let err: FeedError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, FeedError::Parse(_)));
    }
}
