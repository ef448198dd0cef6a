//! Error types for order submission.

use thiserror::Error;

/// Errors that can occur while submitting an order.
///
/// These never leave [`crate::OrderExecutor`]; they are folded into an
/// [`crate::OrderOutcome`] so the caller can log every leg the same way.
#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Order rejected: {0}")]
    Rejected(String),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Credentials unavailable: {0}")]
    Credentials(String),
}

impl From<reqwest::Error> for ExecutorError {
    fn from(err: reqwest::Error) -> Self {
        ExecutorError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for ExecutorError {
    fn from(err: serde_json::Error) -> Self {
        ExecutorError::Parse(err.to_string())
    }
}

/// Result type for executor operations.
pub type ExecutorResult<T> = Result<T, ExecutorError>;
