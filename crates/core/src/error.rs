//! Error types for configuration and reference data.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("No precision rule for {0}")]
    MissingPrecisionRule(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
