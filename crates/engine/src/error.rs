//! Error types for cycle evaluation.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid order book for {pair}: {reason}")]
    InvalidBook { pair: String, reason: String },
}

pub type EngineResult<T> = Result<T, EngineError>;
