//! Core data types for the triangular arbitrage bot.

pub mod asset;
pub mod error;
pub mod execution;
pub mod precision;
pub mod price;

pub use asset::*;
pub use error::*;
pub use execution::*;
pub use precision::*;
pub use price::*;
