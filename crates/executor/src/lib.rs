//! Order execution for arbitrage cycles.
//!
//! This crate signs and submits limit orders to the exchange and folds
//! every submission result into an [`OrderOutcome`].

pub mod auth;
pub mod cex;
pub mod error;
pub mod order;

pub use auth::*;
pub use cex::*;
pub use error::*;
pub use order::*;
