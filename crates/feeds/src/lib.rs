//! Public market data collection from the exchange.
//!
//! - `feed` - the `MarketDataFetcher` seam the arbitrage loop depends on
//! - `rest` - REST implementation reading the open-orders endpoint

pub mod error;
pub mod feed;
pub mod rest;

pub use error::*;
pub use feed::*;
pub use rest::*;
