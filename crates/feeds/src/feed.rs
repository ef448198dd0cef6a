//! Market data source abstraction.

use crate::FeedResult;
use async_trait::async_trait;
use triangular_core::{OrderBookTop, TradingPair};

/// Source of top-of-book snapshots.
///
/// Implementations are read-only and safe to retry; callers decide whether
/// to do so.
#[async_trait]
pub trait MarketDataFetcher: Send + Sync {
    /// Fetch the best BUY and best SELL level for `pair`.
    async fn fetch_top(&self, pair: &TradingPair) -> FeedResult<OrderBookTop>;
}
