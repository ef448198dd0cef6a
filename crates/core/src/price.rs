//! Top-of-book market data.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Trade direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    pub fn opposite(self) -> Self {
        match self {
            TradeSide::Buy => TradeSide::Sell,
            TradeSide::Sell => TradeSide::Buy,
        }
    }

    /// Wire name used by the exchange (`BUY` / `SELL`).
    pub fn as_str(self) -> &'static str {
        match self {
            TradeSide::Buy => "BUY",
            TradeSide::Sell => "SELL",
        }
    }
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Best price level on one side of a book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookLevel {
    /// Price in quote coin per base coin.
    pub price: Decimal,
    /// Quantity available at this price, in base coin.
    pub size: Decimal,
}

impl BookLevel {
    pub fn new(price: Decimal, size: Decimal) -> Self {
        Self { price, size }
    }
}

/// Best bid/ask snapshot for a trading pair.
///
/// `buy` is the best resting BUY order (highest bid) and `sell` the best
/// resting SELL order (lowest ask).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBookTop {
    pub buy: BookLevel,
    pub sell: BookLevel,
}

impl OrderBookTop {
    pub fn new(buy: BookLevel, sell: BookLevel) -> Self {
        Self { buy, sell }
    }

    /// Arithmetic mean of best BUY and best SELL prices (unrounded).
    pub fn midpoint(&self) -> Decimal {
        (self.buy.price + self.sell.price) / Decimal::TWO
    }

    /// Quantity that can be taken by an order on `side`.
    ///
    /// A BUY order lifts resting SELL orders and vice versa.
    pub fn available_for(&self, side: TradeSide) -> Decimal {
        self.resting(side.opposite()).size
    }

    /// Best resting level on `side`.
    pub fn resting(&self, side: TradeSide) -> &BookLevel {
        match side {
            TradeSide::Buy => &self.buy,
            TradeSide::Sell => &self.sell,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn book() -> OrderBookTop {
        OrderBookTop::new(
            BookLevel::new(dec!(0.0500000000), dec!(3)),
            BookLevel::new(dec!(0.0510000000), dec!(7)),
        )
    }

    #[test]
    fn test_trade_side_wire_names() {
        assert_eq!(TradeSide::Buy.to_string(), "BUY");
        assert_eq!(TradeSide::Sell.as_str(), "SELL");
        assert_eq!(TradeSide::Buy.opposite(), TradeSide::Sell);
    }

    #[test]
    fn test_midpoint() {
        assert_eq!(book().midpoint(), dec!(0.0505));
    }

    #[test]
    fn test_available_for_takes_opposite_side() {
        let book = book();
        assert_eq!(book.available_for(TradeSide::Buy), dec!(7));
        assert_eq!(book.available_for(TradeSide::Sell), dec!(3));
    }
}
