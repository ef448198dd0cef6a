//! Coin and trading pair definitions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coin identifier as used by the exchange (e.g., "ETH", "BTC", "USDT").
///
/// Always stored upper-case so that lookups into the precision table and
/// pair symbols are insensitive to how the configuration spelled them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Coin(String);

impl Coin {
    /// Create a coin, normalizing to upper-case.
    pub fn new(symbol: &str) -> Self {
        Self(symbol.trim().to_uppercase())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Coin {
    fn from(symbol: String) -> Self {
        Self::new(&symbol)
    }
}

impl From<&str> for Coin {
    fn from(symbol: &str) -> Self {
        Self::new(symbol)
    }
}

impl From<Coin> for String {
    fn from(coin: Coin) -> Self {
        coin.0
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Trading pair representing base/quote coins on the exchange.
///
/// Prices on a pair are quoted in `quote` per one unit of `base`, and
/// order amounts are always expressed in `base`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TradingPair {
    /// Base coin (e.g., ETH in ETH-BTC)
    pub base: Coin,
    /// Quote coin (e.g., BTC in ETH-BTC)
    pub quote: Coin,
}

impl TradingPair {
    pub fn new(base: Coin, quote: Coin) -> Self {
        Self { base, quote }
    }

    /// Exchange symbol, e.g. `ETH-BTC`.
    pub fn symbol(&self) -> String {
        format!("{}-{}", self.base, self.quote)
    }
}

impl fmt::Display for TradingPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.base, self.quote)
    }
}

/// The three pairs traversed by one triangular cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrianglePairs {
    /// Pair Z: target priced in the buy coin.
    pub z: TradingPair,
    /// Pair Y: target priced in the sell coin.
    pub y: TradingPair,
    /// Pair L: buy coin priced in the sell coin.
    pub l: TradingPair,
}

impl TrianglePairs {
    /// Derive the three pairs from the configured coins.
    pub fn derive(target: &Coin, buy: &Coin, sell: &Coin) -> Self {
        Self {
            z: TradingPair::new(target.clone(), buy.clone()),
            y: TradingPair::new(target.clone(), sell.clone()),
            l: TradingPair::new(buy.clone(), sell.clone()),
        }
    }
}
