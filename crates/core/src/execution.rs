//! Run configuration for the arbitrage loop.

use crate::{Coin, CoreError, CoreResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How a leg's limit price is picked from the top of book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum PriceStrategy {
    /// Use the best SELL price (flag `-1`).
    SellSide,
    /// Use the mean of best BUY and best SELL (flag `0`).
    Midpoint,
    /// Use the best BUY price (any other flag).
    #[default]
    BuySide,
}

impl From<i64> for PriceStrategy {
    fn from(flag: i64) -> Self {
        match flag {
            -1 => PriceStrategy::SellSide,
            0 => PriceStrategy::Midpoint,
            _ => PriceStrategy::BuySide,
        }
    }
}

impl From<PriceStrategy> for i64 {
    fn from(strategy: PriceStrategy) -> Self {
        match strategy {
            PriceStrategy::SellSide => -1,
            PriceStrategy::Midpoint => 0,
            PriceStrategy::BuySide => 1,
        }
    }
}

/// One entry of the coin rotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetEntry {
    /// Target coin routed through the triangle.
    pub coin: Coin,
    /// Input amount of the target coin per cycle.
    pub amount: Decimal,
}

impl TargetEntry {
    pub fn new(coin: &str, amount: Decimal) -> Self {
        Self {
            coin: Coin::new(coin),
            amount,
        }
    }
}

/// Everything the loop needs to know for one process run.
///
/// Built once before the loop starts and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunConfiguration {
    /// Coins to rotate through, in order.
    pub target_pair: Vec<TargetEntry>,
    /// Intermediary the target is bought with.
    pub buy_coin: Coin,
    /// Intermediary the target is sold for.
    pub sell_coin: Coin,
    /// Exchange fee in percent per leg (e.g. `0.1` for 0.1%).
    pub fee: Decimal,
    #[serde(default)]
    pub strategy: PriceStrategy,
}

impl Default for RunConfiguration {
    fn default() -> Self {
        Self {
            target_pair: vec![
                TargetEntry::new("ETH", Decimal::ONE),
                TargetEntry::new("KCS", Decimal::TEN),
            ],
            buy_coin: Coin::new("BTC"),
            sell_coin: Coin::new("USDT"),
            fee: Decimal::new(1, 1),
            strategy: PriceStrategy::BuySide,
        }
    }
}

impl RunConfiguration {
    /// Parse a configuration from JSON and validate it.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| CoreError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants the loop relies on.
    pub fn validate(&self) -> CoreResult<()> {
        if self.target_pair.is_empty() {
            return Err(CoreError::InvalidConfig("targetPair is empty".to_string()));
        }
        if self.buy_coin == self.sell_coin {
            return Err(CoreError::InvalidConfig(format!(
                "buyCoin and sellCoin are both {}",
                self.buy_coin
            )));
        }
        if self.fee < Decimal::ZERO || self.fee >= Decimal::ONE_HUNDRED {
            return Err(CoreError::InvalidConfig(format!(
                "fee {} is outside [0, 100)",
                self.fee
            )));
        }
        for entry in &self.target_pair {
            if entry.amount <= Decimal::ZERO {
                return Err(CoreError::InvalidConfig(format!(
                    "amount for {} must be positive",
                    entry.coin
                )));
            }
            if entry.coin == self.buy_coin || entry.coin == self.sell_coin {
                return Err(CoreError::InvalidConfig(format!(
                    "target {} repeats an intermediary coin",
                    entry.coin
                )));
            }
        }
        Ok(())
    }

    /// Fee as a fraction (`fee / 100`).
    pub fn fee_rate(&self) -> Decimal {
        self.fee / Decimal::ONE_HUNDRED
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_strategy_from_flag() {
        assert_eq!(PriceStrategy::from(-1), PriceStrategy::SellSide);
        assert_eq!(PriceStrategy::from(0), PriceStrategy::Midpoint);
        assert_eq!(PriceStrategy::from(1), PriceStrategy::BuySide);
        assert_eq!(PriceStrategy::from(7), PriceStrategy::BuySide);
        assert_eq!(i64::from(PriceStrategy::SellSide), -1);
    }

    #[test]
    fn test_config_from_json() {
        let config = RunConfiguration::from_json(
            r#"{
                "targetPair": [{"coin": "eth", "amount": 1}, {"coin": "NEO", "amount": 0.5}],
                "buyCoin": "BTC",
                "sellCoin": "USDT",
                "fee": 0.1,
                "strategy": 0
            }"#,
        )
        .unwrap();
        assert_eq!(config.target_pair.len(), 2);
        assert_eq!(config.target_pair[0], TargetEntry::new("ETH", dec!(1)));
        assert_eq!(config.target_pair[1].amount, dec!(0.5));
        assert_eq!(config.fee, dec!(0.1));
        assert_eq!(config.fee_rate(), dec!(0.001));
        assert_eq!(config.strategy, PriceStrategy::Midpoint);
    }

    #[test]
    fn test_config_strategy_defaults() {
        let config = RunConfiguration::from_json(
            r#"{"targetPair": [{"coin": "ETH", "amount": 1}],
                "buyCoin": "BTC", "sellCoin": "USDT", "fee": 0.1}"#,
        )
        .unwrap();
        assert_eq!(config.strategy, PriceStrategy::BuySide);
    }

    #[test]
    fn test_config_default_is_valid() {
        let config = RunConfiguration::default();
        assert!(config.validate().is_ok());
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"targetPair\""));
        assert_eq!(RunConfiguration::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_config_rejects_invalid() {
        let mut config = RunConfiguration::default();
        config.target_pair.clear();
        assert!(config.validate().is_err());

        let mut config = RunConfiguration::default();
        config.sell_coin = config.buy_coin.clone();
        assert!(config.validate().is_err());

        let mut config = RunConfiguration::default();
        config.target_pair[0].amount = Decimal::ZERO;
        assert!(config.validate().is_err());

        let mut config = RunConfiguration::default();
        config.target_pair[0].coin = Coin::new("BTC");
        assert!(config.validate().is_err());

        let mut config = RunConfiguration::default();
        config.fee = dec!(-0.1);
        assert!(config.validate().is_err());
    }
}
