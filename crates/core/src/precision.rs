//! Exchange precision rules and decimal rounding.
//!
//! Every price and amount that reaches the exchange goes through
//! [`floor_round`] or [`ceil_round`] first, so what the profitability test
//! sees is byte-for-byte what gets signed and submitted.

use crate::{Coin, CoreError, CoreResult};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

/// Price digits used when a coin has no precision rule.
pub const DEFAULT_PRICE_PRECISION: u32 = 8;
/// Amount digits used when a coin has no precision rule.
pub const DEFAULT_AMOUNT_PRECISION: u32 = 6;

/// Truncate toward zero at `digits` decimal places.
///
/// The result always carries exactly `digits` decimals in its textual form.
pub fn floor_round(value: Decimal, digits: u32) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(digits, RoundingStrategy::ToZero);
    rounded.rescale(digits);
    rounded
}

/// Round away from zero at `digits` decimal places.
pub fn ceil_round(value: Decimal, digits: u32) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(digits, RoundingStrategy::AwayFromZero);
    rounded.rescale(digits);
    rounded
}

/// Per-coin trading limits published by the exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrecisionRule {
    /// Smallest amount accepted for an order in this coin.
    #[serde(default)]
    pub min_amount: Decimal,
    /// Decimal places for prices of pairs based on this coin.
    #[serde(default = "default_price_precision")]
    pub price_precision: u32,
    /// Decimal places for amounts of this coin.
    #[serde(default = "default_amount_precision")]
    pub amount_precision: u32,
}

fn default_price_precision() -> u32 {
    DEFAULT_PRICE_PRECISION
}

fn default_amount_precision() -> u32 {
    DEFAULT_AMOUNT_PRECISION
}

impl Default for PrecisionRule {
    fn default() -> Self {
        Self {
            min_amount: Decimal::ZERO,
            price_precision: DEFAULT_PRICE_PRECISION,
            amount_precision: DEFAULT_AMOUNT_PRECISION,
        }
    }
}

impl PrecisionRule {
    pub fn new(min_amount: Decimal, price_precision: u32, amount_precision: u32) -> Self {
        Self {
            min_amount,
            price_precision,
            amount_precision,
        }
    }

    #[inline]
    pub fn round_price(&self, price: Decimal) -> Decimal {
        floor_round(price, self.price_precision)
    }

    #[inline]
    pub fn round_amount(&self, amount: Decimal) -> Decimal {
        floor_round(amount, self.amount_precision)
    }

    /// Whether `amount` is a tradable order size for this coin.
    pub fn accepts_amount(&self, amount: Decimal) -> bool {
        amount > Decimal::ZERO && amount >= self.min_amount
    }
}

/// Precision rules for every known coin, loaded once at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrecisionTable {
    rules: HashMap<Coin, PrecisionRule>,
}

impl PrecisionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a table from JSON: `{"ETH": {"minAmount": 0.001, ...}, ...}`.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        serde_json::from_str(json).map_err(|e| CoreError::InvalidConfig(e.to_string()))
    }

    pub fn insert(&mut self, coin: Coin, rule: PrecisionRule) {
        self.rules.insert(coin, rule);
    }

    pub fn with_rule(mut self, coin: &str, rule: PrecisionRule) -> Self {
        self.insert(Coin::new(coin), rule);
        self
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Look up the rule for a coin.
    pub fn get(&self, coin: &Coin) -> CoreResult<&PrecisionRule> {
        self.rules
            .get(coin)
            .ok_or_else(|| CoreError::MissingPrecisionRule(coin.to_string()))
    }

    /// Look up the rule for a coin, falling back to default precision.
    pub fn rule_or_default(&self, coin: &Coin) -> PrecisionRule {
        match self.get(coin) {
            Ok(rule) => *rule,
            Err(e) => {
                warn!("{}, using default precision", e);
                PrecisionRule::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_floor_round_truncates() {
        assert_eq!(floor_round(dec!(1.0019999), 6), dec!(1.001999));
        assert_eq!(floor_round(dec!(-1.0019999), 6), dec!(-1.001999));
        assert_eq!(floor_round(dec!(0.4995004995), 6).to_string(), "0.499500");
    }

    #[test]
    fn test_ceil_round_rounds_up() {
        assert_eq!(ceil_round(dec!(3006.003), 2), dec!(3006.01));
        assert_eq!(ceil_round(dec!(-3006.003), 2), dec!(-3006.01));
        assert_eq!(ceil_round(dec!(3006.00), 2), dec!(3006));
    }

    #[test]
    fn test_rounding_bounds() {
        let values = [dec!(0.123456789), dec!(42), dec!(0.0000001), dec!(99999.99999999)];
        for v in values {
            for d in [0, 2, 6, 8] {
                assert!(floor_round(v, d) <= v);
                assert!(ceil_round(v, d) >= v);
            }
        }
    }

    #[test]
    fn test_rounding_idempotent() {
        let v = dec!(0.0505123456789);
        let once = floor_round(v, 8);
        assert_eq!(floor_round(once, 8), once);
        assert_eq!(floor_round(once, 8).to_string(), once.to_string());

        let once = ceil_round(v, 4);
        assert_eq!(ceil_round(once, 4), once);
    }

    #[test]
    fn test_rounding_pads_scale() {
        assert_eq!(floor_round(dec!(0.0505), 8).to_string(), "0.05050000");
        assert_eq!(floor_round(dec!(1.001), 6).to_string(), "1.001000");
    }

    #[test]
    fn test_rule_accepts_amount() {
        let rule = PrecisionRule::new(dec!(0.001), 8, 6);
        assert!(rule.accepts_amount(dec!(0.001)));
        assert!(rule.accepts_amount(dec!(1)));
        assert!(!rule.accepts_amount(dec!(0.0009)));
        assert!(!PrecisionRule::default().accepts_amount(Decimal::ZERO));
    }

    #[test]
    fn test_table_from_json() {
        let table = PrecisionTable::from_json(
            r#"{"eth": {"minAmount": 0.001, "pricePrecision": 8, "amountPrecision": 6},
                "KCS": {"minAmount": 1}}"#,
        )
        .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.get(&Coin::new("ETH")).unwrap(),
            &PrecisionRule::new(dec!(0.001), 8, 6)
        );
        let kcs = table.get(&Coin::new("KCS")).unwrap();
        assert_eq!(kcs.price_precision, DEFAULT_PRICE_PRECISION);
        assert_eq!(kcs.amount_precision, DEFAULT_AMOUNT_PRECISION);
    }

    #[test]
    fn test_table_missing_rule_falls_back() {
        let table = PrecisionTable::new();
        assert!(matches!(
            table.get(&Coin::new("XYZ")),
            Err(CoreError::MissingPrecisionRule(_))
        ));
        assert_eq!(table.rule_or_default(&Coin::new("XYZ")), PrecisionRule::default());
    }

    #[test]
    fn test_table_invalid_json() {
        assert!(PrecisionTable::from_json("[1, 2]").is_err());
    }
}
