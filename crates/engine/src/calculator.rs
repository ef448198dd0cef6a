//! Triangular cycle calculator.
//!
//! Given top-of-book snapshots for pairs Z (target/buy), Y (target/sell)
//! and L (buy/sell), derives the three limit orders of one cycle and
//! decides whether the cycle is worth submitting.
//!
//! The calculation is pure. Every price and amount is rounded to the
//! precision of the coin it trades before the profitability test runs,
//! and the test itself rounds the cost side up and the proceeds side down.

use crate::{EngineError, EngineResult, FeeRate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;
use triangular_core::{
    ceil_round, floor_round, Coin, OrderBookTop, PrecisionRule, PrecisionTable, PriceStrategy,
    TradeSide, TradingPair, TrianglePairs,
};

/// Smallest percentage change (after rounding) that triggers execution.
pub const MIN_CHANGE_PERCENT: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Decimal places kept on the reported percentage change.
const CHANGE_PRECISION: u32 = 2;

/// Snapshots of the three books, taken at the same decision instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriangleBooks {
    pub z: OrderBookTop,
    pub y: OrderBookTop,
    pub l: OrderBookTop,
}

/// Precision rules for the coins traded by the cycle.
///
/// Legs Z and Y trade the target coin; leg L trades the buy coin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriangleRules {
    pub target: PrecisionRule,
    pub buy: PrecisionRule,
}

impl TriangleRules {
    /// Resolve rules from the table, falling back to default precision.
    pub fn resolve(table: &PrecisionTable, target: &Coin, buy: &Coin) -> Self {
        Self {
            target: table.rule_or_default(target),
            buy: table.rule_or_default(buy),
        }
    }
}

/// One limit order of a cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleLeg {
    pub pair: TradingPair,
    pub side: TradeSide,
    /// Limit price, already rounded.
    pub price: Decimal,
    /// Order amount in the pair's base coin, already rounded.
    pub amount: Decimal,
}

/// The three legs computed for one decision instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArbitrageCycle {
    /// Buy target with the buy coin.
    pub z: CycleLeg,
    /// Sell target for the sell coin.
    pub y: CycleLeg,
    /// Buy the buy coin back with the sell coin.
    pub l: CycleLeg,
}

impl ArbitrageCycle {
    pub fn legs(&self) -> [&CycleLeg; 3] {
        [&self.z, &self.y, &self.l]
    }
}

/// Outcome of evaluating one cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleEvaluation {
    pub cycle: ArbitrageCycle,
    /// Conservative cost of one target unit, in sell coin.
    pub left: Decimal,
    /// Conservative proceeds of one target unit, in sell coin.
    pub right: Decimal,
    /// `(right / left - 1) * 100`, truncated to two decimals.
    pub change: Decimal,
    /// Every leg meets its coin's minimum trade amount.
    pub amounts_valid: bool,
    /// Execution verdict.
    pub profitable: bool,
}

/// Pick a leg's limit price from the top of book and round it down.
pub fn select_price(book: &OrderBookTop, strategy: PriceStrategy, digits: u32) -> Decimal {
    let raw = match strategy {
        PriceStrategy::Midpoint => book.midpoint(),
        PriceStrategy::SellSide => book.sell.price,
        PriceStrategy::BuySide => book.buy.price,
    };
    floor_round(raw, digits)
}

fn check_book(pair: &TradingPair, book: &OrderBookTop) -> EngineResult<()> {
    let invalid = |reason: &str| EngineError::InvalidBook {
        pair: pair.symbol(),
        reason: reason.to_string(),
    };
    if book.buy.price <= Decimal::ZERO || book.sell.price <= Decimal::ZERO {
        return Err(invalid("non-positive price"));
    }
    if book.buy.size < Decimal::ZERO || book.sell.size < Decimal::ZERO {
        return Err(invalid("negative size"));
    }
    Ok(())
}

fn leg_price(
    pair: &TradingPair,
    book: &OrderBookTop,
    strategy: PriceStrategy,
    digits: u32,
) -> EngineResult<Decimal> {
    let price = select_price(book, strategy, digits);
    if price.is_zero() {
        return Err(EngineError::InvalidBook {
            pair: pair.symbol(),
            reason: format!("price rounds to zero at {} digits", digits),
        });
    }
    Ok(price)
}

/// Pure evaluator for triangular cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArbitrageCalculator {
    fee: FeeRate,
    strategy: PriceStrategy,
}

impl ArbitrageCalculator {
    pub fn new(fee: FeeRate, strategy: PriceStrategy) -> Self {
        Self { fee, strategy }
    }

    /// Evaluate one cycle routing `input_amount` of the target coin.
    pub fn evaluate(
        &self,
        pairs: &TrianglePairs,
        books: &TriangleBooks,
        rules: &TriangleRules,
        input_amount: Decimal,
    ) -> EngineResult<CycleEvaluation> {
        check_book(&pairs.z, &books.z)?;
        check_book(&pairs.y, &books.y)?;
        check_book(&pairs.l, &books.l)?;

        let target = rules.target;
        let buy = rules.buy;

        let z_price = leg_price(&pairs.z, &books.z, self.strategy, target.price_precision)?;
        let y_price = leg_price(&pairs.y, &books.y, self.strategy, target.price_precision)?;
        let l_price = leg_price(&pairs.l, &books.l, self.strategy, buy.price_precision)?;

        let one_fee = self.fee.gross_one_leg();
        let two_fees = self.fee.gross_two_legs();

        let mut input = target.round_amount(input_amount);

        // Leg Z: buy enough target to cover the fee on top of the input.
        let mut z_amount = target.round_amount(input * one_fee);
        let z_cap = target.round_amount(books.z.available_for(TradeSide::Buy));
        if z_amount > z_cap {
            debug!("{} BUY {} capped at {}", pairs.z, z_amount, z_cap);
            z_amount = z_cap;
            input = target.round_amount(z_amount / one_fee);
        }

        // Leg Y: sell the input itself.
        let mut y_amount = input;
        let y_cap = target.round_amount(books.y.available_for(TradeSide::Sell));
        if y_amount > y_cap {
            debug!("{} SELL {} capped at {}", pairs.y, y_amount, y_cap);
            y_amount = y_cap;
            input = y_amount;
            z_amount = target.round_amount(input * one_fee);
        }

        // Leg L: buy back the buy coin spent on Z, fees on two legs.
        let l_factor = z_price * two_fees;
        let mut l_amount = buy.round_amount(input * l_factor);
        let l_cap = buy.round_amount(books.l.available_for(TradeSide::Buy));
        if l_amount > l_cap {
            debug!("{} BUY {} capped at {}", pairs.l, l_amount, l_cap);
            l_amount = l_cap;
            input = target.round_amount(l_amount / l_factor);
            y_amount = input;
            z_amount = target.round_amount(input * one_fee);
        }

        let amounts_valid = target.accepts_amount(z_amount)
            && target.accepts_amount(y_amount)
            && buy.accepts_amount(l_amount);

        // Cost side: Z*L plus the two fee-weighted cross terms plus the f^2 term.
        let f = self.fee.rate();
        let product = z_price * l_price;
        let cost = product + Decimal::TWO * f * product + f * f * product;
        let left = ceil_round(cost, target.price_precision.min(buy.price_precision));
        let right = floor_round(y_price * self.fee.net_one_leg(), target.price_precision);

        let ratio = right
            .checked_div(left)
            .ok_or_else(|| EngineError::InvalidBook {
                pair: pairs.l.symbol(),
                reason: "cost rounds to zero".to_string(),
            })?;
        let change = floor_round((ratio - Decimal::ONE) * Decimal::ONE_HUNDRED, CHANGE_PRECISION);

        let profitable = amounts_valid && left < right && change >= MIN_CHANGE_PERCENT;
        if !amounts_valid {
            debug!(
                "Below minimum trade amount: Z {} Y {} L {}",
                z_amount, y_amount, l_amount
            );
        }

        Ok(CycleEvaluation {
            cycle: ArbitrageCycle {
                z: CycleLeg {
                    pair: pairs.z.clone(),
                    side: TradeSide::Buy,
                    price: z_price,
                    amount: z_amount,
                },
                y: CycleLeg {
                    pair: pairs.y.clone(),
                    side: TradeSide::Sell,
                    price: y_price,
                    amount: y_amount,
                },
                l: CycleLeg {
                    pair: pairs.l.clone(),
                    side: TradeSide::Buy,
                    price: l_price,
                    amount: l_amount,
                },
            },
            left,
            right,
            change,
            amounts_valid,
            profitable,
        })
    }
}
