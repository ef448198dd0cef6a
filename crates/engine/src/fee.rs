//! Fee arithmetic for the three legs of a cycle.
//!
//! The exchange charges the same percentage on every leg, so all fee
//! adjustments reduce to powers of `1 + f` and `1 - f` with `f = fee / 100`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Per-leg trading fee expressed as a fraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeRate(Decimal);

impl FeeRate {
    /// Create from a percentage (`0.1` means 0.1%).
    pub fn from_percent(percent: Decimal) -> Self {
        Self(percent / Decimal::ONE_HUNDRED)
    }

    /// The fraction `f`.
    #[inline]
    pub fn rate(self) -> Decimal {
        self.0
    }

    /// `1 + f`: gross-up for paying the fee once.
    #[inline]
    pub fn gross_one_leg(self) -> Decimal {
        Decimal::ONE + self.0
    }

    /// `(1 + f)^2 = 1 + 2f + f^2`: gross-up for paying the fee on two legs.
    #[inline]
    pub fn gross_two_legs(self) -> Decimal {
        Decimal::ONE + Decimal::TWO * self.0 + self.0 * self.0
    }

    /// `1 - f`: proceeds left after one fee deduction.
    #[inline]
    pub fn net_one_leg(self) -> Decimal {
        Decimal::ONE - self.0
    }
}

impl Default for FeeRate {
    fn default() -> Self {
        // 0.1%
        Self::from_percent(Decimal::new(1, 1))
    }
}
