//! Limit orders and their normalized outcomes.

use crate::{ExecutorError, ExecutorResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use triangular_core::{TradeSide, TradingPair};
use triangular_engine::CycleLeg;

/// A limit order ready to be signed and submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitOrder {
    pub pair: TradingPair,
    pub side: TradeSide,
    /// Amount in the pair's base coin, already rounded.
    pub amount: Decimal,
    /// Limit price in the quote coin, already rounded.
    pub price: Decimal,
}

impl LimitOrder {
    pub fn new(pair: TradingPair, side: TradeSide, amount: Decimal, price: Decimal) -> Self {
        Self {
            pair,
            side,
            amount,
            price,
        }
    }

    /// Private order endpoint path for this order's pair.
    pub fn endpoint(&self) -> String {
        format!("/v1/{}/order", self.pair.symbol())
    }

    /// Form parameters, in the order used for signing.
    pub fn form_params(&self) -> [(&'static str, String); 3] {
        [
            ("amount", self.amount.to_string()),
            ("price", self.price.to_string()),
            ("type", self.side.as_str().to_string()),
        ]
    }
}

impl From<&CycleLeg> for LimitOrder {
    fn from(leg: &CycleLeg) -> Self {
        Self::new(leg.pair.clone(), leg.side, leg.amount, leg.price)
    }
}

impl fmt::Display for LimitOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} {} {}",
            self.side,
            self.pair.symbol(),
            self.price,
            self.amount
        )
    }
}

/// What came back from one order submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderOutcome {
    /// The exchange answered; `success` is its own flag.
    Acknowledged {
        success: bool,
        code: String,
        order_id: Option<String>,
    },
    /// Transport, parse or credential failure before an answer was read.
    Failed { message: String },
}

impl OrderOutcome {
    pub fn failed(err: &ExecutorError) -> Self {
        OrderOutcome::Failed {
            message: err.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, OrderOutcome::Acknowledged { success: true, .. })
    }
}

impl fmt::Display for OrderOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderOutcome::Acknowledged { success, code, .. } => write!(f, "{}: {}", success, code),
            OrderOutcome::Failed { message } => write!(f, "ERROR: {}", message),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OrderResponse {
    success: Option<bool>,
    code: Option<String>,
    msg: Option<String>,
    data: Option<OrderData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderData {
    order_oid: Option<String>,
}

/// Normalize an order endpoint response body.
pub fn parse_order_response(body: &str) -> ExecutorResult<OrderOutcome> {
    let response: OrderResponse = serde_json::from_str(body)?;
    let success = response
        .success
        .ok_or_else(|| ExecutorError::Parse("missing success flag".to_string()))?;
    let code = response.code.or(response.msg).unwrap_or_default();
    Ok(OrderOutcome::Acknowledged {
        success,
        code,
        order_id: response.data.and_then(|d| d.order_oid),
    })
}
