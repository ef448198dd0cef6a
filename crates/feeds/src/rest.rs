//! REST API order book fetcher.
//!
//! Reads the public open-orders endpoint and reduces it to the best level
//! on each side. Entries come back as `[price, size, volume]` arrays with
//! the best price first.

use crate::{FeedError, FeedResult, MarketDataFetcher};
use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;
use triangular_core::{BookLevel, OrderBookTop, TradingPair};

/// Default public API host.
pub const DEFAULT_HOST: &str = "https://api.kucoin.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct OpenOrdersResponse {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    data: Option<OpenOrdersData>,
}

#[derive(Debug, Deserialize)]
struct OpenOrdersData {
    #[serde(rename = "BUY", default)]
    buy: Vec<Vec<Value>>,
    #[serde(rename = "SELL", default)]
    sell: Vec<Vec<Value>>,
}

/// Parse a JSON number or numeric string into an exact decimal.
pub(crate) fn decimal_from_value(value: &Value) -> Option<Decimal> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

fn best_level(symbol: &str, side: &str, levels: &[Vec<Value>]) -> FeedResult<BookLevel> {
    let best = levels
        .first()
        .ok_or_else(|| FeedError::Parse(format!("{}: no {} orders", symbol, side)))?;
    let price = best
        .first()
        .and_then(decimal_from_value)
        .ok_or_else(|| FeedError::Parse(format!("{}: invalid {} price", symbol, side)))?;
    let size = best
        .get(1)
        .and_then(decimal_from_value)
        .ok_or_else(|| FeedError::Parse(format!("{}: invalid {} size", symbol, side)))?;
    Ok(BookLevel::new(price, size))
}

/// Parse an open-orders response body into a top-of-book snapshot.
pub fn parse_open_orders(symbol: &str, body: &str) -> FeedResult<OrderBookTop> {
    let response: OpenOrdersResponse = serde_json::from_str(body)?;

    if response.success == Some(false) {
        return Err(FeedError::Parse(format!(
            "{}: {} {}",
            symbol,
            response.code.unwrap_or_default(),
            response.msg.unwrap_or_default()
        )));
    }

    let data = response
        .data
        .ok_or_else(|| FeedError::Parse(format!("{}: missing data", symbol)))?;

    Ok(OrderBookTop::new(
        best_level(symbol, "BUY", &data.buy)?,
        best_level(symbol, "SELL", &data.sell)?,
    ))
}

/// Public order book client.
#[derive(Debug, Clone)]
pub struct KucoinRestFetcher {
    client: Client,
    host: String,
}

impl KucoinRestFetcher {
    /// Create a fetcher against `host` (e.g. [`DEFAULT_HOST`]).
    pub fn new(host: &str) -> FeedResult<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| FeedError::Fetch(format!("Failed to build client: {}", e)))?;
        Ok(Self::with_client(client, host))
    }

    /// Create a fetcher sharing an existing HTTP client.
    pub fn with_client(client: Client, host: &str) -> Self {
        Self {
            client,
            host: host.trim_end_matches('/').to_string(),
        }
    }

    /// URL of the open-orders endpoint for `pair`.
    pub fn open_orders_url(&self, pair: &TradingPair) -> String {
        format!("{}/v1/{}/open/orders", self.host, pair.symbol())
    }
}

#[async_trait]
impl MarketDataFetcher for KucoinRestFetcher {
    async fn fetch_top(&self, pair: &TradingPair) -> FeedResult<OrderBookTop> {
        let symbol = pair.symbol();
        let url = self.open_orders_url(pair);
        debug!("Fetching order book: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FeedError::Fetch(format!("{}: {}", symbol, e)))?;

        if !response.status().is_success() {
            return Err(FeedError::Fetch(format!(
                "{}: HTTP {}",
                symbol,
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FeedError::Fetch(format!("{}: {}", symbol, e)))?;

        parse_open_orders(&symbol, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use triangular_core::Coin;

    const BODY: &str = r#"{
        "success": true,
        "code": "OK",
        "msg": "Operation succeeded.",
        "timestamp": 1520580000000,
        "data": {
            "SELL": [[0.0510000000, 7.25, 0.369750], [0.0512, 1.0, 0.0512]],
            "BUY": [[0.0500000000, 3.5, 0.175], [0.0499, 2.0, 0.0998]]
        }
    }"#;

    #[test]
    fn test_parse_open_orders_best_levels() {
        let top = parse_open_orders("ETH-BTC", BODY).unwrap();
        assert_eq!(top.buy, BookLevel::new(dec!(0.05), dec!(3.5)));
        assert_eq!(top.sell, BookLevel::new(dec!(0.051), dec!(7.25)));
    }

    #[test]
    fn test_parse_open_orders_string_numbers() {
        let body = r#"{"success": true, "data": {
            "SELL": [["1.0020", "10"]],
            "BUY": [["1.0000", "12.5"]]
        }}"#;
        let top = parse_open_orders("ETH-USDT", body).unwrap();
        assert_eq!(top.buy.price, dec!(1.0000));
        assert_eq!(top.sell.size, dec!(10));
    }

    #[test]
    fn test_parse_open_orders_scientific_price() {
        let body = r#"{"data": {"SELL": [[1e-7, 100]], "BUY": [[9e-8, 50]]}}"#;
        let top = parse_open_orders("DOGE-BTC", body).unwrap();
        assert_eq!(top.sell.price, dec!(0.0000001));
        assert_eq!(top.buy.price, dec!(0.00000009));
    }

    #[test]
    fn test_parse_open_orders_empty_side() {
        let body = r#"{"success": true, "data": {"SELL": [], "BUY": [[0.05, 1]]}}"#;
        let err = parse_open_orders("ETH-BTC", body).unwrap_err();
        assert!(matches!(err, FeedError::Parse(msg) if msg.contains("no SELL orders")));
    }

    #[test]
    fn test_parse_open_orders_missing_size() {
        let body = r#"{"success": true, "data": {"SELL": [[0.051]], "BUY": [[0.05, 1]]}}"#;
        assert!(matches!(
            parse_open_orders("ETH-BTC", body),
            Err(FeedError::Parse(_))
        ));
    }

    #[test]
    fn test_parse_open_orders_failure_flag() {
        let body = r#"{"success": false, "code": "ERROR", "msg": "SYMBOL NOT FOUND"}"#;
        let err = parse_open_orders("XXX-BTC", body).unwrap_err();
        assert!(matches!(err, FeedError::Parse(msg) if msg.contains("SYMBOL NOT FOUND")));
    }

    #[test]
    fn test_parse_open_orders_malformed() {
        assert!(matches!(
            parse_open_orders("ETH-BTC", "<html>502</html>"),
            Err(FeedError::Parse(_))
        ));
        assert!(matches!(
            parse_open_orders("ETH-BTC", r#"{"success": true}"#),
            Err(FeedError::Parse(_))
        ));
    }

    #[test]
    fn test_open_orders_url() {
        let fetcher = KucoinRestFetcher::new("https://api.kucoin.com/").unwrap();
        let pair = TradingPair::new(Coin::new("ETH"), Coin::new("BTC"));
        assert_eq!(
            fetcher.open_orders_url(&pair),
            "https://api.kucoin.com/v1/ETH-BTC/open/orders"
        );
    }

    #[tokio::test]
    async fn test_fetch_unreachable_host_is_fetch_error() {
        let fetcher = KucoinRestFetcher::new("http://127.0.0.1:1").unwrap();
        let pair = TradingPair::new(Coin::new("ETH"), Coin::new("BTC"));
        let err = fetcher.fetch_top(&pair).await.unwrap_err();
        assert!(matches!(err, FeedError::Fetch(_)));
    }

    #[tokio::test]
    async fn test_fetch_top_reads_open_orders_endpoint() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/v1/ETH-BTC/open/orders")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(BODY)
            .create_async()
            .await;

        let fetcher = KucoinRestFetcher::new(&server.url()).unwrap();
        let pair = TradingPair::new(Coin::new("ETH"), Coin::new("BTC"));
        let top = fetcher.fetch_top(&pair).await.unwrap();

        mock.assert_async().await;
        assert_eq!(
            top,
            OrderBookTop::new(
                BookLevel::new(dec!(0.05), dec!(3.5)),
                BookLevel::new(dec!(0.051), dec!(7.25)),
            )
        );
    }

    #[tokio::test]
    async fn test_fetch_top_http_error_is_fetch_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/v1/ETH-BTC/open/orders")
            .with_status(503)
            .with_body("Service Unavailable")
            .create_async()
            .await;

        let fetcher = KucoinRestFetcher::new(&server.url()).unwrap();
        let pair = TradingPair::new(Coin::new("ETH"), Coin::new("BTC"));
        let err = fetcher.fetch_top(&pair).await.unwrap_err();

        assert!(matches!(err, FeedError::Fetch(msg) if msg.contains("503")));
    }
}
