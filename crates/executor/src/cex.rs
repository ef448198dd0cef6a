//! Order submission against the exchange's private REST API.

use crate::auth::{
    nonce_ms, order_query_string, sign_request, CredentialProvider, HEADER_API_KEY,
    HEADER_NONCE, HEADER_SIGNATURE,
};
use crate::{parse_order_response, ExecutorError, ExecutorResult, LimitOrder, OrderOutcome};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Submits limit orders.
///
/// Implementations never return an error: every failure is captured in the
/// returned [`OrderOutcome`].
#[async_trait]
pub trait OrderExecutor: Send + Sync {
    async fn submit_limit_order(&self, order: &LimitOrder) -> OrderOutcome;
}

/// Signed order client for the KuCoin v1 API.
pub struct KucoinOrderClient {
    client: Client,
    host: String,
    credentials: Arc<dyn CredentialProvider>,
}

impl KucoinOrderClient {
    pub fn new(host: &str, credentials: Arc<dyn CredentialProvider>) -> ExecutorResult<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ExecutorError::Network(format!("Failed to build client: {}", e)))?;
        Ok(Self::with_client(client, host, credentials))
    }

    pub fn with_client(
        client: Client,
        host: &str,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Self {
        Self {
            client,
            host: host.trim_end_matches('/').to_string(),
            credentials,
        }
    }

    pub fn order_url(&self, order: &LimitOrder) -> String {
        format!("{}{}", self.host, order.endpoint())
    }

    async fn try_submit(&self, order: &LimitOrder) -> ExecutorResult<OrderOutcome> {
        let credentials = self.credentials.credentials()?;
        let endpoint = order.endpoint();
        let amount = order.amount.to_string();
        let price = order.price.to_string();
        let query = order_query_string(&amount, &price, order.side.as_str());

        let nonce = nonce_ms();
        let signature = sign_request(&credentials.secret_key, &endpoint, nonce, &query)?;

        debug!("Submitting order: {} ({})", order, query);

        let response = self
            .client
            .post(self.order_url(order))
            .header(HEADER_API_KEY, &credentials.public_key)
            .header(HEADER_NONCE, nonce.to_string())
            .header(HEADER_SIGNATURE, signature)
            .form(&order.form_params())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        match parse_order_response(&body) {
            Ok(outcome) => Ok(outcome),
            Err(_) if !status.is_success() => Err(ExecutorError::Rejected(format!(
                "HTTP {}",
                status
            ))),
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl OrderExecutor for KucoinOrderClient {
    async fn submit_limit_order(&self, order: &LimitOrder) -> OrderOutcome {
        match self.try_submit(order).await {
            Ok(outcome) => {
                info!("=> {} - {}", order, outcome);
                outcome
            }
            Err(e) => {
                warn!("=> {} - ERROR: {}", order, e);
                OrderOutcome::failed(&e)
            }
        }
    }
}
