//! Request signing and API credentials.
//!
//! Signed requests carry three headers: the public key, a millisecond
//! nonce, and `hex(HMAC-SHA256(secret, base64(endpoint/nonce/query)))`
//! where `query` lists the POST parameters in ascending alphabetical
//! order without URL-encoding.

use crate::{ExecutorError, ExecutorResult};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

type HmacSha256 = Hmac<Sha256>;

pub const HEADER_API_KEY: &str = "KC-API-KEY";
pub const HEADER_NONCE: &str = "KC-API-NONCE";
pub const HEADER_SIGNATURE: &str = "KC-API-SIGNATURE";

/// Environment variable holding the API public key.
pub const API_KEY_VAR: &str = "KUCOIN_API_KEY";
/// Environment variable holding the API secret key.
pub const SECRET_KEY_VAR: &str = "KUCOIN_SECRET_KEY";

/// API key pair.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiCredentials {
    pub public_key: String,
    pub secret_key: String,
}

impl ApiCredentials {
    pub fn new(public_key: &str, secret_key: &str) -> Self {
        Self {
            public_key: public_key.to_string(),
            secret_key: secret_key.to_string(),
        }
    }
}

impl fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("public_key", &self.public_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// Supplies credentials at signing time.
///
/// Queried on every signed request, so rotated keys take effect without a
/// restart.
pub trait CredentialProvider: Send + Sync {
    fn credentials(&self) -> ExecutorResult<ApiCredentials>;
}

/// Reads credentials from environment variables on each call.
#[derive(Debug, Clone)]
pub struct EnvCredentialProvider {
    key_var: String,
    secret_var: String,
}

impl Default for EnvCredentialProvider {
    fn default() -> Self {
        Self::new(API_KEY_VAR, SECRET_KEY_VAR)
    }
}

impl EnvCredentialProvider {
    pub fn new(key_var: &str, secret_var: &str) -> Self {
        Self {
            key_var: key_var.to_string(),
            secret_var: secret_var.to_string(),
        }
    }

    fn read(var: &str) -> ExecutorResult<String> {
        match std::env::var(var) {
            Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
            _ => Err(ExecutorError::Credentials(format!("{} is not set", var))),
        }
    }
}

impl CredentialProvider for EnvCredentialProvider {
    fn credentials(&self) -> ExecutorResult<ApiCredentials> {
        Ok(ApiCredentials {
            public_key: Self::read(&self.key_var)?,
            secret_key: Self::read(&self.secret_var)?,
        })
    }
}

/// Fixed credentials, mostly useful in tests.
#[derive(Debug, Clone)]
pub struct StaticCredentials(pub ApiCredentials);

impl CredentialProvider for StaticCredentials {
    fn credentials(&self) -> ExecutorResult<ApiCredentials> {
        Ok(self.0.clone())
    }
}

/// Millisecond timestamp used as request nonce.
pub fn nonce_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

/// `amount=..&price=..&type=..`, parameters in alphabetical order.
pub fn order_query_string(amount: &str, price: &str, side: &str) -> String {
    format!("amount={}&price={}&type={}", amount, price, side)
}

/// Plain string the signature is computed over, before base64.
pub fn string_to_sign(endpoint: &str, nonce: u64, query: &str) -> String {
    format!("{}/{}/{}", endpoint, nonce, query)
}

fn hmac_sha256_hex(secret: &str, payload: &[u8]) -> ExecutorResult<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| ExecutorError::Credentials(e.to_string()))?;
    mac.update(payload);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Compute the request signature.
pub fn sign_request(
    secret: &str,
    endpoint: &str,
    nonce: u64,
    query: &str,
) -> ExecutorResult<String> {
    let encoded = STANDARD.encode(string_to_sign(endpoint, nonce, query));
    hmac_sha256_hex(secret, encoded.as_bytes())
}
