pub mod types;
pub mod units;

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

pub use types::{Address, AddressError, RpcErrorObject};
pub use units::UnitsError;

use types::{RpcRequest, RpcResponse, LATEST_BLOCK};

#[derive(Error, Debug)]
pub enum RpcError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request to {method} failed: {source}")]
    Transport {
        method: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{method} returned HTTP {status}")]
    Http { method: String, status: StatusCode },
    #[error("{method} returned RPC error {}: {}", .error.code, .error.message)]
    Rpc { method: String, error: RpcErrorObject },
    #[error("{method} returned no result")]
    MissingResult { method: String },
    #[error("{method} returned a non-string result: {result}")]
    UnexpectedResult { method: String, result: Value },
    #[error("{method} returned an invalid quantity: {source}")]
    InvalidQuantity {
        method: String,
        #[source]
        source: UnitsError,
    },
}

/// Minimal Ethereum JSON-RPC client covering the read-only calls the dashboard shows.
#[derive(Debug, Clone)]
pub struct EthRpcClient {
    client: Client,
    url: String,
    next_id: Arc<AtomicU64>,
}

impl EthRpcClient {
    pub fn new(url: String, timeout: Duration) -> Result<Self, RpcError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(RpcError::Client)?;

        info!("Initialized Ethereum RPC client for: {} (timeout {:?})", url, timeout);
        Ok(Self {
            client,
            url,
            next_id: Arc::new(AtomicU64::new(1)),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn get_balance(&self, address: &Address) -> Result<u128, RpcError> {
        self.quantity("eth_getBalance", json!([address.as_str(), LATEST_BLOCK]))
            .await
    }

    pub async fn get_block_number(&self) -> Result<u64, RpcError> {
        self.quantity_u64("eth_blockNumber", json!([])).await
    }

    pub async fn get_chain_id(&self) -> Result<u64, RpcError> {
        self.quantity_u64("eth_chainId", json!([])).await
    }

    pub async fn get_transaction_count(&self, address: &Address) -> Result<u64, RpcError> {
        self.quantity_u64(
            "eth_getTransactionCount",
            json!([address.as_str(), LATEST_BLOCK]),
        )
        .await
    }

    pub async fn get_gas_price(&self) -> Result<u128, RpcError> {
        self.quantity("eth_gasPrice", json!([])).await
    }

    async fn quantity(&self, method: &str, params: Value) -> Result<u128, RpcError> {
        let raw = self.call_for_string(method, params).await?;
        units::parse_quantity(&raw).map_err(|source| RpcError::InvalidQuantity {
            method: method.to_string(),
            source,
        })
    }

    async fn quantity_u64(&self, method: &str, params: Value) -> Result<u64, RpcError> {
        let raw = self.call_for_string(method, params).await?;
        units::parse_quantity_u64(&raw).map_err(|source| RpcError::InvalidQuantity {
            method: method.to_string(),
            source,
        })
    }

    async fn call_for_string(&self, method: &str, params: Value) -> Result<String, RpcError> {
        match self.call(method, params).await? {
            Value::String(raw) => Ok(raw),
            result => Err(RpcError::UnexpectedResult {
                method: method.to_string(),
                result,
            }),
        }
    }

    async fn call(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = RpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id,
        };
        debug!("RPC call {} (id {})", method, id);

        let transport = |source| RpcError::Transport {
            method: method.to_string(),
            source,
        };

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(transport)?;

        if !response.status().is_success() {
            return Err(RpcError::Http {
                method: method.to_string(),
                status: response.status(),
            });
        }

        let body = response.json::<RpcResponse>().await.map_err(transport)?;

        if let Some(error) = body.error {
            return Err(RpcError::Rpc {
                method: method.to_string(),
                error,
            });
        }

        match body.result {
            Some(Value::Null) | None => Err(RpcError::MissingResult {
                method: method.to_string(),
            }),
            Some(result) => Ok(result),
        }
    }
}
