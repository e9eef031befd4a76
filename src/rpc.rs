//! JSON-RPC Client
//!
//! One-shot request/response calls against the node's HTTP endpoint:
//! current block number and transaction lookup by hash. Every request is
//! tagged with an id from a client-owned atomic counter; the id is
//! validated against the echoed response id on the block-number call.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use crate::types::{
    BlockNumberResponse, RpcRequest, Transaction, TransactionByHashResponse, JSONRPC_VERSION,
};

pub const METHOD_BLOCK_NUMBER: &str = "eth_blockNumber";
pub const METHOD_TRANSACTION_BY_HASH: &str = "eth_getTransactionByHash";

/// Errors that can occur during an RPC call
#[derive(Error, Debug)]
pub enum RpcError {
    #[error("failed to encode request payload: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("transport request failed: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("failed to decode response payload: {0}")]
    Deserialize(#[source] serde_json::Error),

    #[error("response id {got} does not match request id {expected}")]
    IdMismatch { expected: u64, got: u64 },

    #[error("malformed result field: {0:?}")]
    MalformedResult(String),

    #[error("failed to parse hex quantity {0:?}")]
    ParseHex(String, #[source] std::num::ParseIntError),
}

/// Executes one JSON-RPC exchange: POST the request body to the node,
/// return the raw response body.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RpcTransport: Send + Sync {
    async fn execute(&self, body: String) -> Result<String, RpcError>;
}

/// Default transport: HTTP POST via a pooled `reqwest` client.
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
}

impl HttpTransport {
    /// Builds the underlying HTTP client with the given pool and
    /// timeout tuning. Fails if the client cannot be constructed.
    pub fn new(
        url: impl Into<String>,
        max_idle_conns: usize,
        idle_conn_timeout: Duration,
        request_timeout: Duration,
    ) -> Result<Self, RpcError> {
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(max_idle_conns)
            .pool_idle_timeout(idle_conn_timeout)
            .timeout(request_timeout)
            .build()
            .map_err(|e| RpcError::Transport(Box::new(e)))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl RpcTransport for HttpTransport {
    async fn execute(&self, body: String) -> Result<String, RpcError> {
        let response = self
            .client
            .post(&self.url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| RpcError::Transport(Box::new(e)))?;

        response
            .text()
            .await
            .map_err(|e| RpcError::Transport(Box::new(e)))
    }
}

/// Synchronous request/response client over an [`RpcTransport`].
pub struct RpcClient {
    transport: Arc<dyn RpcTransport>,
    id_counter: AtomicU64,
}

impl RpcClient {
    pub fn new(transport: Arc<dyn RpcTransport>) -> Self {
        Self {
            transport,
            id_counter: AtomicU64::new(0),
        }
    }

    // Ids are monotonic across both operations, start at 1 after
    // construction, and are never reused.
    fn next_id(&self) -> u64 {
        self.id_counter.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Latest block number reported by the node.
    ///
    /// Expects a `0x`-prefixed hex quantity whose echoed id matches the
    /// outgoing request id.
    pub async fn get_current_block(&self) -> Result<u64, RpcError> {
        let id = self.next_id();
        let request = RpcRequest {
            method: METHOD_BLOCK_NUMBER,
            params: vec![],
            id,
            jsonrpc: JSONRPC_VERSION,
        };

        let body = serde_json::to_string(&request).map_err(RpcError::Serialize)?;
        let raw = self.transport.execute(body).await?;
        let response: BlockNumberResponse =
            serde_json::from_str(&raw).map_err(RpcError::Deserialize)?;

        if response.id != id {
            return Err(RpcError::IdMismatch {
                expected: id,
                got: response.id,
            });
        }

        let digits = response
            .result
            .strip_prefix("0x")
            .filter(|d| !d.is_empty())
            .ok_or_else(|| RpcError::MalformedResult(response.result.clone()))?;

        let number = u64::from_str_radix(digits, 16)
            .map_err(|e| RpcError::ParseHex(response.result.clone(), e))?;

        debug!(id, number, "resolved current block");
        Ok(number)
    }

    /// Full transaction record for `hash`.
    ///
    /// Returns `Ok(None)` when the node has no transaction for the hash;
    /// pending transactions seen on the feed may already have been
    /// dropped, or not yet indexed.
    pub async fn get_transaction_by_hash(
        &self,
        hash: &str,
    ) -> Result<Option<Transaction>, RpcError> {
        let id = self.next_id();
        let request = RpcRequest {
            method: METHOD_TRANSACTION_BY_HASH,
            params: vec![hash],
            id,
            jsonrpc: JSONRPC_VERSION,
        };

        let body = serde_json::to_string(&request).map_err(RpcError::Serialize)?;
        let raw = self.transport.execute(body).await?;
        let response: TransactionByHashResponse =
            serde_json::from_str(&raw).map_err(RpcError::Deserialize)?;

        Ok(response.result)
    }
}
