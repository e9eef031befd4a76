//! Wire Types
//!
//! JSON shapes exchanged with the node: the transaction record, the
//! JSON-RPC request/response envelopes, and the two envelope shapes seen
//! on the pending-transaction feed (ack and notification).

use serde::{Deserialize, Serialize};

/// JSON-RPC protocol version sent with every request.
pub const JSONRPC_VERSION: &str = "2.0";

/// A transaction as returned by `eth_getTransactionByHash`.
///
/// Numeric fields are carried as the node's hex strings; the observer
/// stores and returns them without interpreting their value. Fields the
/// observer never touches (signature components, access lists, chain id)
/// are dropped on decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Block hash, absent while the transaction is pending.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_hash: Option<String>,
    /// Block number, absent while the transaction is pending.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_number: Option<String>,
    /// Sender address, hex form exactly as the node reported it.
    pub from: String,
    pub gas: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_fee_per_gas: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_priority_fee_per_gas: Option<String>,
    pub hash: String,
    pub input: String,
    pub nonce: String,
    /// Recipient address, `None` for contract creation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Outbound JSON-RPC request envelope.
#[derive(Debug, Serialize)]
pub struct RpcRequest<'a> {
    pub method: &'a str,
    pub params: Vec<&'a str>,
    pub id: u64,
    pub jsonrpc: &'a str,
}

/// Response to `eth_blockNumber`.
#[derive(Debug, Deserialize)]
pub struct BlockNumberResponse {
    pub id: u64,
    pub jsonrpc: String,
    pub result: String,
}

/// Response to `eth_getTransactionByHash`. `result` is `null` when the
/// node has no transaction for the requested hash.
#[derive(Debug, Deserialize)]
pub struct TransactionByHashResponse {
    pub id: u64,
    pub jsonrpc: String,
    pub result: Option<Transaction>,
}

/// Envelope for frames arriving on the pending-transaction feed.
///
/// Two shapes share this envelope: the subscription ack (`id` plus a
/// top-level `result` carrying the subscription id) and notifications
/// (`method` = `eth_subscription` with the hash under `params.result`).
#[derive(Debug, Clone, Deserialize)]
pub struct FeedMessage {
    pub jsonrpc: Option<String>,
    pub id: Option<u64>,
    pub result: Option<String>,
    pub method: Option<String>,
    pub params: Option<FeedParams>,
}

/// Payload of a subscription notification.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedParams {
    pub subscription: String,
    pub result: String,
}

impl FeedMessage {
    /// Transaction hash carried by a notification frame, if any.
    ///
    /// The ack frame and anything else without a `params` payload yield
    /// `None`.
    pub fn transaction_hash(&self) -> Option<&str> {
        self.params.as_ref().map(|p| p.result.as_str())
    }
}
