//! Ethscope Observer Library
//!
//! This crate provides an embedded observer for Ethereum nodes: callers
//! subscribe addresses of interest, a background loop follows the node's
//! pending-transaction feed, resolves each hash over JSON-RPC, and keeps
//! an in-memory per-address transaction history available for lookup.

pub mod feed;
pub mod ingest;
pub mod parser;
pub mod registry;
pub mod rpc;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use feed::{FeedError, SubscriptionFeed, WsFeed};
pub use ingest::IngestError;
pub use parser::{Config, Parser, ParserError};
pub use registry::SubscriptionRegistry;
pub use rpc::{HttpTransport, RpcClient, RpcError, RpcTransport};
pub use store::TransactionStore;
pub use types::Transaction;
