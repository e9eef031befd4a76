//! Parser Facade
//!
//! Public entry point. Construction wires the registry, store, RPC
//! client and feed together and launches the ingestion loop in the
//! background without blocking; the returned handle owns the loop's
//! cancellation token and join handle, so the owner can shut it down
//! and recover its terminal error.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::feed::{FeedError, SubscriptionFeed, WsFeed};
use crate::ingest::{self, IngestError};
use crate::registry::SubscriptionRegistry;
use crate::rpc::{HttpTransport, RpcClient, RpcError, RpcTransport};
use crate::store::TransactionStore;
use crate::types::Transaction;

/// Default bound on the feed inbox channel.
pub const DEFAULT_INBOX_CAPACITY: usize = 100;

/// Default limit on pooled idle HTTP connections.
pub const DEFAULT_MAX_IDLE_CONNS: usize = 16;

/// Default idle timeout for pooled HTTP connections.
pub const DEFAULT_IDLE_CONN_TIMEOUT: Duration = Duration::from_secs(90);

/// Default per-request timeout for RPC calls.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(45);

/// Configuration for the parser's network endpoints and tuning knobs
#[derive(Debug, Clone)]
pub struct Config {
    /// JSON-RPC endpoint for one-shot queries.
    pub http_url: String,
    /// Websocket endpoint for the pending-transaction feed.
    pub ws_url: String,
    /// Capacity of the bounded feed inbox; a full inbox applies
    /// backpressure to the feed reader.
    pub inbox_capacity: usize,
    /// Maximum idle HTTP connections kept pooled per host.
    pub max_idle_conns: usize,
    /// How long idle HTTP connections stay pooled.
    pub idle_conn_timeout: Duration,
    /// Timeout applied to each RPC round trip.
    pub request_timeout: Duration,
}

impl Config {
    /// Create a config for the given endpoints with default tuning.
    pub fn new(http_url: impl Into<String>, ws_url: impl Into<String>) -> Self {
        Self {
            http_url: http_url.into(),
            ws_url: ws_url.into(),
            inbox_capacity: DEFAULT_INBOX_CAPACITY,
            max_idle_conns: DEFAULT_MAX_IDLE_CONNS,
            idle_conn_timeout: DEFAULT_IDLE_CONN_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Errors that can occur while constructing the parser
#[derive(Error, Debug)]
pub enum ParserError {
    #[error("failed to construct feed: {0}")]
    Feed(#[from] FeedError),

    #[error("failed to construct rpc transport: {0}")]
    Rpc(#[from] RpcError),
}

/// Observer facade over the registry, store, RPC client, and the
/// background ingestion loop.
pub struct Parser {
    registry: Arc<SubscriptionRegistry>,
    store: Arc<TransactionStore>,
    rpc: Arc<RpcClient>,
    cancel: CancellationToken,
    ingest_handle: JoinHandle<Result<(), IngestError>>,
}

impl Parser {
    /// Connects the default HTTP and websocket transports and starts
    /// the background ingestion loop.
    ///
    /// Fails only if the HTTP client cannot be built or the feed
    /// endpoint URL is malformed; the feed is dialed in the background,
    /// and a dead endpoint surfaces through [`Parser::shutdown`].
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(config: &Config) -> Result<Self, ParserError> {
        let transport = HttpTransport::new(
            &config.http_url,
            config.max_idle_conns,
            config.idle_conn_timeout,
            config.request_timeout,
        )?;
        let feed = WsFeed::new(&config.ws_url, config.inbox_capacity)?;
        Ok(Self::with_transports(Arc::new(transport), Arc::new(feed)))
    }

    /// Wires caller-supplied transports instead of the defaults.
    pub fn with_transports(
        rpc_transport: Arc<dyn RpcTransport>,
        feed: Arc<dyn SubscriptionFeed>,
    ) -> Self {
        let registry = Arc::new(SubscriptionRegistry::new());
        let store = Arc::new(TransactionStore::new());
        let rpc = Arc::new(RpcClient::new(rpc_transport));
        let cancel = CancellationToken::new();

        let ingest_handle = tokio::spawn(ingest::run(
            feed,
            Arc::clone(&rpc),
            Arc::clone(&registry),
            Arc::clone(&store),
            cancel.clone(),
        ));

        Self {
            registry,
            store,
            rpc,
            cancel,
            ingest_handle,
        }
    }

    /// Latest block number reported by the node.
    pub async fn get_current_block(&self) -> Result<u64, RpcError> {
        self.rpc.get_current_block().await
    }

    /// Registers `address` for observation. Always succeeds.
    pub fn subscribe(&self, address: &str) -> bool {
        self.registry.subscribe(address)
    }

    /// Transactions observed so far for `address`, in delivery order.
    /// Empty for an address that is unknown or has no matches yet.
    pub fn get_transactions(&self, address: &str) -> Vec<Transaction> {
        self.store.get(address)
    }

    /// Stops the ingestion loop and reports its terminal error, if any.
    ///
    /// No new feed reads are issued after cancellation; an in-flight
    /// RPC lookup runs to completion or its own timeout first.
    pub async fn shutdown(self) -> Result<(), IngestError> {
        self.cancel.cancel();
        self.ingest_handle.await?
    }
}
