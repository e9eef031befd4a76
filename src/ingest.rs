//! Ingestion Loop
//!
//! Background orchestrator: drains the feed in delivery order, resolves
//! each notified hash over RPC, and records transactions that touch
//! subscribed addresses. Individual bad messages are logged and skipped;
//! only a failed subscription, a closed feed, or cancellation ends the
//! loop.

use std::sync::Arc;

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::feed::{FeedError, SubscriptionFeed, SUBSCRIBE_NEW_PENDING_TRANSACTIONS};
use crate::registry::SubscriptionRegistry;
use crate::rpc::RpcClient;
use crate::store::TransactionStore;
use crate::types::{FeedMessage, Transaction};

/// Terminal errors of the ingestion loop, reported through the task's
/// join result rather than to any foreground caller.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("failed to establish feed subscription: {0}")]
    Subscribe(#[from] FeedError),

    #[error("ingestion task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Runs the ingestion loop until the feed ends or `cancel` fires.
///
/// Establishing the subscription happens here, in the background, so a
/// dead feed endpoint never blocks the facade's constructor.
pub(crate) async fn run(
    feed: Arc<dyn SubscriptionFeed>,
    rpc: Arc<RpcClient>,
    registry: Arc<SubscriptionRegistry>,
    store: Arc<TransactionStore>,
    cancel: CancellationToken,
) -> Result<(), IngestError> {
    let mut inbox = feed
        .subscribe(SUBSCRIBE_NEW_PENDING_TRANSACTIONS, cancel.clone())
        .await?;
    info!("ingestion loop started");

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!("ingestion loop cancelled");
                break;
            }
            message = inbox.recv() => match message {
                Some(raw) => process_message(&raw, &rpc, &registry, &store).await,
                None => {
                    info!("feed ended, stopping ingestion loop");
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Handles one raw feed frame: decode, resolve, filter, record.
async fn process_message(
    raw: &str,
    rpc: &RpcClient,
    registry: &SubscriptionRegistry,
    store: &TransactionStore,
) {
    let message: FeedMessage = match serde_json::from_str(raw) {
        Ok(message) => message,
        Err(e) => {
            warn!(error = %e, "skipping undecodable feed message");
            return;
        }
    };

    // The first frame on the feed is the subscription ack; it carries
    // no transaction payload.
    let Some(hash) = message.transaction_hash() else {
        debug!("skipping feed message without transaction payload");
        return;
    };

    let transaction = match rpc.get_transaction_by_hash(hash).await {
        Ok(Some(transaction)) => transaction,
        Ok(None) => {
            debug!(hash, "transaction not found, dropped or not yet indexed");
            return;
        }
        Err(e) => {
            warn!(hash, error = %e, "transaction lookup failed, skipping");
            return;
        }
    };

    record(registry, store, &transaction);
}

/// Appends `transaction` under each of its endpoints that is subscribed.
///
/// Sender and recipient are independent checks; a transaction can be
/// recorded zero, one, or two times.
fn record(registry: &SubscriptionRegistry, store: &TransactionStore, transaction: &Transaction) {
    if registry.is_subscribed(&transaction.from) {
        store.append(&transaction.from, transaction.clone());
    }
    if let Some(to) = &transaction.to {
        if registry.is_subscribed(to) {
            store.append(to, transaction.clone());
        }
    }
}
