//! Pending-Transaction Feed
//!
//! Long-lived websocket subscription to the node, exposed as a bounded
//! channel of raw text frames. A dedicated reader task owns the
//! connection; when the consumer lags behind, the bounded channel blocks
//! the reader rather than dropping frames.

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

/// Subscription request sent as the first frame on the feed.
pub const SUBSCRIBE_NEW_PENDING_TRANSACTIONS: &str =
    r#"{"id":1,"jsonrpc":"2.0","method":"eth_subscribe","params":["newPendingTransactions"]}"#;

/// Errors that can occur while establishing the feed
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("invalid feed endpoint {0:?}: {1}")]
    InvalidEndpoint(String, #[source] url::ParseError),

    #[error("failed to dial feed endpoint: {0}")]
    Dial(#[source] Box<tokio_tungstenite::tungstenite::Error>),

    #[error("failed to send subscription request: {0}")]
    Write(#[source] Box<tokio_tungstenite::tungstenite::Error>),
}

/// Source of raw feed frames.
///
/// `subscribe` opens the transport, sends `request` as the first
/// outbound frame, and returns the inbound side as a bounded channel.
/// The channel closes when the transport ends or `cancel` fires;
/// individual read failures are logged and skipped.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscriptionFeed: Send + Sync {
    async fn subscribe(
        &self,
        request: &str,
        cancel: CancellationToken,
    ) -> Result<mpsc::Receiver<String>, FeedError>;
}

/// Default feed over a websocket connection.
pub struct WsFeed {
    url: Url,
    inbox_capacity: usize,
}

impl WsFeed {
    /// Validates the endpoint URL; dialing happens in [`subscribe`].
    ///
    /// [`subscribe`]: SubscriptionFeed::subscribe
    pub fn new(url: &str, inbox_capacity: usize) -> Result<Self, FeedError> {
        let url = Url::parse(url).map_err(|e| FeedError::InvalidEndpoint(url.to_string(), e))?;
        Ok(Self {
            url,
            inbox_capacity,
        })
    }

    pub fn endpoint(&self) -> &str {
        self.url.as_str()
    }
}

#[async_trait]
impl SubscriptionFeed for WsFeed {
    async fn subscribe(
        &self,
        request: &str,
        cancel: CancellationToken,
    ) -> Result<mpsc::Receiver<String>, FeedError> {
        let (socket, _response) = connect_async(self.url.as_str())
            .await
            .map_err(|e| FeedError::Dial(Box::new(e)))?;
        let (mut write, mut read) = socket.split();

        write
            .send(Message::text(request))
            .await
            .map_err(|e| FeedError::Write(Box::new(e)))?;
        info!(endpoint = %self.url, "subscribed to pending transaction feed");

        let (tx, rx) = mpsc::channel(self.inbox_capacity);
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => {
                        debug!("feed reader cancelled");
                        break;
                    }
                    frame = read.next() => match frame {
                        Some(Ok(Message::Text(text))) => {
                            // A full channel blocks here until the
                            // consumer drains it; frames are never
                            // dropped at this boundary.
                            if tx.send(text.as_str().to_owned()).await.is_err() {
                                debug!("feed consumer dropped, stopping reader");
                                break;
                            }
                        }
                        Some(Ok(Message::Close(_))) | None => {
                            info!("feed connection closed");
                            break;
                        }
                        // Control and binary frames carry no notifications.
                        Some(Ok(_)) => {}
                        Some(Err(e)) => {
                            warn!(error = %e, "failed to read feed frame, skipping");
                        }
                    }
                }
            }
        });

        Ok(rx)
    }
}
