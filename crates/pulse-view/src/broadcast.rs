//! View message fan-out.
//!
//! Every view change is serialized once and sent to all subscribed
//! renderers. Sending with no subscribers is normal and not an error.

use crate::types::ViewMessage;
use tokio::sync::broadcast;
use tracing::{debug, trace};

/// Default channel capacity; slow receivers skip ahead on lag.
pub const DEFAULT_CAPACITY: usize = 1024;

/// JSON broadcaster for view messages.
#[derive(Debug, Clone)]
pub struct EventBroadcaster {
    tx: broadcast::Sender<String>,
}

impl EventBroadcaster {
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Subscribe to serialized view messages.
    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.tx.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Serialize and send. Returns the number of receivers reached.
    pub fn publish(&self, msg: &ViewMessage) -> usize {
        match serde_json::to_string(msg) {
            Ok(json) => match self.tx.send(json) {
                Ok(n) => {
                    trace!(receivers = n, "View message sent");
                    n
                }
                Err(_) => {
                    trace!("No view receivers connected");
                    0
                }
            },
            Err(e) => {
                debug!(error = %e, "Failed to serialize view message");
                0
            }
        }
    }
}

impl Default for EventBroadcaster {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
