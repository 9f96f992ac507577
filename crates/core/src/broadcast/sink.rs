use std::sync::{Arc, RwLock};

use tokio::sync::broadcast;
use tracing::debug;

use super::message_tag;

/// Default per-client buffer before a slow client starts lagging.
pub const DEFAULT_CAPACITY: usize = 64;

/// Fire-and-forget fan-out of encoded messages to display clients.
#[derive(Debug, Clone)]
pub struct Broadcaster {
    sender: broadcast::Sender<String>,
    last: Option<Arc<RwLock<Option<String>>>>,
}

/// A new client's view: the replayed message (if any) then the live feed.
#[derive(Debug)]
pub struct Subscription {
    pub replay: Option<String>,
    pub receiver: broadcast::Receiver<String>,
}

impl Broadcaster {
    /// Create a broadcaster. With `replay_last` new subscribers first get the
    /// most recent message.
    pub fn new(capacity: usize, replay_last: bool) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            last: replay_last.then(|| Arc::new(RwLock::new(None))),
        }
    }

    /// Send to every connected client. Never blocks; returns how many clients
    /// the message was queued for.
    pub fn send(&self, message: String) -> usize {
        debug!(tag = message_tag(&message), "Broadcasting message");
        match &self.last {
            Some(last) => {
                let mut guard = last.write().unwrap_or_else(|e| e.into_inner());
                let delivered = self.sender.send(message.clone()).unwrap_or(0);
                *guard = Some(message);
                delivered
            }
            // An error only means nobody is listening.
            None => self.sender.send(message).unwrap_or(0),
        }
    }

    pub fn subscribe(&self) -> Subscription {
        match &self.last {
            Some(last) => {
                // Holding the lock keeps a concurrent send from being both
                // replayed and received.
                let guard = last.read().unwrap_or_else(|e| e.into_inner());
                Subscription {
                    receiver: self.sender.subscribe(),
                    replay: guard.clone(),
                }
            }
            None => Subscription {
                replay: None,
                receiver: self.sender.subscribe(),
            },
        }
    }

    /// Last message sent, when replay is enabled.
    pub fn last_message(&self) -> Option<String> {
        self.last
            .as_ref()
            .and_then(|last| last.read().unwrap_or_else(|e| e.into_inner()).clone())
    }

    pub fn client_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for Broadcaster {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, false)
    }
}
