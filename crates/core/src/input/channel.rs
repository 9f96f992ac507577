use std::time::Duration;

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::time::Instant;
use tracing::{debug, warn};

use super::VoteToken;
use crate::metrics;

/// Where a vote came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteSource {
    Serial,
    Remote,
}

impl VoteSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Serial => "serial",
            Self::Remote => "remote",
        }
    }
}

/// Create the single-slot vote handoff.
pub fn vote_channel() -> (VoteSender, VoteReceiver) {
    let (tx, rx) = mpsc::channel(1);
    (VoteSender { tx }, VoteReceiver { rx })
}

/// Producer side, shared by the device reader and websocket connections.
#[derive(Debug, Clone)]
pub struct VoteSender {
    tx: mpsc::Sender<VoteToken>,
}

impl VoteSender {
    /// Offer a vote without waiting. Returns false when the slot is occupied
    /// or the orchestrator is gone; the press is dropped.
    pub fn offer(&self, vote: VoteToken, source: VoteSource) -> bool {
        metrics::VOTES_RECEIVED
            .with_label_values(&[source.as_str()])
            .inc();

        match self.tx.try_send(vote) {
            Ok(()) => {
                debug!(vote = %vote, source = source.as_str(), "Vote queued");
                true
            }
            Err(TrySendError::Full(_)) => {
                metrics::VOTES_DROPPED.inc();
                debug!(vote = %vote, source = source.as_str(), "Vote slot full, press dropped");
                false
            }
            Err(TrySendError::Closed(_)) => {
                metrics::VOTES_DROPPED.inc();
                warn!("Vote receiver closed, press dropped");
                false
            }
        }
    }
}

/// Consumer side, owned by the orchestrator.
#[derive(Debug)]
pub struct VoteReceiver {
    rx: mpsc::Receiver<VoteToken>,
}

impl VoteReceiver {
    /// Discard anything left in the slot. Returns how many votes were dropped.
    pub fn drain(&mut self) -> usize {
        let mut drained = 0;
        while self.rx.try_recv().is_ok() {
            drained += 1;
        }
        if drained > 0 {
            debug!(drained, "Drained stale votes");
        }
        drained
    }

    /// Wait up to `timeout` for the next vote.
    ///
    /// Always waits the full timeout when no vote arrives, even when every
    /// sender has been dropped.
    pub async fn try_receive_vote(&mut self, timeout: Duration) -> Option<VoteToken> {
        let deadline = Instant::now() + timeout;
        match tokio::time::timeout_at(deadline, self.rx.recv()).await {
            Ok(Some(vote)) => Some(vote),
            Ok(None) => {
                tokio::time::sleep_until(deadline).await;
                None
            }
            Err(_) => None,
        }
    }
}
