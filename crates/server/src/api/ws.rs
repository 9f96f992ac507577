//! WebSocket endpoint for display clients.
//!
//! Outbound: every broadcast text frame (`TAG: <json>`), starting with the
//! replayed last message when enabled. Inbound: `BUTTON:` frames are votes.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use artbattle_core::broadcast::message_tag;
use artbattle_core::{parse_button_message, Subscription, VoteSender, VoteSource};

use crate::metrics::{
    WS_CONNECTIONS_ACTIVE, WS_CONNECTIONS_TOTAL, WS_INVALID_VOTES, WS_LAG_EVENTS,
    WS_MESSAGES_SENT,
};
use crate::state::AppState;

/// WebSocket upgrade handler.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// Offer an inbound text frame as a vote. Anything else is dropped.
pub fn handle_inbound_text(text: &str, votes: &VoteSender) -> bool {
    match parse_button_message(text) {
        Ok(vote) => votes.offer(vote, VoteSource::Remote),
        Err(e) => {
            WS_INVALID_VOTES.inc();
            debug!("Discarding inbound frame: {}", e);
            false
        }
    }
}

/// Handle a single WebSocket connection.
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();

    let Subscription {
        replay,
        receiver: mut rx,
    } = state.broadcaster().subscribe();

    // Track connection metrics
    WS_CONNECTIONS_TOTAL.inc();
    WS_CONNECTIONS_ACTIVE.inc();

    info!("Display client connected");

    // Spawn task to forward broadcast messages to this client
    let send_task = tokio::spawn(async move {
        if let Some(message) = replay {
            WS_MESSAGES_SENT
                .with_label_values(&[message_tag(&message)])
                .inc();
            if sender.send(Message::Text(message.into())).await.is_err() {
                debug!("WebSocket send failed, client disconnected");
                return;
            }
        }

        loop {
            match rx.recv().await {
                Ok(message) => {
                    WS_MESSAGES_SENT
                        .with_label_values(&[message_tag(&message)])
                        .inc();
                    if sender.send(Message::Text(message.into())).await.is_err() {
                        debug!("WebSocket send failed, client disconnected");
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!("Display client lagged, skipped {} messages", n);
                    WS_LAG_EVENTS.inc();
                }
                Err(broadcast::error::RecvError::Closed) => {
                    debug!("Broadcast channel closed");
                    break;
                }
            }
        }
    });

    // Handle incoming messages from client (button presses, close)
    while let Some(result) = receiver.next().await {
        match result {
            Ok(Message::Close(_)) => {
                debug!("WebSocket client requested close");
                break;
            }
            Ok(Message::Text(text)) => {
                handle_inbound_text(text.as_str(), state.votes());
            }
            Ok(_) => {
                // Ping/pong is handled by axum, binary frames are ignored
            }
            Err(e) => {
                warn!("WebSocket receive error: {}", e);
                break;
            }
        }
    }

    // Clean up
    send_task.abort();
    WS_CONNECTIONS_ACTIVE.dec();
    info!("Display client disconnected");
}
