//! Broadcast sink for display clients.
//!
//! Every message is a UTF-8 text frame of the form `TAG: <json>`.

mod messages;
mod sink;

pub use messages::{
    message_tag, ArtworkDto, BroadcastMessage, DecisionPayload, DuelPayload, ErrorPayload,
    LeaderboardPayload, SplashPayload,
};
pub use sink::{Broadcaster, Subscription, DEFAULT_CAPACITY};
