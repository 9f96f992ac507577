use serde::{Deserialize, Serialize};

use crate::artwork::Artwork;
use crate::input::VoteToken;

/// Artwork as shown on the display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtworkDto {
    pub id: i64,
    pub title: String,
    pub artist: String,
    pub filename: String,
    pub thumbnail: Option<String>,
    pub panel: String,
    pub rating: i32,
    pub duel_count: u32,
}

impl From<&Artwork> for ArtworkDto {
    fn from(artwork: &Artwork) -> Self {
        Self {
            id: artwork.id,
            title: artwork.title.clone(),
            artist: artwork.artist.clone(),
            filename: artwork.filename.clone(),
            thumbnail: artwork.thumbnail.clone(),
            panel: artwork.panel.clone(),
            rating: artwork.rating,
            duel_count: artwork.duel_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuelPayload {
    pub one: ArtworkDto,
    pub two: ArtworkDto,
}

impl DuelPayload {
    pub fn new(one: &Artwork, two: &Artwork) -> Self {
        Self {
            one: one.into(),
            two: two.into(),
        }
    }
}

/// Outcome of a resolved duel. `one` and `two` carry the updated artworks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionPayload {
    pub one: ArtworkDto,
    pub two: ArtworkDto,
    pub winner: VoteToken,
    pub one_rating_delta: i32,
    /// Positive when the artwork climbed.
    pub one_rank_delta: i64,
    pub two_rating_delta: i32,
    pub two_rank_delta: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardPayload {
    pub count: usize,
    pub entries: Vec<ArtworkDto>,
}

impl LeaderboardPayload {
    pub fn new(artworks: &[Artwork]) -> Self {
        Self {
            count: artworks.len(),
            entries: artworks.iter().map(ArtworkDto::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplashPayload {
    pub duel_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub message: String,
}

/// A message for the display clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BroadcastMessage {
    Duel(DuelPayload),
    Timeout(DuelPayload),
    Decision(DecisionPayload),
    Leaderboard(LeaderboardPayload),
    Splash(SplashPayload),
    Error(ErrorPayload),
}

impl BroadcastMessage {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Duel(_) => "DUEL",
            Self::Timeout(_) => "TIMEOUT",
            Self::Decision(_) => "DECISION",
            Self::Leaderboard(_) => "LEADERBOARD",
            Self::Splash(_) => "SPLASH",
            Self::Error(_) => "ERROR",
        }
    }

    /// Render as the `TAG: <json>` wire text.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        let json = match self {
            Self::Duel(p) | Self::Timeout(p) => serde_json::to_string(p)?,
            Self::Decision(p) => serde_json::to_string(p)?,
            Self::Leaderboard(p) => serde_json::to_string(p)?,
            Self::Splash(p) => serde_json::to_string(p)?,
            Self::Error(p) => serde_json::to_string(p)?,
        };
        Ok(format!("{}: {}", self.tag(), json))
    }
}

/// Tag of an encoded wire message, or "unknown".
pub fn message_tag(message: &str) -> &str {
    match message.split_once(':') {
        Some((tag, _)) if !tag.is_empty() && tag.bytes().all(|b| b.is_ascii_uppercase()) => tag,
        _ => "unknown",
    }
}
