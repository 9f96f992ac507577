use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Rating given to an artwork that has never been in a duel.
pub const DEFAULT_RATING: i32 = 800;

/// A piece in the show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artwork {
    pub id: i64,
    pub title: String,
    pub artist: String,
    /// Panel or category label.
    pub panel: String,
    /// Image file, relative to the images directory.
    pub filename: String,
    pub thumbnail: Option<String>,
    pub rating: i32,
    /// Resolved duels this artwork took part in. Never decreases.
    pub duel_count: u32,
}

/// An artwork as handed over by the ingestion side, before it has an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewArtwork {
    pub title: String,
    pub artist: String,
    pub panel: String,
    pub filename: String,
    pub thumbnail: Option<String>,
    /// Starting rating; the store's default applies when unset.
    pub rating: Option<i32>,
}

impl NewArtwork {
    pub fn new(
        title: impl Into<String>,
        artist: impl Into<String>,
        panel: impl Into<String>,
        filename: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            panel: panel.into(),
            filename: filename.into(),
            thumbnail: None,
            rating: None,
        }
    }

    pub fn with_thumbnail(mut self, thumbnail: impl Into<String>) -> Self {
        self.thumbnail = Some(thumbnail.into());
        self
    }

    pub fn with_rating(mut self, rating: i32) -> Self {
        self.rating = Some(rating);
        self
    }
}

/// Log entry for one resolved decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuelRecord {
    pub duelist_one: i64,
    pub duelist_two: i64,
    pub winner: i64,
    pub decided_at: DateTime<Utc>,
}
