//! Repository contract for artworks and the duel log.

use thiserror::Error;

use super::{Artwork, DuelRecord, NewArtwork};

/// Error type for repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),
}

/// Queries and updates available both directly and inside a transaction.
pub trait ArtworkQueries {
    /// Get an artwork by id.
    fn artwork(&self, id: i64) -> Result<Artwork, RepositoryError>;

    /// Look up an artwork by its image filename.
    fn artwork_by_filename(&self, filename: &str) -> Result<Option<Artwork>, RepositoryError>;

    /// The artwork most in need of exposure; ties go to the lowest id.
    fn artwork_with_lowest_duel_count(&self) -> Result<Artwork, RepositoryError>;

    /// Matchmaking pool of at most `count` artworks rated close to `benchmark`,
    /// ordered by rating ascending. Never contains the benchmark itself.
    fn artworks_with_similar_rating(
        &self,
        benchmark: &Artwork,
        count: usize,
    ) -> Result<Vec<Artwork>, RepositoryError>;

    /// 1 + number of artworks rated strictly higher than `artwork`.
    fn rank(&self, artwork: &Artwork) -> Result<i64, RepositoryError>;

    /// Persist every mutable field of an existing artwork.
    fn update_artwork(&self, artwork: &Artwork) -> Result<(), RepositoryError>;

    /// Append a duel log record, returning its id.
    fn append_duel(&self, duel: &DuelRecord) -> Result<i64, RepositoryError>;

    /// Top `limit` artworks by rating descending, ties by id ascending.
    fn leaderboard(&self, limit: usize) -> Result<Vec<Artwork>, RepositoryError>;

    /// Number of resolved duels.
    fn total_duel_count(&self) -> Result<u64, RepositoryError>;

    /// Add a new artwork.
    fn insert_artwork(&self, artwork: NewArtwork) -> Result<Artwork, RepositoryError>;
}

/// A repository that can group queries into one all-or-nothing unit.
pub trait ArtworkRepository: ArtworkQueries + Send + Sync {
    /// Run `work` inside a transaction.
    ///
    /// Everything `work` does through the given handle commits together when it
    /// returns `Ok`, and is rolled back when it returns `Err`.
    fn run_transaction(
        &self,
        work: &mut dyn FnMut(&dyn ArtworkQueries) -> Result<(), RepositoryError>,
    ) -> Result<(), RepositoryError>;
}
