//! Artwork records, the append-only duel log and the repository contract
//! consumed by the duel loop.

mod pool;
mod sqlite_store;
mod store;
mod types;

pub use pool::{assemble_pool, lower_pool_size};
pub use sqlite_store::SqliteArtworkStore;
pub use store::{ArtworkQueries, ArtworkRepository, RepositoryError};
pub use types::{Artwork, DuelRecord, NewArtwork, DEFAULT_RATING};
