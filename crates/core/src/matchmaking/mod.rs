//! Contender selection.
//!
//! The benchmark is the artwork with the fewest duels; its opponent is drawn
//! uniformly from a pool of artworks rated close to it.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::debug;

use crate::artwork::{Artwork, ArtworkQueries, RepositoryError};

/// Default number of artworks considered as opponent.
pub const DEFAULT_POOL_SIZE: usize = 50;

#[derive(Debug, Error)]
pub enum MatchmakingError {
    #[error("no eligible contenders for artwork {0}")]
    NoContendersAvailable(i64),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Picks the two artworks for the next duel.
pub struct ContenderSelector<R = StdRng> {
    pool_size: usize,
    rng: R,
}

impl ContenderSelector<StdRng> {
    pub fn new(pool_size: usize) -> Self {
        Self::with_rng(pool_size, StdRng::from_entropy())
    }

    /// Selector with a reproducible opponent order.
    pub fn seeded(pool_size: usize, seed: u64) -> Self {
        Self::with_rng(pool_size, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> ContenderSelector<R> {
    pub fn with_rng(pool_size: usize, rng: R) -> Self {
        Self { pool_size, rng }
    }

    pub fn pool_size(&self) -> usize {
        self.pool_size
    }

    /// Pick an opponent for `benchmark` from the similar-rating pool.
    pub fn select_opponent<Q>(
        &mut self,
        repo: &Q,
        benchmark: &Artwork,
    ) -> Result<Artwork, MatchmakingError>
    where
        Q: ArtworkQueries + ?Sized,
    {
        let mut pool = repo.artworks_with_similar_rating(benchmark, self.pool_size)?;
        if pool.is_empty() {
            return Err(MatchmakingError::NoContendersAvailable(benchmark.id));
        }

        let index = self.rng.gen_range(0..pool.len());
        debug!(
            benchmark = benchmark.id,
            pool = pool.len(),
            index,
            "Selected opponent from pool"
        );
        Ok(pool.swap_remove(index))
    }

    /// Select the next pair: the least-dueled artwork first, its opponent second.
    pub fn select_duel<Q>(&mut self, repo: &Q) -> Result<(Artwork, Artwork), MatchmakingError>
    where
        Q: ArtworkQueries + ?Sized,
    {
        let benchmark = repo.artwork_with_lowest_duel_count()?;
        let opponent = self.select_opponent(repo, &benchmark)?;
        Ok((benchmark, opponent))
    }
}
