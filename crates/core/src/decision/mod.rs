//! Decision processing: apply a vote to the pair in play.
//!
//! The whole read-modify-write runs inside one repository transaction, so a
//! failure at any step leaves ratings, duel counts and the duel log untouched.

use chrono::Utc;
use tracing::info;

use crate::artwork::{Artwork, ArtworkQueries, ArtworkRepository, DuelRecord, RepositoryError};
use crate::broadcast::DecisionPayload;
use crate::input::VoteToken;
use crate::metrics;
use crate::rating::rating_adjustments;

/// Result of a processed decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionOutcome {
    /// Both artworks as persisted.
    pub one: Artwork,
    pub two: Artwork,
    pub winner: VoteToken,
    pub one_rating_delta: i32,
    pub two_rating_delta: i32,
    /// Old rank minus new rank; positive means the artwork climbed.
    pub one_rank_delta: i64,
    pub two_rank_delta: i64,
    pub duel_id: i64,
}

impl DecisionOutcome {
    pub fn to_payload(&self) -> DecisionPayload {
        DecisionPayload {
            one: (&self.one).into(),
            two: (&self.two).into(),
            winner: self.winner,
            one_rating_delta: self.one_rating_delta,
            one_rank_delta: self.one_rank_delta,
            two_rating_delta: self.two_rating_delta,
            two_rank_delta: self.two_rank_delta,
        }
    }
}

/// Applies votes to the repository.
#[derive(Debug, Clone)]
pub struct DecisionProcessor {
    k_factor: f64,
}

impl DecisionProcessor {
    pub fn new(k_factor: f64) -> Self {
        Self { k_factor }
    }

    /// Resolve the duel between `one` and `two` in favour of `vote`.
    ///
    /// Ratings and duel counts are re-read inside the transaction; the passed
    /// artworks only identify the pair.
    pub fn process<R>(
        &self,
        repo: &R,
        one: &Artwork,
        two: &Artwork,
        vote: VoteToken,
    ) -> Result<DecisionOutcome, RepositoryError>
    where
        R: ArtworkRepository + ?Sized,
    {
        let mut outcome = None;
        repo.run_transaction(&mut |tx| {
            outcome = Some(self.apply(tx, one.id, two.id, vote)?);
            Ok(())
        })?;

        let outcome = outcome.ok_or_else(|| {
            RepositoryError::Database("transaction committed without an outcome".to_string())
        })?;

        metrics::DECISIONS
            .with_label_values(&[vote.as_str()])
            .inc();
        metrics::RATING_SWING
            .with_label_values(&[])
            .observe(f64::from(outcome.one_rating_delta.abs()));

        info!(
            one = outcome.one.id,
            two = outcome.two.id,
            winner = %vote,
            one_rating = outcome.one.rating,
            two_rating = outcome.two.rating,
            "Decision recorded"
        );

        Ok(outcome)
    }

    fn apply(
        &self,
        tx: &dyn ArtworkQueries,
        one_id: i64,
        two_id: i64,
        vote: VoteToken,
    ) -> Result<DecisionOutcome, RepositoryError> {
        let mut one = tx.artwork(one_id)?;
        let mut two = tx.artwork(two_id)?;

        let one_rank_before = tx.rank(&one)?;
        let two_rank_before = tx.rank(&two)?;

        let (one_rating_delta, two_rating_delta) = match vote {
            VoteToken::One => {
                let adj = rating_adjustments(one.rating, two.rating, self.k_factor);
                (adj.winner, adj.loser)
            }
            VoteToken::Two => {
                let adj = rating_adjustments(two.rating, one.rating, self.k_factor);
                (adj.loser, adj.winner)
            }
        };

        one.rating += one_rating_delta;
        two.rating += two_rating_delta;
        one.duel_count += 1;
        two.duel_count += 1;

        tx.update_artwork(&one)?;
        tx.update_artwork(&two)?;

        let winner = match vote {
            VoteToken::One => one.id,
            VoteToken::Two => two.id,
        };
        let duel_id = tx.append_duel(&DuelRecord {
            duelist_one: one.id,
            duelist_two: two.id,
            winner,
            decided_at: Utc::now(),
        })?;

        let one_rank_delta = one_rank_before - tx.rank(&one)?;
        let two_rank_delta = two_rank_before - tx.rank(&two)?;

        Ok(DecisionOutcome {
            one,
            two,
            winner: vote,
            one_rating_delta,
            two_rating_delta,
            one_rank_delta,
            two_rank_delta,
            duel_id,
        })
    }
}
