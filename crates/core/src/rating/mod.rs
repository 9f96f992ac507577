//! Paired-comparison (Elo) rating engine.
//!
//! Pure arithmetic, no I/O. The swing is zero-sum: the winner gains exactly
//! what the loser gives up, and is never smaller than [`MIN_SWING`].

use serde::Serialize;

/// Smallest number of points a decided duel moves.
pub const MIN_SWING: i32 = 1;

/// Rating change for both sides of a decided duel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RatingAdjustment {
    /// Points added to the winner (always positive).
    pub winner: i32,
    /// Points added to the loser (always negative).
    pub loser: i32,
}

/// Probability that `rating` beats `opponent`.
pub fn expected_score(rating: i32, opponent: i32) -> f64 {
    let exponent = f64::from(opponent - rating) / 400.0;
    1.0 / (1.0 + 10f64.powf(exponent))
}

/// Compute the adjustment for `winner` beating `loser` with factor `k_factor`.
pub fn rating_adjustments(winner: i32, loser: i32, k_factor: f64) -> RatingAdjustment {
    let expected = expected_score(winner, loser);
    // f64::round rounds half away from zero.
    let swing = (k_factor * (1.0 - expected)).round() as i32;
    let swing = swing.max(MIN_SWING);

    RatingAdjustment {
        winner: swing,
        loser: -swing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_score_equal_ratings() {
        assert!((expected_score(800, 800) - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_expected_scores_are_complementary() {
        let a = expected_score(1200, 800);
        let b = expected_score(800, 1200);
        assert!((a + b - 1.0).abs() < 1e-12);
        assert!(a > 0.9);
    }

    #[test]
    fn test_equal_ratings_swing_half_k() {
        let adj = rating_adjustments(800, 800, 16.0);
        assert_eq!(adj, RatingAdjustment { winner: 8, loser: -8 });
        assert_eq!(800 + adj.winner, 808);
        assert_eq!(800 + adj.loser, 792);
    }

    #[test]
    fn test_favorite_wins_small_swing() {
        let adj = rating_adjustments(1200, 800, 16.0);
        assert_eq!(adj.winner, 1);
        assert_eq!(1200 + adj.winner, 1201);
        assert_eq!(800 + adj.loser, 799);
    }

    #[test]
    fn test_underdog_upset_large_swing() {
        let adj = rating_adjustments(800, 1200, 16.0);
        assert_eq!(adj.winner, 15);
        assert_eq!(800 + adj.winner, 815);
        assert_eq!(1200 + adj.loser, 1185);
    }

    #[test]
    fn test_swing_floored_for_lopsided_duel() {
        // Expected swing rounds to 0 here.
        let adj = rating_adjustments(3000, 100, 16.0);
        assert_eq!(adj.winner, MIN_SWING);
        assert_eq!(adj.loser, -MIN_SWING);
    }

    #[test]
    fn test_loser_not_clamped_at_zero() {
        let adj = rating_adjustments(800, 5, 16.0);
        assert!(5 + adj.loser < 5);
        assert_eq!(adj.winner + adj.loser, 0);
    }

    #[test]
    fn test_k_factor_scales_swing() {
        let adj = rating_adjustments(800, 800, 32.0);
        assert_eq!(adj.winner, 16);
    }
}
