//! Elo update math
//!
//! Standard logistic Elo with binary outcomes (win = 1, loss = 0, no
//! draws). Ratings are stored unrounded; rounding happens at display
//! time only.

use crate::types::RatingRecord;

/// Rating assigned to a dish on its first recorded match
pub const INITIAL_RATING: f64 = 1500.0;

/// Default update-speed constant
pub const DEFAULT_K_FACTOR: f64 = 32.0;

/// Expected score of a player rated `ra` against one rated `rb`
pub fn expected_score(ra: f64, rb: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf((rb - ra) / 400.0))
}

/// Apply one match outcome to the two records in place.
///
/// Returns `(winner_delta, loser_delta)`. Because `Ea + Eb == 1`, the
/// deltas are always exact negatives of each other.
pub fn apply_match(winner: &mut RatingRecord, loser: &mut RatingRecord, k: f64) -> (f64, f64) {
    let ra = winner.rating;
    let rb = loser.rating;

    let ea = expected_score(ra, rb);
    let eb = 1.0 - ea;

    winner.rating = ra + k * (1.0 - ea);
    loser.rating = rb + k * (0.0 - eb);

    winner.games_played += 1;
    loser.games_played += 1;

    (winner.rating - ra, loser.rating - rb)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_expected_score_even_match() {
        assert!((expected_score(1500.0, 1500.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_expected_score_favors_higher_rating() {
        let favorite = expected_score(1700.0, 1500.0);
        let underdog = expected_score(1500.0, 1700.0);
        assert!(favorite > 0.5);
        assert!(underdog < 0.5);
        assert!((favorite + underdog - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_fresh_dishes_split_sixteen_points() {
        let mut winner = RatingRecord::default();
        let mut loser = RatingRecord::default();

        let (winner_delta, loser_delta) =
            apply_match(&mut winner, &mut loser, DEFAULT_K_FACTOR);

        assert!((winner.rating - 1516.0).abs() < 1e-9);
        assert!((loser.rating - 1484.0).abs() < 1e-9);
        assert!((winner_delta - 16.0).abs() < 1e-9);
        assert!((loser_delta + 16.0).abs() < 1e-9);
        assert_eq!(winner.games_played, 1);
        assert_eq!(loser.games_played, 1);
    }

    #[test]
    fn test_upset_moves_more_points() {
        let mut underdog = RatingRecord::new(1400.0, 10);
        let mut favorite = RatingRecord::new(1600.0, 10);

        let (winner_delta, _) = apply_match(&mut underdog, &mut favorite, DEFAULT_K_FACTOR);

        // Beating a stronger opponent pays out more than the even-match 16
        assert!(winner_delta > 16.0);
    }

    proptest! {
        #[test]
        fn prop_deltas_are_antisymmetric(
            ra in 800.0f64..2400.0,
            rb in 800.0f64..2400.0,
        ) {
            let mut winner = RatingRecord::new(ra, 0);
            let mut loser = RatingRecord::new(rb, 0);

            let (winner_delta, loser_delta) =
                apply_match(&mut winner, &mut loser, DEFAULT_K_FACTOR);

            prop_assert!((winner_delta + loser_delta).abs() < 1e-9);
            prop_assert!(winner_delta > 0.0);
            prop_assert_eq!(winner.games_played, 1);
            prop_assert_eq!(loser.games_played, 1);
        }
    }
}
