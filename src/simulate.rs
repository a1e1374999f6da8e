//! Simulation driver
//!
//! Plays mock comparison rounds against the live store: a handful of
//! dishes is drawn at random, every pairwise combination is played, and
//! each outcome is decided by a blend of the Elo expectation and noise.
//! Simulated matches flow through the exact same update path as real
//! ones.

use crate::error::{RankingError, Result};
use crate::rating::elo::{expected_score, INITIAL_RATING};
use crate::rating::store::RatingStore;
use crate::types::{DishId, MatchOutcome, MatchRecord};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::info;

/// Dishes drawn per simulated round
pub const DISHES_PER_ROUND: usize = 5;

/// Weight of the Elo expectation in a mock outcome; the remainder is
/// noise so the favourite is likely but never guaranteed to win
const ELO_WEIGHT: f64 = 0.7;
const UPSET_FLOOR: f64 = 0.15;

/// One simulated round: the drawn dishes and every pairwise result
#[derive(Debug, Clone)]
pub struct SimulationRound {
    pub dishes: Vec<DishId>,
    pub outcomes: Vec<MatchOutcome>,
}

/// Decide a mock winner between two dishes using their current ratings.
///
/// Returns `true` when the first dish wins.
fn first_dish_wins<R: Rng>(store: &RatingStore, dish1: &str, dish2: &str, rng: &mut R) -> bool {
    let rating1 = store.get(dish1).map(|r| r.rating).unwrap_or(INITIAL_RATING);
    let rating2 = store.get(dish2).map(|r| r.rating).unwrap_or(INITIAL_RATING);

    let expected1 = expected_score(rating1, rating2);
    rng.gen::<f64>() < ELO_WEIGHT * expected1 + UPSET_FLOOR
}

/// Play one round over `menu`, applying every result to the store and
/// appending the match records to `history`.
pub fn run_round<R: Rng>(
    store: &mut RatingStore,
    history: &mut Vec<MatchRecord>,
    menu: &[DishId],
    rng: &mut R,
    dishes_per_round: usize,
    k: f64,
) -> Result<SimulationRound> {
    if menu.len() < dishes_per_round {
        return Err(RankingError::SimulationFailed {
            reason: format!(
                "need at least {} dishes to simulate, have {}",
                dishes_per_round,
                menu.len()
            ),
        }
        .into());
    }

    let dishes: Vec<DishId> = menu
        .choose_multiple(rng, dishes_per_round)
        .cloned()
        .collect();
    info!("Simulating round over {:?}", dishes);

    let mut outcomes = Vec::new();
    for i in 0..dishes.len() {
        for j in (i + 1)..dishes.len() {
            let (dish1, dish2) = (&dishes[i], &dishes[j]);
            let (winner, loser) = if first_dish_wins(store, dish1, dish2, rng) {
                (dish1, dish2)
            } else {
                (dish2, dish1)
            };

            let outcome = store.record_match(winner, loser, k)?;
            history.push(MatchRecord::new(
                outcome.winner.clone(),
                outcome.loser.clone(),
            ));
            outcomes.push(outcome);
        }
    }

    Ok(SimulationRound { dishes, outcomes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::elo::DEFAULT_K_FACTOR;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn menu(names: &[&str]) -> Vec<DishId> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_round_plays_all_pairings() {
        let mut store = RatingStore::new();
        let mut history = Vec::new();
        let mut rng = StdRng::seed_from_u64(7);
        let menu = menu(&["a", "b", "c", "d", "e", "f"]);

        let round = run_round(
            &mut store,
            &mut history,
            &menu,
            &mut rng,
            DISHES_PER_ROUND,
            DEFAULT_K_FACTOR,
        )
        .unwrap();

        // 5 dishes -> C(5,2) = 10 pairwise matches
        assert_eq!(round.dishes.len(), 5);
        assert_eq!(round.outcomes.len(), 10);
        assert_eq!(history.len(), 10);

        // Every drawn dish played exactly 4 games
        for dish in &round.dishes {
            assert_eq!(store.get(dish).unwrap().games_played, 4);
        }
    }

    #[test]
    fn test_round_is_deterministic_for_a_seed() {
        let menu = menu(&["a", "b", "c", "d", "e"]);

        let mut store1 = RatingStore::new();
        let mut store2 = RatingStore::new();
        let mut history = Vec::new();

        run_round(
            &mut store1,
            &mut history,
            &menu,
            &mut StdRng::seed_from_u64(42),
            DISHES_PER_ROUND,
            DEFAULT_K_FACTOR,
        )
        .unwrap();
        run_round(
            &mut store2,
            &mut Vec::new(),
            &menu,
            &mut StdRng::seed_from_u64(42),
            DISHES_PER_ROUND,
            DEFAULT_K_FACTOR,
        )
        .unwrap();

        assert_eq!(store1, store2);
    }

    #[test]
    fn test_too_few_dishes_fails() {
        let mut store = RatingStore::new();
        let mut rng = StdRng::seed_from_u64(0);
        let menu = menu(&["a", "b"]);

        let result = run_round(
            &mut store,
            &mut Vec::new(),
            &menu,
            &mut rng,
            DISHES_PER_ROUND,
            DEFAULT_K_FACTOR,
        );

        assert!(result.is_err());
        assert!(store.is_empty());
    }
}
