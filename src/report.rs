//! Ranking reports
//!
//! Read-only projection of the rating store into official and
//! provisional tiers. The reporter returns ordered data only; rendering
//! belongs to the caller.

use crate::rating::store::RatingStore;
use crate::types::DishId;
use serde::{Deserialize, Serialize};

/// Games played required for an official ranking
pub const OFFICIAL_GAMES_THRESHOLD: u64 = 3;

/// One row of a ranking report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedDish {
    pub dish: DishId,
    pub rating: f64,
    pub games_played: u64,
}

/// Official and provisional tiers, each sorted by rating descending
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankingReport {
    pub official: Vec<RankedDish>,
    pub provisional: Vec<RankedDish>,
}

impl RankingReport {
    pub fn is_empty(&self) -> bool {
        self.official.is_empty() && self.provisional.is_empty()
    }
}

/// Summary statistics over the whole store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreStats {
    pub total_dishes: usize,
    pub total_games: u64,
    pub official_count: usize,
    pub provisional_count: usize,
}

/// Partition the store into tiers with the default games threshold
pub fn rank(store: &RatingStore) -> RankingReport {
    rank_with_threshold(store, OFFICIAL_GAMES_THRESHOLD)
}

/// Partition the store into tiers.
///
/// Dishes with zero games are excluded entirely; they exist only as
/// placeholders and never occur through normal lazy creation. Entries
/// are gathered in key order and stably sorted, so equal ratings fall
/// back to lexicographic dish order.
pub fn rank_with_threshold(store: &RatingStore, official_games: u64) -> RankingReport {
    let mut official = Vec::new();
    let mut provisional = Vec::new();

    for (dish, record) in store.iter() {
        let row = RankedDish {
            dish: dish.clone(),
            rating: record.rating,
            games_played: record.games_played,
        };
        if record.games_played >= official_games {
            official.push(row);
        } else if record.games_played > 0 {
            provisional.push(row);
        }
    }

    sort_by_rating(&mut official);
    sort_by_rating(&mut provisional);

    RankingReport {
        official,
        provisional,
    }
}

/// Compute summary statistics for display
pub fn stats(store: &RatingStore, report: &RankingReport) -> StoreStats {
    StoreStats {
        total_dishes: store.len(),
        total_games: store.total_games(),
        official_count: report.official.len(),
        provisional_count: report.provisional.len(),
    }
}

fn sort_by_rating(rows: &mut [RankedDish]) {
    rows.sort_by(|a, b| {
        b.rating
            .partial_cmp(&a.rating)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}
