//! In-memory rating store
//!
//! The store owns the identity → (rating, games played) mapping. It is an
//! explicit value passed to and returned from every core operation; there
//! is no hidden global, and callers serialize access themselves (one
//! logical session per store instance).

use crate::error::RankingError;
use crate::identity;
use crate::rating::elo;
use crate::types::{DishId, MatchOutcome, RatingRecord, StoreDocument};
use crate::utils::current_timestamp;
use std::collections::BTreeMap;
use tracing::debug;

/// Mapping from dish identity to its rating record.
///
/// Keys are stored verbatim when loaded from a document — a legacy store
/// may still contain compound (`"name | alternate"`) keys until a
/// consolidation pass rewrites them. New matches are always recorded
/// under canonical identities.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RatingStore {
    records: BTreeMap<DishId, RatingRecord>,
}

impl RatingStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of dishes with a rating record
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a dish by its canonical identity
    pub fn get(&self, dish: &str) -> Option<&RatingRecord> {
        self.records.get(identity::canonical(dish))
    }

    /// Iterate records in deterministic (lexicographic) key order
    pub fn iter(&self) -> impl Iterator<Item = (&DishId, &RatingRecord)> {
        self.records.iter()
    }

    /// Insert a record under a raw key, preserving the key verbatim.
    ///
    /// Used when rebuilding a store from loaded or consolidated data;
    /// normal ingestion goes through `record_match`.
    pub fn insert_raw(&mut self, dish: impl Into<DishId>, record: RatingRecord) {
        self.records.insert(dish.into(), record);
    }

    /// Total games played across all records.
    ///
    /// Each match counts twice (once per side).
    pub fn total_games(&self) -> u64 {
        self.records.values().map(|r| r.games_played).sum()
    }

    /// Apply one match outcome to the store.
    ///
    /// Both identities are normalized before any arithmetic. Records are
    /// created lazily at the initial rating on a dish's first match. A
    /// match where winner and loser normalize to the same identity is
    /// rejected and leaves the store untouched.
    pub fn record_match(
        &mut self,
        winner: &str,
        loser: &str,
        k: f64,
    ) -> Result<MatchOutcome, RankingError> {
        let winner = identity::canonical(winner).to_string();
        let loser = identity::canonical(loser).to_string();

        if winner == loser {
            return Err(RankingError::InvalidMatch { dish: winner });
        }

        let mut winner_record = self.records.get(&winner).cloned().unwrap_or_default();
        let mut loser_record = self.records.get(&loser).cloned().unwrap_or_default();

        let (winner_delta, loser_delta) =
            elo::apply_match(&mut winner_record, &mut loser_record, k);

        debug!(
            "{} beat {} ({:+.1} / {:+.1})",
            winner, loser, winner_delta, loser_delta
        );

        self.records.insert(winner.clone(), winner_record);
        self.records.insert(loser.clone(), loser_record);

        Ok(MatchOutcome {
            winner,
            loser,
            winner_delta,
            loser_delta,
        })
    }

    /// Rebuild a store from a persisted document.
    ///
    /// A dish present in `elo` but missing from `games_played` loads with
    /// zero games; a games entry without a rating loads at the initial
    /// rating.
    pub fn from_document(document: StoreDocument) -> Self {
        let StoreDocument {
            elo: ratings,
            games_played,
            ..
        } = document;

        let mut records: BTreeMap<DishId, RatingRecord> = BTreeMap::new();

        for (dish, rating) in ratings {
            let games = games_played.get(&dish).copied().unwrap_or(0);
            records.insert(dish, RatingRecord::new(rating, games));
        }
        for (dish, games) in games_played {
            records
                .entry(dish)
                .or_insert_with(|| RatingRecord::new(elo::INITIAL_RATING, games));
        }

        Self { records }
    }

    /// Snapshot the store into its persisted layout, stamped now
    pub fn to_document(&self) -> StoreDocument {
        StoreDocument {
            elo: self
                .records
                .iter()
                .map(|(dish, record)| (dish.clone(), record.rating))
                .collect(),
            games_played: self
                .records
                .iter()
                .map(|(dish, record)| (dish.clone(), record.games_played))
                .collect(),
            last_updated: Some(current_timestamp()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::elo::DEFAULT_K_FACTOR;
    use std::collections::BTreeMap;

    #[test]
    fn test_lazy_creation_on_first_match() {
        let mut store = RatingStore::new();
        assert!(store.is_empty());

        let outcome = store.record_match("炒饭", "白粥", DEFAULT_K_FACTOR).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(outcome.winner, "炒饭");
        assert!((store.get("炒饭").unwrap().rating - 1516.0).abs() < 1e-9);
        assert!((store.get("白粥").unwrap().rating - 1484.0).abs() < 1e-9);
        assert_eq!(store.get("炒饭").unwrap().games_played, 1);
        assert_eq!(store.get("白粥").unwrap().games_played, 1);
    }

    #[test]
    fn test_compound_names_share_one_record() {
        let mut store = RatingStore::new();

        store
            .record_match("牛肉面 | beef noodle", "白粥", DEFAULT_K_FACTOR)
            .unwrap();
        store.record_match("牛肉面", "白粥", DEFAULT_K_FACTOR).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.get("牛肉面").unwrap().games_played, 2);
    }

    #[test]
    fn test_self_match_is_rejected_and_harmless() {
        let mut store = RatingStore::new();

        let err = store
            .record_match("炒饭", "炒饭 | fried rice", DEFAULT_K_FACTOR)
            .unwrap_err();

        match err {
            RankingError::InvalidMatch { dish } => assert_eq!(dish, "炒饭"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(store.is_empty());
    }

    #[test]
    fn test_document_round_trip() {
        let mut store = RatingStore::new();
        store.record_match("盐酥鸡", "咖喱鱼丸", DEFAULT_K_FACTOR).unwrap();

        let document = store.to_document();
        assert!(document.last_updated.is_some());

        let reloaded = RatingStore::from_document(document);
        assert_eq!(reloaded, store);
    }

    #[test]
    fn test_from_document_defaults_missing_games_to_zero() {
        let document = StoreDocument {
            elo: BTreeMap::from([("卤肉饭".to_string(), 1540.0)]),
            games_played: BTreeMap::new(),
            last_updated: None,
        };

        let store = RatingStore::from_document(document);
        let record = store.get("卤肉饭").unwrap();
        assert_eq!(record.rating, 1540.0);
        assert_eq!(record.games_played, 0);
    }

    #[test]
    fn test_total_games_counts_both_sides() {
        let mut store = RatingStore::new();
        store.record_match("a", "b", DEFAULT_K_FACTOR).unwrap();
        store.record_match("a", "c", DEFAULT_K_FACTOR).unwrap();

        assert_eq!(store.total_games(), 4);
    }
}
