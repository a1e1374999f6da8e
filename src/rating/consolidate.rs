//! Consolidation of duplicate dish identities
//!
//! A dish recorded under both a compound name (`"牛肉面 | beef noodle"`)
//! and its bare canonical form accumulates two separate rating records.
//! Consolidation merges every such duplicate group into one canonical
//! record, rewrites the match history to canonical identities, and
//! verifies the merged game counts against the rewritten history.

use crate::identity;
use crate::rating::store::RatingStore;
use crate::types::{DishId, MatchRecord, RatingRecord};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// One duplicate group that was merged
#[derive(Debug, Clone, PartialEq)]
pub struct MergeGroup {
    pub canonical: DishId,
    /// Raw variants that mapped to this canonical identity
    pub variants: Vec<DishId>,
    /// Variant whose rating was carried forward
    pub source_variant: DishId,
    pub carried_rating: f64,
    pub total_games: u64,
}

/// Per-dish comparison between stored and recomputed game counts
#[derive(Debug, Clone, PartialEq)]
pub struct GameCountCheck {
    pub dish: DishId,
    pub stored: u64,
    pub recomputed: u64,
}

impl GameCountCheck {
    pub fn is_consistent(&self) -> bool {
        self.stored == self.recomputed
    }
}

/// Full result of a consolidation run
#[derive(Debug, Clone)]
pub struct ConsolidationOutcome {
    pub store: RatingStore,
    pub history: Vec<MatchRecord>,
    pub merges: Vec<MergeGroup>,
    /// Verification report, one entry per consolidated dish. Mismatches
    /// are data-quality signals and are never auto-corrected.
    pub checks: Vec<GameCountCheck>,
}

impl ConsolidationOutcome {
    /// Dishes whose stored game count disagrees with the history
    pub fn mismatches(&self) -> impl Iterator<Item = &GameCountCheck> {
        self.checks.iter().filter(|check| !check.is_consistent())
    }
}

/// Merge duplicate identities and rewrite history to canonical names.
///
/// For a duplicate group the carried rating is taken verbatim from the
/// variant with the most games played (a deliberate simplification — no
/// averaging), while game counts are summed across all variants. Ties on
/// the game count break toward the lexicographically smallest raw
/// variant, which makes the pass deterministic.
///
/// The caller persists the returned store and history as the new
/// canonical state, retiring the raw one.
pub fn consolidate(store: &RatingStore, history: &[MatchRecord]) -> ConsolidationOutcome {
    // Group raw variants by canonical identity. BTreeMap iteration makes
    // both the grouping and the tie-break order deterministic.
    let mut groups: BTreeMap<DishId, Vec<(&DishId, &RatingRecord)>> = BTreeMap::new();
    for (raw, record) in store.iter() {
        groups
            .entry(identity::canonical(raw).to_string())
            .or_default()
            .push((raw, record));
    }

    let mut consolidated = RatingStore::new();
    let mut merges = Vec::new();

    for (canonical, variants) in &groups {
        if let [(_, record)] = variants.as_slice() {
            consolidated.insert_raw(canonical.clone(), (*record).clone());
            continue;
        }

        // Strict > keeps the first (lexicographically smallest) variant
        // on equal game counts.
        let (source_variant, source_record) = variants
            .iter()
            .fold(variants[0], |best, &candidate| {
                if candidate.1.games_played > best.1.games_played {
                    candidate
                } else {
                    best
                }
            });

        let total_games: u64 = variants.iter().map(|(_, r)| r.games_played).sum();

        info!(
            "Merging {} variants of '{}': carrying rating {:.1} from '{}', {} games total",
            variants.len(),
            canonical,
            source_record.rating,
            source_variant,
            total_games
        );

        consolidated.insert_raw(
            canonical.clone(),
            RatingRecord::new(source_record.rating, total_games),
        );
        merges.push(MergeGroup {
            canonical: canonical.clone(),
            variants: variants.iter().map(|(raw, _)| (*raw).clone()).collect(),
            source_variant: (*source_variant).clone(),
            carried_rating: source_record.rating,
            total_games,
        });
    }

    // Rewrite history through the normalizer, preserving order and any
    // pass-through fields.
    let history: Vec<MatchRecord> = history
        .iter()
        .map(|record| MatchRecord {
            winner: identity::canonical(&record.winner).to_string(),
            loser: identity::canonical(&record.loser).to_string(),
            played_at: record.played_at,
            extra: record.extra.clone(),
        })
        .collect();

    let checks = verify_game_counts(&consolidated, &history);
    for check in checks.iter().filter(|c| !c.is_consistent()) {
        warn!(
            "Game count mismatch for '{}': stored={}, recomputed from history={}",
            check.dish, check.stored, check.recomputed
        );
    }

    ConsolidationOutcome {
        store: consolidated,
        history,
        merges,
        checks,
    }
}

/// Recompute per-dish appearance counts from the rewritten history and
/// compare them against the consolidated store.
fn verify_game_counts(store: &RatingStore, history: &[MatchRecord]) -> Vec<GameCountCheck> {
    let mut appearances: BTreeMap<&str, u64> = BTreeMap::new();
    for record in history {
        *appearances.entry(record.winner.as_str()).or_insert(0) += 1;
        *appearances.entry(record.loser.as_str()).or_insert(0) += 1;
    }

    store
        .iter()
        .map(|(dish, record)| GameCountCheck {
            dish: dish.clone(),
            stored: record.games_played,
            recomputed: appearances.get(dish.as_str()).copied().unwrap_or(0),
        })
        .collect()
}
