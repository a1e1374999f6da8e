//! Common types used throughout the ranking system

use crate::error::RankingError;
use crate::rating::elo::INITIAL_RATING;
use crate::utils::current_timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Canonical identifier for a dish
pub type DishId = String;

/// Rating state for a single dish
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingRecord {
    pub rating: f64,
    pub games_played: u64,
}

impl Default for RatingRecord {
    fn default() -> Self {
        Self {
            rating: INITIAL_RATING,
            games_played: 0,
        }
    }
}

impl RatingRecord {
    /// Create a record carried over from an existing store
    pub fn new(rating: f64, games_played: u64) -> Self {
        Self {
            rating,
            games_played,
        }
    }
}

/// One recorded match between two dishes
///
/// Fields beyond winner/loser are passed through unchanged so external
/// collaborators can attach their own metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub winner: DishId,
    pub loser: DishId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub played_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl MatchRecord {
    /// Create a fresh record timestamped now
    pub fn new(winner: impl Into<DishId>, loser: impl Into<DishId>) -> Self {
        Self {
            winner: winner.into(),
            loser: loser.into(),
            played_at: Some(current_timestamp()),
            extra: serde_json::Map::new(),
        }
    }
}

/// Result of applying one match to the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub winner: DishId,
    pub loser: DishId,
    pub winner_delta: f64,
    pub loser_delta: f64,
}

/// Persisted store layout
///
/// `elo` and `games_played` are required on load; `last_updated` is
/// informational only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreDocument {
    pub elo: BTreeMap<DishId, f64>,
    pub games_played: BTreeMap<DishId, u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl StoreDocument {
    /// Parse a store document, requiring both rating maps to be present.
    ///
    /// A document without `elo` or `games_played` is malformed and fails
    /// with `MissingField` naming the absent key. A malformed
    /// `last_updated` is ignored rather than rejected.
    pub fn from_value(value: serde_json::Value) -> Result<Self, RankingError> {
        let object = match value {
            serde_json::Value::Object(map) => map,
            _ => {
                return Err(RankingError::StorageError {
                    message: "Store document is not a JSON object".to_string(),
                })
            }
        };

        let elo = required_map(&object, "elo", |v| v.as_f64())?;
        let games_played = required_map(&object, "games_played", |v| v.as_u64())?;

        let last_updated = object
            .get("last_updated")
            .and_then(|v| v.as_str())
            .and_then(|s| s.parse::<DateTime<Utc>>().ok());

        Ok(Self {
            elo,
            games_played,
            last_updated,
        })
    }
}

fn required_map<T>(
    object: &serde_json::Map<String, serde_json::Value>,
    field: &str,
    convert: impl Fn(&serde_json::Value) -> Option<T>,
) -> Result<BTreeMap<DishId, T>, RankingError> {
    let value = object.get(field).ok_or_else(|| RankingError::MissingField {
        field: field.to_string(),
    })?;

    let entries = value
        .as_object()
        .ok_or_else(|| RankingError::StorageError {
            message: format!("Field '{field}' is not a JSON object"),
        })?;

    let mut map = BTreeMap::new();
    for (dish, raw) in entries {
        let converted = convert(raw).ok_or_else(|| RankingError::StorageError {
            message: format!("Field '{field}' has a non-numeric value for '{dish}'"),
        })?;
        map.insert(dish.clone(), converted);
    }

    Ok(map)
}
