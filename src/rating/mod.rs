//! Elo rating engine, store, and consolidation
//!
//! This module provides the rating update math, the in-memory rating
//! store, and the consolidation pass that merges duplicate dish
//! identities.

pub mod consolidate;
pub mod elo;
pub mod store;

// Re-export commonly used types
pub use consolidate::{consolidate, ConsolidationOutcome, GameCountCheck, MergeGroup};
pub use elo::{expected_score, DEFAULT_K_FACTOR, INITIAL_RATING};
pub use store::RatingStore;
