//! Dish Arena - Elo rankings for restaurant dishes
//!
//! This crate maintains pairwise-comparison (Elo) ratings for dishes,
//! deduplicates dish identities recorded under inconsistent names, and
//! produces official/provisional ranking reports.

pub mod config;
pub mod error;
pub mod identity;
pub mod ingest;
pub mod persist;
pub mod rating;
pub mod report;
pub mod simulate;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use error::{RankingError, Result};
pub use types::*;

// Re-export key components
pub use rating::consolidate::{consolidate, ConsolidationOutcome};
pub use rating::store::RatingStore;
pub use report::{rank, RankingReport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
