//! Utility functions for the ranking system

use chrono::{DateTime, Utc};

/// Get the current UTC timestamp
pub fn current_timestamp() -> DateTime<Utc> {
    Utc::now()
}

/// Round a rating for display; storage always keeps full precision
pub fn display_rating(rating: f64) -> f64 {
    (rating * 10.0).round() / 10.0
}
