//! Error types for the ranking system
//!
//! This module defines all error types using anyhow for consistent error
//! handling throughout the application.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific ranking scenarios
#[derive(Debug, thiserror::Error)]
pub enum RankingError {
    #[error("Invalid match: '{dish}' cannot play against itself")]
    InvalidMatch { dish: String },

    #[error("Store document is missing required field: {field}")]
    MissingField { field: String },

    #[error("Simulation failed: {reason}")]
    SimulationFailed { reason: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("Storage error: {message}")]
    StorageError { message: String },
}
