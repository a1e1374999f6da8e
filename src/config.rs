//! Application configuration
//!
//! Configuration is loaded from defaults, then a TOML file if given,
//! then environment variables, with CLI flags applied last by the
//! binary.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Path of the persisted rating store
    pub store_path: PathBuf,
    /// Path of the persisted match history
    pub history_path: PathBuf,
    /// Elo K-factor applied to every update
    pub k_factor: f64,
    /// Games played required for an official ranking
    pub official_games: u64,
    /// Dishes drawn per simulated round
    pub dishes_per_round: usize,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from("elo_ratings.json"),
            history_path: PathBuf::from("match_history.json"),
            k_factor: 32.0,
            official_games: 3,
            dishes_per_round: 5,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(path) = env::var("DISH_ARENA_STORE") {
            config.store_path = PathBuf::from(path);
        }
        if let Ok(path) = env::var("DISH_ARENA_HISTORY") {
            config.history_path = PathBuf::from(path);
        }
        if let Ok(k) = env::var("DISH_ARENA_K_FACTOR") {
            config.k_factor = k
                .parse()
                .map_err(|_| anyhow!("Invalid DISH_ARENA_K_FACTOR value: {}", k))?;
        }
        if let Ok(games) = env::var("DISH_ARENA_OFFICIAL_GAMES") {
            config.official_games = games
                .parse()
                .map_err(|_| anyhow!("Invalid DISH_ARENA_OFFICIAL_GAMES value: {}", games))?;
        }
        if let Ok(dishes) = env::var("DISH_ARENA_DISHES_PER_ROUND") {
            config.dishes_per_round = dishes
                .parse()
                .map_err(|_| anyhow!("Invalid DISH_ARENA_DISHES_PER_ROUND value: {}", dishes))?;
        }
        if let Ok(level) = env::var("LOG_LEVEL") {
            config.log_level = level;
        }

        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        validate_config(&config)?;
        Ok(config)
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    match config.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.log_level)),
    }

    if config.k_factor <= 0.0 {
        return Err(anyhow!("K-factor must be positive"));
    }
    if config.official_games == 0 {
        return Err(anyhow!("Official games threshold must be greater than 0"));
    }
    if config.dishes_per_round < 2 {
        return Err(anyhow!("Dishes per round must be at least 2"));
    }

    Ok(())
}
