//! Command line entry point for the dish ranking system
//!
//! Loads configuration, initializes logging, and dispatches to the
//! ingestion, simulation, consolidation, and reporting commands. All
//! rendering lives here; the library returns ordered data only.

use anyhow::Result;
use clap::{Parser, Subcommand};
use dish_arena::config::AppConfig;
use dish_arena::rating::consolidate::consolidate;
use dish_arena::rating::store::RatingStore;
use dish_arena::report::{rank_with_threshold, stats, RankingReport};
use dish_arena::utils::display_rating;
use dish_arena::{ingest, persist, simulate};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use tracing::{info, warn};

/// Dish Arena - Elo-based pairwise ranking for restaurant dishes
#[derive(Parser)]
#[command(
    name = "dish-arena",
    version,
    about = "Elo rankings for restaurant dishes from pairwise comparisons",
    long_about = "Dish Arena ingests pairwise match outcomes between dishes, maintains \
                 Elo ratings with lazy record creation, consolidates dish identities \
                 recorded under inconsistent names, and reports official and \
                 provisional rankings."
)]
struct Args {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE", help = "Path to configuration file (TOML format)")]
    config: Option<PathBuf>,

    /// Rating store override
    #[arg(long, value_name = "FILE", help = "Override rating store path")]
    store: Option<PathBuf>,

    /// Match history override
    #[arg(long, value_name = "FILE", help = "Override match history path")]
    history: Option<PathBuf>,

    /// K-factor override
    #[arg(short, long, value_name = "K", help = "Override the Elo K-factor")]
    k_factor: Option<f64>,

    /// Log level override
    #[arg(short, long, value_name = "LEVEL", help = "Override log level (trace, debug, info, warn, error)")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ingest a text file of pairwise match results
    Ingest {
        /// File with one match per line, e.g. 炒饭1白粥0
        file: PathBuf,
    },
    /// Play simulated comparison rounds over the current dishes
    Simulate {
        /// Number of rounds to play
        #[arg(short, long, default_value_t = 1)]
        rounds: u32,
        /// RNG seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,
        /// Extra dishes to include beyond those already rated
        #[arg(long = "dish", value_name = "NAME")]
        dishes: Vec<String>,
    },
    /// Merge duplicate dish identities and rewrite the match history
    Consolidate,
    /// Print the official and provisional rankings
    Report,
    /// Delete all persisted ratings and history
    Reset,
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Load and merge configuration from file, environment, and CLI arguments
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path)?
    } else {
        AppConfig::from_env()?
    };

    if let Some(store) = &args.store {
        config.store_path = store.clone();
    }
    if let Some(history) = &args.history {
        config.history_path = history.clone();
    }
    if let Some(k) = args.k_factor {
        config.k_factor = k;
    }
    if let Some(log_level) = &args.log_level {
        config.log_level = log_level.clone();
    }

    dish_arena::config::validate_config(&config)?;
    Ok(config)
}

fn print_tier(title: &str, rows: &[dish_arena::report::RankedDish]) {
    println!("{title} ({} dishes):", rows.len());
    if rows.is_empty() {
        println!("  (none)");
        return;
    }
    for (position, row) in rows.iter().enumerate() {
        println!(
            "  #{:<3} {:<24} {:6.0} ({} games)",
            position + 1,
            row.dish,
            display_rating(row.rating),
            row.games_played
        );
    }
}

fn print_report(store: &RatingStore, report: &RankingReport) {
    if report.is_empty() {
        println!("No rankings yet. Ingest a match file to get started.");
        return;
    }

    print_tier("Official Ranking", &report.official);
    println!();
    print_tier("Provisional Ranking", &report.provisional);

    let stats = stats(store, report);
    println!();
    println!(
        "{} dishes, {} games recorded ({} official, {} provisional)",
        stats.total_dishes,
        stats.total_games / 2,
        stats.official_count,
        stats.provisional_count
    );
}

fn run_ingest(config: &AppConfig, file: &PathBuf) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .map_err(|e| anyhow::anyhow!("Failed to read match file {}: {}", file.display(), e))?;

    let mut store = persist::load_store(&config.store_path)?;
    let mut history = persist::load_history(&config.history_path)?;

    let summary = ingest::ingest(&mut store, &mut history, &content, config.k_factor);

    if summary.outcomes.is_empty() && !summary.rejected.is_empty() {
        warn!("No valid matches found in {}", file.display());
    }

    for outcome in &summary.outcomes {
        println!(
            "{} beat {} ({:+.1} / {:+.1})",
            outcome.winner, outcome.loser, outcome.winner_delta, outcome.loser_delta
        );
    }
    for rejected in &summary.rejected {
        println!(
            "rejected line {}: {} ({})",
            rejected.line_number, rejected.line, rejected.reason
        );
    }

    persist::save_store(&config.store_path, &store)?;
    persist::save_history(&config.history_path, &history)?;

    println!(
        "Applied {} matches, rejected {} lines",
        summary.outcomes.len(),
        summary.rejected.len()
    );
    Ok(())
}

fn run_simulate(config: &AppConfig, rounds: u32, seed: Option<u64>, extra: &[String]) -> Result<()> {
    let mut store = persist::load_store(&config.store_path)?;
    let mut history = persist::load_history(&config.history_path)?;

    let mut menu: Vec<String> = store.iter().map(|(dish, _)| dish.clone()).collect();
    for dish in extra {
        if !menu.contains(dish) {
            menu.push(dish.clone());
        }
    }

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    for round_number in 1..=rounds {
        info!("=== Round {} ===", round_number);
        let round = simulate::run_round(
            &mut store,
            &mut history,
            &menu,
            &mut rng,
            config.dishes_per_round,
            config.k_factor,
        )?;

        for outcome in &round.outcomes {
            println!(
                "{} beat {} ({:+.1} / {:+.1})",
                outcome.winner, outcome.loser, outcome.winner_delta, outcome.loser_delta
            );
        }
    }

    persist::save_store(&config.store_path, &store)?;
    persist::save_history(&config.history_path, &history)?;

    print_report(&store, &rank_with_threshold(&store, config.official_games));
    Ok(())
}

fn run_consolidate(config: &AppConfig) -> Result<()> {
    let store = persist::load_store(&config.store_path)?;
    let history = persist::load_history(&config.history_path)?;

    println!(
        "Loaded {} dish entries, {} matches",
        store.len(),
        history.len()
    );

    let outcome = consolidate(&store, &history);

    for merge in &outcome.merges {
        println!(
            "merged {:?} -> '{}' (rating {:.1} from '{}', {} games)",
            merge.variants,
            merge.canonical,
            display_rating(merge.carried_rating),
            merge.source_variant,
            merge.total_games
        );
    }

    println!("\nGame count verification:");
    for check in &outcome.checks {
        let status = if check.is_consistent() { "OK" } else { "MISMATCH" };
        println!(
            "{} {}: stored={}, calculated={}",
            status, check.dish, check.stored, check.recomputed
        );
    }

    persist::save_store(&config.store_path, &outcome.store)?;
    persist::save_history(&config.history_path, &outcome.history)?;

    println!(
        "\nConsolidation complete: {} dishes, {} matches",
        outcome.store.len(),
        outcome.history.len()
    );
    print_report(
        &outcome.store,
        &rank_with_threshold(&outcome.store, config.official_games),
    );
    Ok(())
}

fn run_report(config: &AppConfig) -> Result<()> {
    let store = persist::load_store(&config.store_path)?;
    print_report(&store, &rank_with_threshold(&store, config.official_games));
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });

    if let Err(e) = init_logging(&config.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    match &args.command {
        Command::Ingest { file } => run_ingest(&config, file),
        Command::Simulate {
            rounds,
            seed,
            dishes,
        } => run_simulate(&config, *rounds, *seed, dishes),
        Command::Consolidate => run_consolidate(&config),
        Command::Report => run_report(&config),
        Command::Reset => {
            persist::reset(&config.store_path, &config.history_path)?;
            println!("All ratings and history cleared");
            Ok(())
        }
    }
}
