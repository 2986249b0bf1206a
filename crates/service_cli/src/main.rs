//! Lattice CLI - Command Line Pricing on Trinomial Trees
//!
//! This is the operational entry point for the trinomial lattice pricer.
//!
//! # Commands
//!
//! - `lattice price --strike <K> [--style ...]` - Price a contract on a uniform tree
//! - `lattice check` - Print the effective configuration
//!
//! # Configuration
//!
//! Budgets and the log level come from an optional TOML file (`--config`),
//! `LATTICE_*` environment variables and the global flags, in increasing
//! order of precedence.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod error;

pub use error::{CliError, Result};

use commands::price::PriceArgs;
use config::{build_config, CliOverrides};

/// Trinomial lattice option pricer
#[derive(Parser)]
#[command(name = "lattice")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Largest accepted tree, in steps
    #[arg(long, global = true)]
    max_steps: Option<usize>,

    /// Wall-clock budget per pricing call, in milliseconds
    #[arg(long, global = true)]
    time_budget_ms: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Price a contract on a uniform trinomial tree
    Price(PriceArgs),

    /// Check the effective configuration
    Check,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let overrides = CliOverrides {
        max_steps: cli.max_steps,
        time_budget_ms: cli.time_budget_ms,
        log_level: cli.log_level.clone(),
        verbose: cli.verbose,
    };
    let config = build_config(cli.config.as_deref(), &overrides)?;

    // Initialise tracing; RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_filter_str()));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();

    debug!(?config, "effective configuration");

    match cli.command {
        Commands::Price(args) => commands::price::run(&args, &config),
        Commands::Check => commands::check::run(&config),
    }
}
