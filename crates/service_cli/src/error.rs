//! CLI error type.

use pricer_core::types::LatticeError;
use pricer_models::instruments::InstrumentError;
use pricer_pricing::ConfigError;
use thiserror::Error;

/// Errors surfaced by the `lattice` binary
#[derive(Debug, Error)]
pub enum CliError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid contract: {0}")]
    Instrument(#[from] InstrumentError),

    #[error("Pricing failed: {0}")]
    Lattice(#[from] LatticeError),
}

/// Result alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
