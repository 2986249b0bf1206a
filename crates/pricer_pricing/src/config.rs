//! Lattice engine configuration.
//!
//! Handles loading configuration from TOML files and environment variables.
//! Command-line overrides are applied by the caller before the final
//! [`LatticeConfig::validate`].

use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

use crate::tree::DEFAULT_PROBABILITY_TOLERANCE;

/// Default step budget.
pub const DEFAULT_MAX_STEPS: usize = 10_000;

/// Environment variable overriding `max_steps`.
pub const ENV_MAX_STEPS: &str = "LATTICE_MAX_STEPS";
/// Environment variable overriding `time_budget_ms`.
pub const ENV_TIME_BUDGET_MS: &str = "LATTICE_TIME_BUDGET_MS";
/// Environment variable overriding `probability_tolerance`.
pub const ENV_PROBABILITY_TOLERANCE: &str = "LATTICE_PROBABILITY_TOLERANCE";
/// Environment variable overriding `log_level`.
pub const ENV_LOG_LEVEL: &str = "LATTICE_LOG_LEVEL";

/// Configuration error types
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// Step budget of zero.
    #[error("Invalid max_steps: {0}. Must be at least 1")]
    InvalidMaxSteps(usize),

    /// Time budget of zero milliseconds.
    #[error("Invalid time_budget_ms: {0}. Must be at least 1 when set")]
    InvalidTimeBudget(u64),

    /// Tolerance that is negative, not finite or not below one.
    #[error("Invalid probability_tolerance: {0}. Must be finite and in [0, 1)")]
    InvalidTolerance(f64),

    /// Unknown log level name.
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    /// Unreadable or malformed configuration file.
    #[error("Configuration file error: {0}")]
    FileError(String),

    /// Unparsable environment variable.
    #[error("Environment variable error: {0}")]
    EnvError(String),
}

/// Log levels understood by the engine's subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Per-layer tracing
    Trace,
    /// Start and finish of every walk
    Debug,
    /// Default
    #[default]
    Info,
    /// Budget overruns and non-finite prices
    Warn,
    /// Errors only
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl LogLevel {
    /// Convert log level to tracing filter string
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

/// Engine configuration.
///
/// # Examples
/// ```
/// use pricer_pricing::config::LatticeConfig;
///
/// let config = LatticeConfig::from_toml_str("max_steps = 500\ntime_budget_ms = 250").unwrap();
/// assert_eq!(config.max_steps, 500);
/// assert_eq!(config.time_budget_ms, Some(250));
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LatticeConfig {
    /// Largest tree (in steps) the time-boxed driver accepts
    pub max_steps: usize,
    /// Wall-clock budget per pricing call; unlimited when absent
    pub time_budget_ms: Option<u64>,
    /// Absolute tolerance on transition-probability row sums
    pub probability_tolerance: f64,
    /// Log level
    pub log_level: LogLevel,
}

impl Default for LatticeConfig {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
            time_budget_ms: None,
            probability_tolerance: DEFAULT_PROBABILITY_TOLERANCE,
            log_level: LogLevel::Info,
        }
    }
}

impl LatticeConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: LatticeConfig = toml::from_str(content)
            .map_err(|e| ConfigError::FileError(format!("Failed to parse TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileError(format!("Failed to read config file: {}", e)))?;
        Self::from_toml_str(&content)
    }

    /// Override fields from the process environment
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Override fields from `lookup`, which maps variable names to values.
    pub fn apply_env_with<L>(&mut self, lookup: L) -> Result<(), ConfigError>
    where
        L: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_MAX_STEPS) {
            self.max_steps = parse_env(ENV_MAX_STEPS, &value)?;
        }
        if let Some(value) = lookup(ENV_TIME_BUDGET_MS) {
            self.time_budget_ms = Some(parse_env(ENV_TIME_BUDGET_MS, &value)?);
        }
        if let Some(value) = lookup(ENV_PROBABILITY_TOLERANCE) {
            self.probability_tolerance = parse_env(ENV_PROBABILITY_TOLERANCE, &value)?;
        }
        if let Some(value) = lookup(ENV_LOG_LEVEL) {
            self.log_level = LogLevel::from_str(&value)?;
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_steps == 0 {
            return Err(ConfigError::InvalidMaxSteps(self.max_steps));
        }
        if self.time_budget_ms == Some(0) {
            return Err(ConfigError::InvalidTimeBudget(0));
        }
        if !(0.0..1.0).contains(&self.probability_tolerance) {
            return Err(ConfigError::InvalidTolerance(self.probability_tolerance));
        }
        Ok(())
    }

    /// Build configuration from a file (if any) and the environment.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables
    /// 2. Config file
    /// 3. Default values
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }
}

fn parse_env<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::EnvError(format!("{}={:?} could not be parsed", key, value)))
}
