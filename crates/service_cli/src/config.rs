//! Effective configuration for a CLI run.
//!
//! Priority (highest to lowest):
//! 1. CLI arguments
//! 2. Environment variables (`LATTICE_*`)
//! 3. Config file
//! 4. Default values

use std::path::Path;
use std::str::FromStr;

use pricer_pricing::{LatticeConfig, LogLevel};

use crate::{CliError, Result};

/// Configuration overrides given on the command line
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    /// Step budget override
    pub max_steps: Option<usize>,
    /// Time budget override in milliseconds
    pub time_budget_ms: Option<u64>,
    /// Log level override
    pub log_level: Option<String>,
    /// Shorthand for `--log-level debug`
    pub verbose: bool,
}

/// Build configuration from all sources
pub fn build_config(config_file: Option<&Path>, cli: &CliOverrides) -> Result<LatticeConfig> {
    if let Some(path) = config_file {
        if !path.exists() {
            return Err(CliError::FileNotFound(path.display().to_string()));
        }
    }
    let mut config = LatticeConfig::load(config_file)?;
    merge_with_cli(&mut config, cli)?;
    config.validate()?;
    Ok(config)
}

/// Merge with CLI arguments (CLI takes precedence)
fn merge_with_cli(config: &mut LatticeConfig, cli: &CliOverrides) -> Result<()> {
    if let Some(max_steps) = cli.max_steps {
        config.max_steps = max_steps;
    }
    if let Some(time_budget_ms) = cli.time_budget_ms {
        config.time_budget_ms = Some(time_budget_ms);
    }
    if cli.verbose {
        config.log_level = LogLevel::Debug;
    }
    if let Some(log_level) = &cli.log_level {
        config.log_level = LogLevel::from_str(log_level)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_take_precedence() {
        let mut config = LatticeConfig::default();
        let cli = CliOverrides {
            max_steps: Some(64),
            time_budget_ms: Some(500),
            log_level: Some("trace".to_string()),
            verbose: true,
        };
        merge_with_cli(&mut config, &cli).unwrap();
        assert_eq!(config.max_steps, 64);
        assert_eq!(config.time_budget_ms, Some(500));
        assert_eq!(config.log_level, LogLevel::Trace);
    }

    #[test]
    fn test_verbose_raises_log_level() {
        let mut config = LatticeConfig::default();
        let cli = CliOverrides {
            verbose: true,
            ..Default::default()
        };
        merge_with_cli(&mut config, &cli).unwrap();
        assert_eq!(config.log_level, LogLevel::Debug);
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = LatticeConfig::default();
        let cli = CliOverrides {
            log_level: Some("loud".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            merge_with_cli(&mut config, &cli),
            Err(CliError::Config(_))
        ));
    }

    #[test]
    fn test_missing_config_file() {
        let result = build_config(
            Some(Path::new("/nonexistent/lattice.toml")),
            &CliOverrides::default(),
        );
        assert!(matches!(result, Err(CliError::FileNotFound(_))));
    }
}
