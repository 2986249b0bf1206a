//! Check command implementation
//!
//! Prints the effective configuration after merging file, environment and
//! command-line sources.

use pricer_core::math::PARALLEL_MIN_NODES;
use pricer_pricing::LatticeConfig;
use tracing::info;

use crate::Result;

/// Run the check command
pub fn run(config: &LatticeConfig) -> Result<()> {
    info!("Checking configuration...");

    let budget = config
        .time_budget_ms
        .map_or_else(|| "unlimited".to_string(), |ms| format!("{} ms", ms));

    println!("\n┌───────────────────────┬──────────────────────┐");
    println!("│ {:<21} │ {:>20} │", "Setting", "Value");
    println!("├───────────────────────┼──────────────────────┤");
    println!("│ {:<21} │ {:>20} │", "max_steps", config.max_steps);
    println!("│ {:<21} │ {:>20} │", "time_budget", budget);
    println!(
        "│ {:<21} │ {:>20e} │",
        "probability_tolerance", config.probability_tolerance
    );
    println!("│ {:<21} │ {:>20} │", "log_level", config.log_level);
    println!("│ {:<21} │ {:>20} │", "parallel_min_nodes", PARALLEL_MIN_NODES);
    println!("└───────────────────────┴──────────────────────┘");

    info!("Configuration OK");
    Ok(())
}
