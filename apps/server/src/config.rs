//! Application configuration.

use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};
use triangular_core::{CoreError, CoreResult, PrecisionTable, RunConfiguration};

/// Delay between two coins of the same pass.
pub const DEFAULT_COIN_DELAY_MS: u64 = 1000;
/// Delay after the last coin, before the rotation wraps.
pub const DEFAULT_PASS_DELAY_MS: u64 = 3000;

/// Scheduling settings for the arbitrage loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopSettings {
    pub coin_delay: Duration,
    pub pass_delay: Duration,
    /// Evaluate cycles without submitting orders.
    pub dry_run: bool,
}

impl Default for LoopSettings {
    fn default() -> Self {
        Self {
            coin_delay: Duration::from_millis(DEFAULT_COIN_DELAY_MS),
            pass_delay: Duration::from_millis(DEFAULT_PASS_DELAY_MS),
            dry_run: false,
        }
    }
}

fn read_file(path: &Path) -> CoreResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| CoreError::InvalidConfig(format!("{}: {}", path.display(), e)))
}

/// Load the run configuration.
///
/// A missing file falls back to [`RunConfiguration::default`].
pub fn load_run_configuration(path: &Path) -> CoreResult<RunConfiguration> {
    if !path.exists() {
        warn!(
            "Config file {} not found, using built-in defaults",
            path.display()
        );
        return Ok(RunConfiguration::default());
    }
    let config = RunConfiguration::from_json(&read_file(path)?)?;
    info!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Load the per-coin precision table.
///
/// A missing file yields an empty table; every coin then uses default
/// precision.
pub fn load_precision_table(path: &Path) -> CoreResult<PrecisionTable> {
    if !path.exists() {
        warn!(
            "Precision file {} not found, every coin uses default precision",
            path.display()
        );
        return Ok(PrecisionTable::new());
    }
    let table = PrecisionTable::from_json(&read_file(path)?)?;
    info!(
        "Loaded precision rules for {} coins from {}",
        table.len(),
        path.display()
    );
    Ok(table)
}
