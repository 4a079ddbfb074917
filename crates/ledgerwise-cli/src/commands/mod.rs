//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `expenses` - Per-expense commands (classify, detect, keywords, vendors)
//! - `forecast` - Projection commands (trend, forecast, burn-rate, overrun, categories)
//! - `reports` - Company-level reports (health, patterns, budget)
//! - `payroll` - Payroll calculation

pub mod expenses;
pub mod forecast;
pub mod payroll;
pub mod reports;

// Re-export command functions for main.rs
pub use expenses::*;
pub use forecast::*;
pub use payroll::*;
pub use reports::*;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use ledgerwise_core::stats::all_finite;
use ledgerwise_core::{EngineConfig, ExpenseCategory};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Load the engine config, falling back to built-in thresholds
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    EngineConfig::load(path).context("Failed to load engine config")
}

/// Parse a category name given on the command line
pub fn parse_category(name: &str) -> Result<ExpenseCategory> {
    name.parse().map_err(|_| {
        let available: Vec<&str> = ExpenseCategory::all().iter().map(|c| c.as_str()).collect();
        anyhow::anyhow!(
            "Unknown category: {}. Available: {}",
            name,
            available.join(", ")
        )
    })
}

/// Reject NaN or infinite values given on the command line
pub fn ensure_finite(name: &str, values: &[f64]) -> Result<()> {
    if !all_finite(values) {
        anyhow::bail!("{} must contain only finite numbers", name);
    }
    Ok(())
}

/// Read a JSON input file
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file =
        File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse JSON from {}", path.display()))
}

/// Pretty-print a result as JSON on stdout
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output to JSON")?;
    println!("{}", json);
    Ok(())
}

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
