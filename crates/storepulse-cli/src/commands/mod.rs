//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `import` - Order CSV import and monthly aggregation
//! - `analyze` - Root causes and alerts for one month
//! - `seasonality` - Seasonal decomposition and recommendations
//! - `report` - Full report in text or JSON
//! - `config` - Resolved configuration

pub mod analyze;
pub mod config;
pub mod import;
pub mod report;
pub mod seasonality;

// Re-export command functions for main.rs
pub use analyze::*;
pub use config::*;
pub use import::*;
pub use report::*;
pub use seasonality::*;

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use storepulse_core::{
    load_sales_json, load_summaries_json, parse_sales_csv, MonthlySalesPoint, MonthlySummary,
    YearMonth,
};

/// Open an input file with the path in the error
pub fn open_input(path: &Path) -> Result<File> {
    File::open(path).with_context(|| format!("Failed to open {}", path.display()))
}

/// Parse a --month argument
pub fn parse_month(month: Option<&str>) -> Result<Option<YearMonth>> {
    month
        .map(|m| {
            m.parse::<YearMonth>()
                .map_err(|e| anyhow::anyhow!("Invalid --month: {}", e))
        })
        .transpose()
}

pub fn load_summaries(path: &Path) -> Result<Vec<MonthlySummary>> {
    let summaries = load_summaries_json(open_input(path)?)
        .with_context(|| format!("Failed to read summaries from {}", path.display()))?;
    tracing::debug!(count = summaries.len(), "Loaded summaries");
    Ok(summaries)
}

/// Load a sales series from CSV, or JSON when the extension says so
pub fn load_sales(path: &Path) -> Result<Vec<MonthlySalesPoint>> {
    let file = open_input(path)?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let series = if is_json {
        load_sales_json(file)
    } else {
        parse_sales_csv(file)
    }
    .with_context(|| format!("Failed to read sales from {}", path.display()))?;

    Ok(series)
}

/// Format a 0-1 rate as a percentage
pub fn format_rate(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}
