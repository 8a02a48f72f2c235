//! Import command implementation

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use storepulse_core::{
    dedupe_orders, parse_orders_csv, parse_sessions_csv, Config, MonthlyAggregator,
};
use tracing::info;

use super::open_input;

/// Aggregate an order export into monthly summaries JSON
pub fn cmd_import(
    config: &Config,
    orders_path: &Path,
    sessions_path: Option<&Path>,
    store: Option<&str>,
    output: Option<&Path>,
) -> Result<()> {
    let orders = parse_orders_csv(open_input(orders_path)?, &config.import)
        .with_context(|| format!("Failed to import {}", orders_path.display()))?;
    let parsed = orders.len();
    let orders = dedupe_orders(orders);

    let sessions = match sessions_path {
        Some(path) => parse_sessions_csv(open_input(path)?)
            .with_context(|| format!("Failed to import {}", path.display()))?,
        None => Vec::new(),
    };

    let store_id = store.unwrap_or(config.import.default_store_id.as_str());
    let aggregator = MonthlyAggregator::new(store_id, config.import.recovery_rate);
    let summaries = aggregator.summarize(&orders, &sessions);

    info!(
        rows = parsed,
        unique = orders.len(),
        months = summaries.len(),
        store = store_id,
        "Import complete"
    );

    let json = serde_json::to_string_pretty(&summaries)?;
    match output {
        Some(path) => {
            fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!(
                "✓ Wrote {} monthly summaries to {}",
                summaries.len(),
                path.display()
            );
        }
        None => println!("{}", json),
    }

    Ok(())
}
