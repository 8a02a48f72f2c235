//! Seasonality command implementation

use std::path::Path;

use anyhow::{Context, Result};
use storepulse_core::{
    decompose_seasonality, dedupe_orders, derive_seasonal_insights, parse_orders_csv, Config,
    MonthlyAggregator, MonthlySalesPoint, SeasonalInsights, SeasonalPattern,
};

use super::{load_sales, open_input};

/// Seasonal pattern and recommendations from a sales series or an order export
pub fn cmd_seasonality(
    config: &Config,
    sales_path: Option<&Path>,
    orders_path: Option<&Path>,
) -> Result<()> {
    let series = match (sales_path, orders_path) {
        (Some(path), _) => load_sales(path)?,
        (None, Some(path)) => sales_from_orders(config, path)?,
        (None, None) => anyhow::bail!("Pass --sales or --orders"),
    };

    let pattern = decompose_seasonality(&series);
    let insights = derive_seasonal_insights(&pattern);
    print_seasonality(series.len(), &pattern, &insights);
    Ok(())
}

/// Monthly units from an order export, duplicates dropped as on import
pub(crate) fn sales_from_orders(config: &Config, path: &Path) -> Result<Vec<MonthlySalesPoint>> {
    let orders = parse_orders_csv(open_input(path)?, &config.import)
        .with_context(|| format!("Failed to import {}", path.display()))?;
    let orders = dedupe_orders(orders);
    let aggregator =
        MonthlyAggregator::new(config.import.default_store_id.as_str(), config.import.recovery_rate);
    Ok(aggregator.sales_series(&orders))
}

pub(crate) fn print_seasonality(
    months: usize,
    pattern: &SeasonalPattern,
    insights: &SeasonalInsights,
) {
    println!();
    println!("📅 Seasonality ({} months of sales)", months);
    println!("   ─────────────────────────────────────────────────────────────");

    if !pattern.has_enough_data {
        println!("   Not enough history yet (need at least 12 months).");
        return;
    }

    println!(
        "   Strength: {:.2} ({})",
        pattern.strength, insights.strength_category
    );

    println!();
    println!("   Peak months:");
    for m in &insights.top_months {
        println!("     {:<10} index {:.2} ({:+.1}%)", m.month_name, m.index, m.change);
    }
    println!("   Slow months:");
    for m in &insights.bottom_months {
        println!("     {:<10} index {:.2} ({:+.1}%)", m.month_name, m.index, m.change);
    }

    if !insights.recommendations.is_empty() {
        println!();
        println!("💡 Recommendations");
        for rec in &insights.recommendations {
            println!("   [{:?}] {}", rec.priority, rec.title);
            println!("      {}", rec.message);
        }
    }
}
