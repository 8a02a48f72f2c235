//! Analyze command implementation

use std::path::Path;

use anyhow::Result;
use storepulse_core::{Alert, AlertType, ReportBuilder, ReportConfig, RootCause, StoreReport};

use super::{load_summaries, parse_month};

/// Root causes and alerts for one month
pub fn cmd_analyze(
    summaries_path: &Path,
    month: Option<&str>,
    store: Option<&str>,
) -> Result<()> {
    let summaries = load_summaries(summaries_path)?;
    let config = ReportConfig {
        include_seasonality: false,
        narrative: false,
    };
    let report =
        ReportBuilder::new(&config).build(&summaries, &[], parse_month(month)?, store)?;

    print_header(&report);
    print_root_causes(&report.root_causes.root_causes);
    print_alerts(&report.alerts);
    Ok(())
}

pub(crate) fn print_header(report: &StoreReport) {
    println!();
    println!("📈 Store {} - {}", report.store_id, report.period);
    match &report.previous {
        Some(prev) => println!("   Compared with {}", prev.period()),
        None => println!("   No previous month to compare against"),
    }
    println!("   ─────────────────────────────────────────────────────────────");
}

pub(crate) fn print_root_causes(causes: &[RootCause]) {
    println!();
    println!("🔍 Root Causes");
    if causes.is_empty() {
        println!("   No significant changes.");
        return;
    }

    println!(
        "   {:<26} {:>9} {:>8}  Explanation",
        "Metric", "Change", "Impact"
    );
    for cause in causes {
        println!(
            "   {:<26} {:>+8.1}% {:>8}  {}",
            cause.metric.label(),
            cause.change_percent,
            cause.impact.as_str(),
            cause.explanation
        );
    }
}

pub(crate) fn print_alerts(alerts: &[Alert]) {
    println!();
    println!("🔔 Alerts");
    if alerts.is_empty() {
        println!("   Nothing needs attention.");
        return;
    }

    for alert in alerts {
        let icon = match alert.alert_type {
            AlertType::Critical => "🔴",
            AlertType::Warning => "🟡",
            AlertType::Success => "🟢",
            AlertType::Opportunity => "💡",
            AlertType::Info => "ℹ️ ",
        };
        println!(
            "   {} [{}] {}: {}",
            icon,
            alert.severity.as_str(),
            alert.metric,
            alert.message
        );
    }
}
