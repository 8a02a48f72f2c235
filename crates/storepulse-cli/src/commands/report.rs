//! Report command implementation

use std::path::Path;

use anyhow::Result;
use storepulse_core::{Config, MetricKind, MockNarrator, ReportBuilder};

use super::{format_rate, load_sales, load_summaries, parse_month};
use super::analyze::{print_alerts, print_header, print_root_causes};
use super::seasonality::print_seasonality;
use crate::cli::ReportFormat;

/// Full report for one month
pub fn cmd_report(
    config: &Config,
    summaries_path: &Path,
    sales_path: Option<&Path>,
    month: Option<&str>,
    store: Option<&str>,
    format: ReportFormat,
) -> Result<()> {
    let summaries = load_summaries(summaries_path)?;
    let sales = match sales_path {
        Some(path) => load_sales(path)?,
        None => Vec::new(),
    };

    let report = ReportBuilder::new(&config.report)
        .with_narrator(MockNarrator::new())
        .build(&summaries, &sales, parse_month(month)?, store)?;

    match format {
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        ReportFormat::Text => {
            print_header(&report);

            let current = &report.current;
            println!("   Revenue:           ${:.2}", current.revenue);
            println!("   Orders:            {}", current.orders);
            println!("   Avg order value:   ${:.2}", current.aov);
            println!(
                "   Returning rate:    {}",
                format_rate(current.returning_customer_rate)
            );
            if let Some(rate) = current.conversion_rate {
                println!("   Conversion rate:   {}", format_rate(rate));
            }
            if let Some(days) = current.avg_shipping_time {
                println!("   Avg shipping time: {:.1} days", days);
            }

            if let Some(deltas) = &report.root_causes.deltas {
                println!();
                println!(
                    "   {:<26} {:>12} {:>12} {:>9}",
                    "Metric", "Previous", "Current", "Change"
                );
                for metric in MetricKind::ALL {
                    if let Some(delta) = deltas.get(metric) {
                        println!(
                            "   {:<26} {:>12.2} {:>12.2} {:>+8.1}%",
                            metric.label(),
                            delta.previous,
                            delta.current,
                            delta.change_percent
                        );
                    }
                }
            }

            print_root_causes(&report.root_causes.root_causes);
            print_alerts(&report.alerts);

            if let Some(section) = &report.seasonality {
                print_seasonality(sales.len(), &section.pattern, &section.insights);
            }
            if let Some(narrative) = &report.narrative {
                println!();
                println!("📝 Summary");
                println!("   {}", narrative.summary);
            }
            println!();
        }
    }

    Ok(())
}
