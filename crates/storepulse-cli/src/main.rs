//! StorePulse CLI - per-store monthly analytics
//!
//! Usage:
//!   storepulse import --orders CSV          Aggregate orders into monthly summaries
//!   storepulse analyze --summaries JSON     Root causes and alerts for a month
//!   storepulse seasonality --sales CSV      Seasonal pattern and recommendations
//!   storepulse report --summaries JSON      Full report (text or JSON)

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use storepulse_core::Config;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact().with_writer(std::io::stderr))
        .init();

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Import {
            orders,
            sessions,
            store,
            output,
        } => commands::cmd_import(
            &config,
            &orders,
            sessions.as_deref(),
            store.as_deref(),
            output.as_deref(),
        ),
        Commands::Analyze {
            summaries,
            month,
            store,
        } => commands::cmd_analyze(&summaries, month.as_deref(), store.as_deref()),
        Commands::Seasonality { sales, orders } => {
            commands::cmd_seasonality(&config, sales.as_deref(), orders.as_deref())
        }
        Commands::Report {
            summaries,
            sales,
            month,
            store,
            format,
        } => commands::cmd_report(
            &config,
            &summaries,
            sales.as_deref(),
            month.as_deref(),
            store.as_deref(),
            format,
        ),
        Commands::Config => commands::cmd_config(&config),
    }
}
