//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{ArgGroup, Parser, Subcommand, ValueEnum};

/// StorePulse - explain what moved your store's numbers
#[derive(Parser)]
#[command(name = "storepulse")]
#[command(about = "Per-store monthly e-commerce analytics", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to the data-dir override, then built-in defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Aggregate an order export into monthly summaries
    Import {
        /// Orders CSV (order_id, created_at, total, units, ...)
        #[arg(long)]
        orders: PathBuf,

        /// Sessions CSV (month, sessions) for conversion rates
        #[arg(long)]
        sessions: Option<PathBuf>,

        /// Store id (defaults to import.default_store_id)
        #[arg(long)]
        store: Option<String>,

        /// Write summaries JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show root causes and alerts for one month
    Analyze {
        /// Monthly summaries JSON
        #[arg(long)]
        summaries: PathBuf,

        /// Month to analyze, YYYY-MM (defaults to the latest)
        #[arg(short, long)]
        month: Option<String>,

        /// Store id (required when the summaries cover several stores)
        #[arg(long)]
        store: Option<String>,
    },

    /// Decompose unit sales into a seasonal pattern
    #[command(group(ArgGroup::new("input").required(true).args(["sales", "orders"])))]
    Seasonality {
        /// Monthly sales CSV (month, units) or JSON
        #[arg(long)]
        sales: Option<PathBuf>,

        /// Orders CSV to derive monthly sales from
        #[arg(long)]
        orders: Option<PathBuf>,
    },

    /// Build a full report for one month
    Report {
        /// Monthly summaries JSON
        #[arg(long)]
        summaries: PathBuf,

        /// Monthly sales CSV or JSON for the seasonality section
        #[arg(long)]
        sales: Option<PathBuf>,

        /// Month to report on, YYYY-MM (defaults to the latest)
        #[arg(short, long)]
        month: Option<String>,

        /// Store id (required when the summaries cover several stores)
        #[arg(long)]
        store: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: ReportFormat,
    },

    /// Show the resolved configuration
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Text,
    Json,
}
