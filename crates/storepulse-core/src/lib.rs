//! StorePulse Core Library
//!
//! Per-store monthly e-commerce analytics:
//! - Seasonality decomposition and seasonal recommendations
//! - Root-cause attribution for period-over-period changes
//! - Threshold-based alerts
//! - Order/session CSV import and monthly aggregation
//! - Report assembly with an optional narrative backend

pub mod aggregate;
pub mod analytics;
pub mod config;
pub mod error;
pub mod import;
pub mod models;
pub mod narrative;
pub mod report;

/// Fixture builders for summaries and sales series
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use aggregate::MonthlyAggregator;
pub use analytics::{
    analyze_root_causes, decompose_seasonality, derive_seasonal_insights, generate_alerts, Alert,
    AlertMetric, AlertSeverity, AlertType, Direction, Impact, MetricKind, RootCause,
    RootCauseAnalysis, SeasonalInsights, SeasonalPattern,
};
pub use config::{Config, ImportConfig, ReportConfig};
pub use error::{Error, Result};
pub use import::{
    dedupe_orders, load_sales_json, load_summaries_json, parse_orders_csv, parse_sales_csv,
    parse_sessions_csv, SessionCount,
};
pub use models::{
    AbandonedCarts, MonthlySalesPoint, MonthlySummary, OrderRecord, OrderStatus, YearMonth,
};
pub use narrative::{MockNarrator, Narrative, NarrativeBackend, NarrativeRequest};
pub use report::{ReportBuilder, SeasonalitySection, StoreReport};
