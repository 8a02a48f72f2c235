//! Analytics Engine - period-over-period attribution
//!
//! Four pure, independent analyzers over in-memory records:
//!
//! - **Seasonality** - decomposes monthly unit sales into trend + seasonal index
//! - **Seasonal insights** - ranks months and emits recommendations
//! - **Root causes** - explains which metrics drove a change and how much
//! - **Alerts** - flags changes that cross fixed thresholds
//!
//! None of them fail: missing history yields a neutral pattern, an empty
//! root-cause list, or a welcome alert.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use storepulse_core::analytics::{analyze_root_causes, generate_alerts};
//!
//! let analysis = analyze_root_causes(&current, Some(&previous));
//! let alerts = generate_alerts(&current, Some(&previous));
//! ```

pub mod alerts;
pub mod root_cause;
pub mod seasonality;
pub mod types;

pub use alerts::{
    format_currency, format_currency_cents, generate_alerts, DEFAULT_RECOVERY_RATE, MAX_ALERTS,
};
pub use root_cause::{analyze_root_causes, explain, percent_change, MAX_ROOT_CAUSES};
pub use seasonality::{decompose_seasonality, derive_seasonal_insights};
pub use types::{
    Alert, AlertMetric, AlertSeverity, AlertType, Direction, Impact, MetricDelta, MetricKind,
    MonthRanking, PeriodDeltas, Priority, Recommendation, RecommendationKind, RootCause,
    RootCauseAnalysis, SeasonalInsights, SeasonalPattern, StrengthCategory,
};
