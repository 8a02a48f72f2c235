//! Core types for the analytics engine

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::MonthlySummary;

/// Metrics compared period-over-period by root-cause analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricKind {
    Revenue,
    Orders,
    Aov,
    ReturningCustomerRate,
    ConversionRate,
    AvgShippingTime,
}

impl MetricKind {
    /// Evaluation order
    pub const ALL: [MetricKind; 6] = [
        MetricKind::Revenue,
        MetricKind::Orders,
        MetricKind::Aov,
        MetricKind::ReturningCustomerRate,
        MetricKind::ConversionRate,
        MetricKind::AvgShippingTime,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Revenue => "revenue",
            Self::Orders => "orders",
            Self::Aov => "aov",
            Self::ReturningCustomerRate => "returningCustomerRate",
            Self::ConversionRate => "conversionRate",
            Self::AvgShippingTime => "avgShippingTime",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Revenue => "Revenue",
            Self::Orders => "Orders",
            Self::Aov => "Average Order Value",
            Self::ReturningCustomerRate => "Returning Customer Rate",
            Self::ConversionRate => "Conversion Rate",
            Self::AvgShippingTime => "Avg Shipping Time",
        }
    }

    /// Scales raw percent change into weighted impact
    pub fn weight(&self) -> f64 {
        match self {
            Self::Revenue => 1.0,
            Self::Orders => 0.9,
            Self::Aov => 0.8,
            Self::ReturningCustomerRate => 0.85,
            Self::ConversionRate => 0.7,
            Self::AvgShippingTime => 0.5,
        }
    }

    /// Minimum |percent change| for the metric to count as a root cause
    pub fn inclusion_threshold(&self) -> f64 {
        match self {
            // Shipping time is noisy month to month
            Self::AvgShippingTime => 10.0,
            _ => 5.0,
        }
    }

    /// Read this metric from a summary
    pub fn value(&self, summary: &MonthlySummary) -> Option<f64> {
        match self {
            Self::Revenue => Some(summary.revenue),
            Self::Orders => Some(summary.orders as f64),
            Self::Aov => Some(summary.aov),
            Self::ReturningCustomerRate => Some(summary.returning_customer_rate),
            Self::ConversionRate => summary.conversion_rate,
            Self::AvgShippingTime => summary.avg_shipping_time,
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MetricKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MetricKind::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| format!("Unknown metric: {}", s))
    }
}

/// Direction of a period-over-period change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn of(change: f64) -> Self {
        if change > 0.0 {
            Direction::Up
        } else {
            Direction::Down
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How much a root cause contributed to the change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Impact {
    High,
    Medium,
    Low,
}

impl Impact {
    /// Classify a weighted percent change
    pub fn from_weighted_change(weighted: f64) -> Self {
        if weighted >= 15.0 {
            Impact::High
        } else if weighted >= 7.0 {
            Impact::Medium
        } else {
            Impact::Low
        }
    }

    /// Numeric rank for sorting (higher = more important)
    pub fn rank(&self) -> u8 {
        match self {
            Impact::High => 3,
            Impact::Medium => 2,
            Impact::Low => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Impact::High => "High",
            Impact::Medium => "Medium",
            Impact::Low => "Low",
        }
    }
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One metric identified as a significant contributor to change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootCause {
    pub metric: MetricKind,
    /// Signed absolute change (current - previous)
    pub change: f64,
    pub change_percent: f64,
    pub impact: Impact,
    pub explanation: String,
    pub direction: Direction,
}

/// Current vs previous value for one metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricDelta {
    pub current: f64,
    pub previous: f64,
    pub change: f64,
    pub change_percent: f64,
}

/// Per-metric deltas between two periods
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodDeltas {
    pub revenue: MetricDelta,
    pub orders: MetricDelta,
    pub aov: MetricDelta,
    pub returning_customer_rate: MetricDelta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversion_rate: Option<MetricDelta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_shipping_time: Option<MetricDelta>,
}

impl PeriodDeltas {
    pub fn get(&self, metric: MetricKind) -> Option<&MetricDelta> {
        match metric {
            MetricKind::Revenue => Some(&self.revenue),
            MetricKind::Orders => Some(&self.orders),
            MetricKind::Aov => Some(&self.aov),
            MetricKind::ReturningCustomerRate => Some(&self.returning_customer_rate),
            MetricKind::ConversionRate => self.conversion_rate.as_ref(),
            MetricKind::AvgShippingTime => self.avg_shipping_time.as_ref(),
        }
    }
}

/// Result of comparing two adjacent periods
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootCauseAnalysis {
    pub root_causes: Vec<RootCause>,
    /// None when there was no previous period
    pub deltas: Option<PeriodDeltas>,
}

/// Kind of user-facing alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertType {
    Success,
    Warning,
    Critical,
    Info,
    Opportunity,
}

impl AlertType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertType::Success => "success",
            AlertType::Warning => "warning",
            AlertType::Critical => "critical",
            AlertType::Info => "info",
            AlertType::Opportunity => "opportunity",
        }
    }
}

impl fmt::Display for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Alert severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    High,
    Medium,
    Low,
}

impl AlertSeverity {
    /// Numeric priority for sorting (higher = more urgent)
    pub fn priority(&self) -> u8 {
        match self {
            AlertSeverity::High => 3,
            AlertSeverity::Medium => 2,
            AlertSeverity::Low => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AlertSeverity::High => "high",
            AlertSeverity::Medium => "medium",
            AlertSeverity::Low => "low",
        }
    }
}

impl fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What an alert is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlertMetric {
    Welcome,
    Revenue,
    #[serde(rename = "Average Order Value")]
    AverageOrderValue,
    #[serde(rename = "Returning Customers")]
    ReturningCustomers,
    #[serde(rename = "Conversion Rate")]
    ConversionRate,
    #[serde(rename = "Shipping Time")]
    ShippingTime,
    #[serde(rename = "Abandoned Carts")]
    AbandonedCarts,
}

impl AlertMetric {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertMetric::Welcome => "Welcome",
            AlertMetric::Revenue => "Revenue",
            AlertMetric::AverageOrderValue => "Average Order Value",
            AlertMetric::ReturningCustomers => "Returning Customers",
            AlertMetric::ConversionRate => "Conversion Rate",
            AlertMetric::ShippingTime => "Shipping Time",
            AlertMetric::AbandonedCarts => "Abandoned Carts",
        }
    }
}

impl fmt::Display for AlertMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A user-facing notification derived from a period comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub metric: AlertMetric,
    pub change: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_percent: Option<f64>,
    pub message: String,
    pub actionable: bool,
    #[serde(default)]
    pub read: bool,
}

impl Alert {
    /// Create an unread alert
    pub fn new(
        alert_type: AlertType,
        severity: AlertSeverity,
        metric: AlertMetric,
        change: f64,
        message: impl Into<String>,
    ) -> Self {
        Self {
            alert_type,
            severity,
            metric,
            change,
            change_percent: None,
            message: message.into(),
            actionable: true,
            read: false,
        }
    }

    pub fn with_change_percent(mut self, percent: f64) -> Self {
        self.change_percent = Some(percent);
        self
    }

    pub fn not_actionable(mut self) -> Self {
        self.actionable = false;
        self
    }

    pub fn mark_read(&mut self) {
        self.read = true;
    }
}

/// Trend, normalized seasonal index and strength of a unit-sales series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonalPattern {
    /// Multiplicative factor per calendar month (0 = January), mean 1
    pub index: [f64; 12],
    /// Share of variance explained by seasonality, 0-1
    pub strength: f64,
    /// Centered moving average aligned to the date-sorted input
    pub trend: Vec<Option<f64>>,
    pub has_enough_data: bool,
}

impl SeasonalPattern {
    /// Result for series too short to decompose
    pub fn neutral() -> Self {
        Self {
            index: [1.0; 12],
            strength: 0.0,
            trend: Vec::new(),
            has_enough_data: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrengthCategory {
    High,
    Medium,
    Low,
}

impl StrengthCategory {
    pub fn from_strength(strength: f64) -> Self {
        if strength > 0.7 {
            StrengthCategory::High
        } else if strength > 0.4 {
            StrengthCategory::Medium
        } else {
            StrengthCategory::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StrengthCategory::High => "High",
            StrengthCategory::Medium => "Medium",
            StrengthCategory::Low => "Low",
        }
    }
}

impl fmt::Display for StrengthCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A calendar month ranked by its seasonal index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthRanking {
    /// Zero-based calendar month
    pub month: usize,
    pub month_name: String,
    pub index: f64,
    /// Percent deviation from an average month, one decimal
    pub change: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    Inventory,
    AdSpend,
    PreSeasonCampaign,
    StableDemand,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub priority: Priority,
    pub title: String,
    pub message: String,
}

/// Best/worst months and recommendations derived from a seasonal pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonalInsights {
    pub top_months: Vec<MonthRanking>,
    pub bottom_months: Vec<MonthRanking>,
    pub strength_category: StrengthCategory,
    pub recommendations: Vec<Recommendation>,
}
