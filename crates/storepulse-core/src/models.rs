//! Input records consumed by the analytics engine
//!
//! `MonthlySummary` and `MonthlySalesPoint` are produced by the aggregation
//! layer (or loaded from JSON) and are never mutated by the engine.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Calendar month names, indexed by zero-based month
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Name of a zero-based calendar month (0 = January)
pub fn month_name(month0: usize) -> &'static str {
    MONTH_NAMES[month0 % 12]
}

/// A calendar month of a specific year
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    /// 1-12
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month())
    }

    /// The calendar month immediately before this one
    pub fn pred(&self) -> Self {
        if self.month <= 1 {
            Self::new(self.year - 1, 12)
        } else {
            Self::new(self.year, self.month - 1)
        }
    }

    /// The calendar month immediately after this one
    pub fn succ(&self) -> Self {
        if self.month >= 12 {
            Self::new(self.year + 1, 1)
        } else {
            Self::new(self.year, self.month + 1)
        }
    }

    /// First day of the month, if the month is valid
    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = String;

    /// Parse "YYYY-MM"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| format!("Invalid month '{}': expected YYYY-MM", s))?;
        let year: i32 = year
            .parse()
            .map_err(|_| format!("Invalid year in '{}'", s))?;
        let month: u32 = month
            .parse()
            .map_err(|_| format!("Invalid month in '{}'", s))?;
        if !(1..=12).contains(&month) {
            return Err(format!("Month out of range in '{}'", s));
        }
        Ok(Self::new(year, month))
    }
}

/// Abandoned checkout totals for a month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbandonedCarts {
    pub count: u64,
    /// Sum of cart values that were never checked out
    pub potential_revenue: f64,
    /// Expected share of potential revenue a recovery flow wins back
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recovery_rate: Option<f64>,
}

/// Aggregated per-store, per-calendar-month business metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    pub store_id: String,
    /// 1-12
    pub month: u32,
    pub year: i32,
    pub revenue: f64,
    pub orders: u64,
    /// Average order value (revenue / orders)
    pub aov: f64,
    /// Share of customers who had ordered before, 0-1
    pub returning_customer_rate: f64,
    /// Orders per session, 0-1
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversion_rate: Option<f64>,
    /// Average days from order to delivery
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_shipping_time: Option<f64>,
    pub units_sold: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abandoned_carts: Option<AbandonedCarts>,
}

impl MonthlySummary {
    pub fn period(&self) -> YearMonth {
        YearMonth::new(self.year, self.month)
    }

    /// True when `self` covers the calendar month right before `other`, for the same store
    pub fn precedes(&self, other: &MonthlySummary) -> bool {
        self.store_id == other.store_id && self.period() == other.period().pred()
    }
}

/// Units sold in one calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySalesPoint {
    /// First day of the month
    pub date: NaiveDate,
    pub units: u64,
}

impl MonthlySalesPoint {
    pub fn new(date: NaiveDate, units: u64) -> Self {
        Self { date, units }
    }

    /// Zero-based calendar month (0 = January)
    pub fn month0(&self) -> usize {
        self.date.month0() as usize
    }
}

/// Lifecycle state of an imported order row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Paid order; counts toward revenue, orders and units
    Completed,
    /// Checkout started but never paid
    Abandoned,
    /// Cancelled or refunded; ignored by aggregation
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Abandoned => "abandoned",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "completed" | "paid" | "fulfilled" => Ok(Self::Completed),
            "abandoned" => Ok(Self::Abandoned),
            "cancelled" | "canceled" | "refunded" => Ok(Self::Cancelled),
            other => Err(format!("Unknown order status: {}", other)),
        }
    }
}

/// One order row from a store export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub order_id: String,
    pub date: NaiveDate,
    /// Absent for guest checkouts
    pub customer_id: Option<String>,
    pub total: f64,
    pub units: u64,
    pub shipping_days: Option<f64>,
    pub status: OrderStatus,
    /// SHA-256 of order id, date and total, for deduplication
    pub import_hash: String,
}
