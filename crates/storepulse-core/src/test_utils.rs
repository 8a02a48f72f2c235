//! Test utilities for storepulse-core
//!
//! Fixture builders for monthly summaries and unit-sales series.

use crate::models::{AbandonedCarts, MonthlySalesPoint, MonthlySummary, YearMonth};

/// Builder for `MonthlySummary` fixtures
///
/// Starts from an all-zero summary without optional metrics.
#[derive(Debug, Clone)]
pub struct SummaryBuilder {
    summary: MonthlySummary,
}

impl SummaryBuilder {
    pub fn new(store_id: &str, year: i32, month: u32) -> Self {
        Self {
            summary: MonthlySummary {
                store_id: store_id.to_string(),
                month,
                year,
                revenue: 0.0,
                orders: 0,
                aov: 0.0,
                returning_customer_rate: 0.0,
                conversion_rate: None,
                avg_shipping_time: None,
                units_sold: 0,
                abandoned_carts: None,
            },
        }
    }

    pub fn month(mut self, month: u32) -> Self {
        self.summary.month = month;
        self
    }

    pub fn revenue(mut self, revenue: f64) -> Self {
        self.summary.revenue = revenue;
        self
    }

    pub fn orders(mut self, orders: u64) -> Self {
        self.summary.orders = orders;
        self
    }

    pub fn aov(mut self, aov: f64) -> Self {
        self.summary.aov = aov;
        self
    }

    pub fn returning_customer_rate(mut self, rate: f64) -> Self {
        self.summary.returning_customer_rate = rate;
        self
    }

    pub fn conversion_rate(mut self, rate: f64) -> Self {
        self.summary.conversion_rate = Some(rate);
        self
    }

    pub fn avg_shipping_time(mut self, days: f64) -> Self {
        self.summary.avg_shipping_time = Some(days);
        self
    }

    pub fn abandoned_carts(
        mut self,
        count: u64,
        potential_revenue: f64,
        recovery_rate: Option<f64>,
    ) -> Self {
        self.summary.abandoned_carts = Some(AbandonedCarts {
            count,
            potential_revenue,
            recovery_rate,
        });
        self
    }

    pub fn build(self) -> MonthlySummary {
        self.summary
    }
}

/// Consecutive monthly points starting at (year, month)
pub fn monthly_series(year: i32, month: u32, units: &[u64]) -> Vec<MonthlySalesPoint> {
    let mut period = YearMonth::new(year, month);
    let mut series = Vec::with_capacity(units.len());
    for &u in units {
        let date = period.first_day().expect("fixture month is valid");
        series.push(MonthlySalesPoint::new(date, u));
        period = period.succ();
    }
    series
}

/// `years` of 100 units/month with November at 180 and December at 200, from January 2022
pub fn holiday_series(years: usize) -> Vec<MonthlySalesPoint> {
    let year: Vec<u64> = (0..12)
        .map(|m| match m {
            10 => 180,
            11 => 200,
            _ => 100,
        })
        .collect();
    let units: Vec<u64> = year.iter().copied().cycle().take(12 * years).collect();
    monthly_series(2022, 1, &units)
}
