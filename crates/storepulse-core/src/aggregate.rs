//! Roll order records up into monthly summaries and sales series

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::debug;

use crate::import::SessionCount;
use crate::models::{
    AbandonedCarts, MonthlySalesPoint, MonthlySummary, OrderRecord, OrderStatus, YearMonth,
};

/// Running totals for one month
#[derive(Debug, Default)]
struct MonthBucket<'a> {
    revenue: f64,
    orders: u64,
    units: u64,
    customers: HashSet<&'a str>,
    shipping_total: f64,
    shipping_count: u64,
    abandoned_count: u64,
    abandoned_value: f64,
}

/// Builds `MonthlySummary` records for a single store
#[derive(Debug, Clone)]
pub struct MonthlyAggregator {
    store_id: String,
    recovery_rate: f64,
}

impl MonthlyAggregator {
    pub fn new(store_id: impl Into<String>, recovery_rate: f64) -> Self {
        Self {
            store_id: store_id.into(),
            recovery_rate,
        }
    }

    /// One summary per month that has completed or abandoned orders, oldest first
    pub fn summarize(&self, orders: &[OrderRecord], sessions: &[SessionCount]) -> Vec<MonthlySummary> {
        let mut buckets: BTreeMap<YearMonth, MonthBucket> = BTreeMap::new();
        let first_seen = first_order_periods(orders);

        for order in orders {
            let period = YearMonth::from_date(order.date);
            match order.status {
                OrderStatus::Cancelled => continue,
                OrderStatus::Abandoned => {
                    let bucket = buckets.entry(period).or_default();
                    bucket.abandoned_count += 1;
                    bucket.abandoned_value += order.total;
                }
                OrderStatus::Completed => {
                    let bucket = buckets.entry(period).or_default();
                    bucket.revenue += order.total;
                    bucket.orders += 1;
                    bucket.units += order.units;
                    if let Some(customer) = order.customer_id.as_deref() {
                        bucket.customers.insert(customer);
                    }
                    if let Some(days) = order.shipping_days {
                        bucket.shipping_total += days;
                        bucket.shipping_count += 1;
                    }
                }
            }
        }

        let mut session_totals: HashMap<YearMonth, u64> = HashMap::new();
        for s in sessions {
            *session_totals.entry(s.period).or_insert(0) += s.sessions;
        }

        let summaries: Vec<MonthlySummary> = buckets
            .into_iter()
            .map(|(period, bucket)| {
                let returning = bucket
                    .customers
                    .iter()
                    .filter(|c| first_seen.get(*c).is_some_and(|first| *first < period))
                    .count();
                let returning_customer_rate = if bucket.customers.is_empty() {
                    0.0
                } else {
                    returning as f64 / bucket.customers.len() as f64
                };

                let aov = if bucket.orders > 0 {
                    bucket.revenue / bucket.orders as f64
                } else {
                    0.0
                };

                let conversion_rate = session_totals
                    .get(&period)
                    .filter(|&&s| s > 0)
                    .map(|&s| bucket.orders as f64 / s as f64);

                let avg_shipping_time = (bucket.shipping_count > 0)
                    .then(|| bucket.shipping_total / bucket.shipping_count as f64);

                let abandoned_carts = (bucket.abandoned_count > 0).then(|| AbandonedCarts {
                    count: bucket.abandoned_count,
                    potential_revenue: bucket.abandoned_value,
                    recovery_rate: Some(self.recovery_rate),
                });

                MonthlySummary {
                    store_id: self.store_id.clone(),
                    month: period.month,
                    year: period.year,
                    revenue: bucket.revenue,
                    orders: bucket.orders,
                    aov,
                    returning_customer_rate,
                    conversion_rate,
                    avg_shipping_time,
                    units_sold: bucket.units,
                    abandoned_carts,
                }
            })
            .collect();

        debug!(
            store = %self.store_id,
            months = summaries.len(),
            "Aggregated monthly summaries"
        );
        summaries
    }

    /// Completed units per month, contiguous from the first to the last month
    pub fn sales_series(&self, orders: &[OrderRecord]) -> Vec<MonthlySalesPoint> {
        let mut units: BTreeMap<YearMonth, u64> = BTreeMap::new();
        for order in orders.iter().filter(|o| o.status == OrderStatus::Completed) {
            *units.entry(YearMonth::from_date(order.date)).or_insert(0) += order.units;
        }

        let (Some(&first), Some(&last)) = (units.keys().next(), units.keys().next_back()) else {
            return Vec::new();
        };

        let mut series = Vec::new();
        let mut period = first;
        while period <= last {
            if let Some(date) = period.first_day() {
                series.push(MonthlySalesPoint::new(
                    date,
                    units.get(&period).copied().unwrap_or(0),
                ));
            }
            period = period.succ();
        }
        series
    }
}

/// Earliest month each identified customer completed an order
fn first_order_periods(orders: &[OrderRecord]) -> HashMap<&str, YearMonth> {
    let mut first: HashMap<&str, YearMonth> = HashMap::new();
    for order in orders.iter().filter(|o| o.status == OrderStatus::Completed) {
        if let Some(customer) = order.customer_id.as_deref() {
            let period = YearMonth::from_date(order.date);
            first
                .entry(customer)
                .and_modify(|p| *p = (*p).min(period))
                .or_insert(period);
        }
    }
    first
}
