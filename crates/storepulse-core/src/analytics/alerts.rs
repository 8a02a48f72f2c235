//! Threshold-based alerts for period-over-period changes
//!
//! Each rule looks at one metric and emits at most one alert, picking the
//! highest tier crossed. Alerts are independent of root-cause analysis even
//! though both read the same two summaries.

use tracing::debug;

use crate::models::{AbandonedCarts, MonthlySummary};

use super::root_cause::percent_change;
use super::types::{Alert, AlertMetric, AlertSeverity, AlertType};

/// Maximum number of alerts shown per period
pub const MAX_ALERTS: usize = 5;

/// Recovery rate assumed when abandoned carts don't carry one
pub const DEFAULT_RECOVERY_RATE: f64 = 0.2;

/// Recoverable revenue above which abandoned carts become an opportunity
const ABANDONED_CART_OPPORTUNITY: f64 = 500.0;

/// Evaluate all alert rules for a period
///
/// The first tracked period gets a single welcome alert.
pub fn generate_alerts(current: &MonthlySummary, previous: Option<&MonthlySummary>) -> Vec<Alert> {
    let Some(previous) = previous else {
        return vec![welcome_alert()];
    };

    let mut alerts: Vec<Alert> = [
        revenue_alert(current, previous),
        aov_alert(current, previous),
        returning_customer_alert(current, previous),
        conversion_alert(current, previous),
        shipping_alert(current, previous),
        current.abandoned_carts.as_ref().and_then(abandoned_cart_alert),
    ]
    .into_iter()
    .flatten()
    .collect();

    // Stable: rule order breaks ties within a severity
    alerts.sort_by(|a, b| b.severity.priority().cmp(&a.severity.priority()));
    alerts.truncate(MAX_ALERTS);

    debug!(
        store = current.store_id.as_str(),
        period = %current.period(),
        alerts = alerts.len(),
        "Alert evaluation complete"
    );

    alerts
}

fn welcome_alert() -> Alert {
    Alert::new(
        AlertType::Info,
        AlertSeverity::Low,
        AlertMetric::Welcome,
        0.0,
        "Welcome! This is your first tracked month. Alerts will appear once there is a previous month to compare against.",
    )
    .not_actionable()
}

fn revenue_alert(current: &MonthlySummary, previous: &MonthlySummary) -> Option<Alert> {
    let change = current.revenue - previous.revenue;
    let pct = percent_change(current.revenue, previous.revenue);
    let magnitude = pct.abs();
    let growing = change > 0.0;

    let severity = if magnitude >= 20.0 {
        AlertSeverity::High
    } else if magnitude >= 10.0 {
        AlertSeverity::Medium
    } else {
        return None;
    };

    let alert = if growing {
        Alert::new(
            AlertType::Success,
            severity,
            AlertMetric::Revenue,
            change,
            format!(
                "Revenue grew by {} ({:.1}%) compared to last month",
                format_currency(change),
                magnitude
            ),
        )
        .not_actionable()
    } else {
        let alert_type = match severity {
            AlertSeverity::High => AlertType::Critical,
            _ => AlertType::Warning,
        };
        Alert::new(
            alert_type,
            severity,
            AlertMetric::Revenue,
            change,
            format!(
                "Revenue dropped by {} ({:.1}%) compared to last month. Review traffic sources and top products.",
                format_currency(change),
                magnitude
            ),
        )
    };

    Some(alert.with_change_percent(pct))
}

fn aov_alert(current: &MonthlySummary, previous: &MonthlySummary) -> Option<Alert> {
    let change = current.aov - previous.aov;
    let pct = percent_change(current.aov, previous.aov);
    if pct.abs() < 25.0 {
        return None;
    }

    let alert = if change > 0.0 {
        Alert::new(
            AlertType::Success,
            AlertSeverity::Medium,
            AlertMetric::AverageOrderValue,
            change,
            format!(
                "Average order value rose {:.1}% to {}",
                pct.abs(),
                format_currency_cents(current.aov)
            ),
        )
        .not_actionable()
    } else {
        Alert::new(
            AlertType::Critical,
            AlertSeverity::High,
            AlertMetric::AverageOrderValue,
            change,
            format!(
                "Average order value fell {:.1}% to {}. Consider bundles or free-shipping thresholds.",
                pct.abs(),
                format_currency_cents(current.aov)
            ),
        )
    };

    Some(alert.with_change_percent(pct))
}

fn returning_customer_alert(current: &MonthlySummary, previous: &MonthlySummary) -> Option<Alert> {
    let change = current.returning_customer_rate - previous.returning_customer_rate;
    let pct = percent_change(
        current.returning_customer_rate,
        previous.returning_customer_rate,
    );

    let alert = if pct <= -5.0 {
        Alert::new(
            AlertType::Warning,
            AlertSeverity::Medium,
            AlertMetric::ReturningCustomers,
            change,
            format!(
                "Returning customer rate fell {:.1}% to {:.1}%. Consider a win-back email campaign for lapsed customers.",
                pct.abs(),
                current.returning_customer_rate * 100.0
            ),
        )
    } else if pct >= 5.0 {
        Alert::new(
            AlertType::Success,
            AlertSeverity::Medium,
            AlertMetric::ReturningCustomers,
            change,
            format!(
                "Returning customer rate improved {:.1}% to {:.1}%",
                pct,
                current.returning_customer_rate * 100.0
            ),
        )
        .not_actionable()
    } else {
        return None;
    };

    Some(alert.with_change_percent(pct))
}

fn conversion_alert(current: &MonthlySummary, previous: &MonthlySummary) -> Option<Alert> {
    let (current_rate, previous_rate) = (current.conversion_rate?, previous.conversion_rate?);
    let pct = percent_change(current_rate, previous_rate);
    if pct > -15.0 {
        return None;
    }

    Some(
        Alert::new(
            AlertType::Warning,
            AlertSeverity::Medium,
            AlertMetric::ConversionRate,
            current_rate - previous_rate,
            format!(
                "Conversion rate dropped {:.1}% to {:.2}%. Check checkout flow and page speed.",
                pct.abs(),
                current_rate * 100.0
            ),
        )
        .with_change_percent(pct),
    )
}

fn shipping_alert(current: &MonthlySummary, previous: &MonthlySummary) -> Option<Alert> {
    let (current_days, previous_days) = (current.avg_shipping_time?, previous.avg_shipping_time?);
    let change = current_days - previous_days;
    let pct = percent_change(current_days, previous_days);

    let alert = if change >= 2.0 {
        Alert::new(
            AlertType::Critical,
            AlertSeverity::High,
            AlertMetric::ShippingTime,
            change,
            format!(
                "Shipping slowed by {:.1} days (now {:.1} days). Contact your fulfillment partner.",
                change, current_days
            ),
        )
    } else if change >= 1.0 {
        Alert::new(
            AlertType::Warning,
            AlertSeverity::Medium,
            AlertMetric::ShippingTime,
            change,
            format!(
                "Shipping slowed by {:.1} days (now {:.1} days)",
                change, current_days
            ),
        )
    } else if change <= -1.0 {
        Alert::new(
            AlertType::Success,
            AlertSeverity::Low,
            AlertMetric::ShippingTime,
            change,
            format!(
                "Shipping is {:.1} days faster (now {:.1} days)",
                change.abs(),
                current_days
            ),
        )
        .not_actionable()
    } else {
        return None;
    };

    Some(alert.with_change_percent(pct))
}

fn abandoned_cart_alert(carts: &AbandonedCarts) -> Option<Alert> {
    let rate = carts.recovery_rate.unwrap_or(DEFAULT_RECOVERY_RATE);
    let recoverable = carts.potential_revenue * rate;
    if recoverable <= ABANDONED_CART_OPPORTUNITY {
        return None;
    }

    Some(Alert::new(
        AlertType::Opportunity,
        AlertSeverity::Medium,
        AlertMetric::AbandonedCarts,
        recoverable,
        format!(
            "{} abandoned carts worth {}. A recovery email flow could win back about {}.",
            carts.count,
            format_currency(carts.potential_revenue),
            format_currency(recoverable)
        ),
    ))
}

/// Whole-dollar amount with thousands separators, sign dropped ("$20,000")
pub fn format_currency(amount: f64) -> String {
    let dollars = amount.abs().round() as u64;
    format!("${}", group_thousands(dollars))
}

/// Dollar amount with cents ("$1,234.50"), sign dropped
pub fn format_currency_cents(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    format!("${}.{:02}", group_thousands(cents / 100), cents % 100)
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
