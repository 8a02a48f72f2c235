//! Root-cause attribution between two adjacent periods
//!
//! Each metric's percent change is weighted by how much it usually matters to
//! the merchant, classified into High/Medium/Low impact, and explained with a
//! canned sentence. Only the five most important causes are kept.

use tracing::debug;

use crate::models::MonthlySummary;

use super::types::{
    Direction, Impact, MetricDelta, MetricKind, PeriodDeltas, RootCause, RootCauseAnalysis,
};

/// Maximum number of root causes reported per period
pub const MAX_ROOT_CAUSES: usize = 5;

/// Percent change from `previous` to `current`; 0 when `previous` is 0
pub fn percent_change(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        0.0
    } else {
        (current - previous) / previous.abs() * 100.0
    }
}

/// Compare a period with the one before it
///
/// Returns no causes and no deltas when there is no previous period (first
/// tracked month).
pub fn analyze_root_causes(
    current: &MonthlySummary,
    previous: Option<&MonthlySummary>,
) -> RootCauseAnalysis {
    let Some(previous) = previous else {
        return RootCauseAnalysis::default();
    };

    let mut causes: Vec<RootCause> = MetricKind::ALL
        .iter()
        .filter_map(|&metric| {
            let delta = metric_delta(metric, current, previous)?;
            root_cause(metric, &delta)
        })
        .collect();

    causes.sort_by(|a, b| {
        b.impact.rank().cmp(&a.impact.rank()).then_with(|| {
            b.change_percent
                .abs()
                .partial_cmp(&a.change_percent.abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    });
    causes.truncate(MAX_ROOT_CAUSES);

    debug!(
        store = current.store_id.as_str(),
        period = %current.period(),
        root_causes = causes.len(),
        "Root cause analysis complete"
    );

    RootCauseAnalysis {
        root_causes: causes,
        deltas: Some(period_deltas(current, previous)),
    }
}

fn metric_delta(
    metric: MetricKind,
    current: &MonthlySummary,
    previous: &MonthlySummary,
) -> Option<MetricDelta> {
    let current = metric.value(current)?;
    let previous = metric.value(previous)?;
    Some(MetricDelta {
        current,
        previous,
        change: current - previous,
        change_percent: percent_change(current, previous),
    })
}

fn period_deltas(current: &MonthlySummary, previous: &MonthlySummary) -> PeriodDeltas {
    let required = |metric: MetricKind| {
        let current = metric.value(current).unwrap_or_default();
        let previous = metric.value(previous).unwrap_or_default();
        MetricDelta {
            current,
            previous,
            change: current - previous,
            change_percent: percent_change(current, previous),
        }
    };

    PeriodDeltas {
        revenue: required(MetricKind::Revenue),
        orders: required(MetricKind::Orders),
        aov: required(MetricKind::Aov),
        returning_customer_rate: required(MetricKind::ReturningCustomerRate),
        conversion_rate: metric_delta(MetricKind::ConversionRate, current, previous),
        avg_shipping_time: metric_delta(MetricKind::AvgShippingTime, current, previous),
    }
}

fn root_cause(metric: MetricKind, delta: &MetricDelta) -> Option<RootCause> {
    let magnitude = delta.change_percent.abs();
    if magnitude < metric.inclusion_threshold() {
        return None;
    }

    let direction = Direction::of(delta.change);
    Some(RootCause {
        metric,
        change: delta.change,
        change_percent: delta.change_percent,
        impact: Impact::from_weighted_change(magnitude * metric.weight()),
        explanation: explain(metric, direction, magnitude),
        direction,
    })
}

/// Canned sentence for a metric moving in a direction by `percent`
pub fn explain(metric: MetricKind, direction: Direction, percent: f64) -> String {
    use Direction::{Down, Up};
    use MetricKind::*;

    match (metric, direction) {
        (Revenue, Up) => format!("Revenue increased by {:.1}% compared to last month", percent),
        (Revenue, Down) => format!("Revenue decreased by {:.1}% compared to last month", percent),
        (Orders, Up) => format!(
            "Order volume grew by {:.1}% - more customers completed purchases",
            percent
        ),
        (Orders, Down) => format!(
            "Order volume dropped by {:.1}% - fewer customers completed purchases",
            percent
        ),
        (Aov, Up) => format!(
            "Customers spent more per order - average order value rose by {:.1}%",
            percent
        ),
        (Aov, Down) => format!(
            "Customers spent less per order - average order value fell by {:.1}%",
            percent
        ),
        (ReturningCustomerRate, Up) => format!(
            "More repeat customers - returning customer rate rose by {:.1}%",
            percent
        ),
        (ReturningCustomerRate, Down) => format!(
            "Fewer repeat customers - returning customer rate fell by {:.1}%",
            percent
        ),
        (ConversionRate, Up) => format!(
            "More visitors are buying - conversion rate improved by {:.1}%",
            percent
        ),
        (ConversionRate, Down) => format!(
            "Fewer visitors are buying - conversion rate dropped by {:.1}%",
            percent
        ),
        (AvgShippingTime, Up) => format!(
            "Deliveries are slower - average shipping time increased by {:.1}%",
            percent
        ),
        (AvgShippingTime, Down) => format!(
            "Deliveries are faster - average shipping time decreased by {:.1}%",
            percent
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::SummaryBuilder;

    fn baseline() -> SummaryBuilder {
        SummaryBuilder::new("shop", 2024, 5)
            .revenue(100_000.0)
            .orders(2_000)
            .aov(50.0)
            .returning_customer_rate(0.30)
    }

    #[test]
    fn test_no_previous_period() {
        let current = baseline().build();
        let analysis = analyze_root_causes(&current, None);

        assert!(analysis.root_causes.is_empty());
        assert!(analysis.deltas.is_none());
    }

    #[test]
    fn test_percent_change_zero_previous() {
        assert_eq!(percent_change(500.0, 0.0), 0.0);
        assert_eq!(percent_change(0.0, 0.0), 0.0);
        assert!((percent_change(90.0, -100.0) - 190.0).abs() < 1e-9);
    }

    #[test]
    fn test_revenue_growth_is_high_impact() {
        let previous = baseline().month(4).build();
        let current = baseline().revenue(118_000.0).build();
        let analysis = analyze_root_causes(&current, Some(&previous));

        assert_eq!(analysis.root_causes.len(), 1);
        let cause = &analysis.root_causes[0];
        assert_eq!(cause.metric, MetricKind::Revenue);
        assert!((cause.change_percent - 18.0).abs() < 1e-9);
        assert!((cause.change - 18_000.0).abs() < 1e-9);
        assert_eq!(cause.impact, Impact::High);
        assert_eq!(cause.direction, Direction::Up);
        assert!(cause.explanation.contains("18.0%"));
    }

    #[test]
    fn test_small_aov_change_is_ignored() {
        let previous = baseline().month(4).build();
        let current = baseline().aov(51.5).build();
        let analysis = analyze_root_causes(&current, Some(&previous));

        assert!(analysis.root_causes.is_empty());
        let deltas = analysis.deltas.unwrap();
        assert!((deltas.aov.change_percent - 3.0).abs() < 1e-9);
        assert_eq!(deltas.get(MetricKind::Aov), Some(&deltas.aov));
        assert!(deltas.get(MetricKind::ConversionRate).is_none());
    }

    #[test]
    fn test_shipping_requires_ten_percent() {
        let previous = baseline().month(4).avg_shipping_time(4.0).build();

        let slower = baseline().avg_shipping_time(4.3).build();
        assert!(analyze_root_causes(&slower, Some(&previous))
            .root_causes
            .is_empty());

        let much_slower = baseline().avg_shipping_time(5.0).build();
        let analysis = analyze_root_causes(&much_slower, Some(&previous));
        assert_eq!(analysis.root_causes.len(), 1);
        let cause = &analysis.root_causes[0];
        assert_eq!(cause.metric, MetricKind::AvgShippingTime);
        // 25% * 0.5 = 12.5
        assert_eq!(cause.impact, Impact::Medium);
        assert_eq!(cause.direction, Direction::Up);
    }

    #[test]
    fn test_changes_exactly_at_threshold_are_included() {
        let previous = baseline().month(4).avg_shipping_time(4.0).build();
        let current = baseline()
            .revenue(105_000.0)
            .avg_shipping_time(4.4)
            .build();
        let analysis = analyze_root_causes(&current, Some(&previous));

        assert_eq!(analysis.root_causes.len(), 2);
        let revenue = analysis
            .root_causes
            .iter()
            .find(|c| c.metric == MetricKind::Revenue)
            .unwrap();
        assert!((revenue.change_percent - 5.0).abs() < 1e-9);
        assert_eq!(revenue.impact, Impact::Low);

        let shipping = analysis
            .root_causes
            .iter()
            .find(|c| c.metric == MetricKind::AvgShippingTime)
            .unwrap();
        assert!((shipping.change_percent - 10.0).abs() < 1e-9);
        assert_eq!(shipping.impact, Impact::Low);
    }

    #[test]
    fn test_optional_metrics_need_both_periods() {
        let previous = baseline().month(4).build();
        let current = baseline()
            .conversion_rate(0.05)
            .avg_shipping_time(9.0)
            .build();
        let analysis = analyze_root_causes(&current, Some(&previous));

        assert!(analysis.root_causes.is_empty());
        let deltas = analysis.deltas.unwrap();
        assert!(deltas.conversion_rate.is_none());
        assert!(deltas.avg_shipping_time.is_none());
    }

    #[test]
    fn test_impact_uses_weighted_change() {
        let previous = baseline().month(4).build();
        // Orders -10% -> weighted 9 -> Medium
        // Returning rate -6% (0.30 -> 0.282) -> weighted 5.1 -> Low
        let current = baseline()
            .orders(1_800)
            .returning_customer_rate(0.282)
            .build();
        let analysis = analyze_root_causes(&current, Some(&previous));

        assert_eq!(analysis.root_causes.len(), 2);
        assert_eq!(analysis.root_causes[0].metric, MetricKind::Orders);
        assert_eq!(analysis.root_causes[0].impact, Impact::Medium);
        assert_eq!(analysis.root_causes[0].direction, Direction::Down);
        assert_eq!(
            analysis.root_causes[1].metric,
            MetricKind::ReturningCustomerRate
        );
        assert_eq!(analysis.root_causes[1].impact, Impact::Low);
        assert_eq!(
            analysis.root_causes[1].explanation,
            "Fewer repeat customers - returning customer rate fell by 6.0%"
        );
    }

    #[test]
    fn test_sorted_by_impact_then_magnitude_and_truncated() {
        let previous = baseline()
            .month(4)
            .conversion_rate(0.02)
            .avg_shipping_time(4.0)
            .build();
        let current = baseline()
            .revenue(130_000.0) // +30%, High
            .orders(2_600) // +30%, weighted 27, High
            .aov(60.0) // +20%, weighted 16, High
            .returning_customer_rate(0.36) // +20%, weighted 17, High
            .conversion_rate(0.03) // +50%, weighted 35, High
            .avg_shipping_time(6.0) // +50%, weighted 25, High
            .build();
        let analysis = analyze_root_causes(&current, Some(&previous));

        assert_eq!(analysis.root_causes.len(), MAX_ROOT_CAUSES);
        assert!(analysis
            .root_causes
            .iter()
            .all(|c| c.impact == Impact::High));
        let magnitudes: Vec<f64> = analysis
            .root_causes
            .iter()
            .map(|c| c.change_percent.abs())
            .collect();
        assert!(magnitudes.windows(2).all(|w| w[0] >= w[1]));
        // Smallest change (AOV or returning rate at 20%) is the one dropped
        assert_eq!(magnitudes[0].round(), 50.0);
        assert_eq!(magnitudes[4].round(), 20.0);
    }

    #[test]
    fn test_high_impact_outranks_larger_low_impact() {
        let previous = baseline().month(4).avg_shipping_time(4.0).build();
        let current = baseline()
            .revenue(116_000.0) // 16%, High
            .avg_shipping_time(5.4) // 35%, weighted 17.5, High
            .aov(54.0) // 8%, weighted 6.4, Low
            .build();
        let analysis = analyze_root_causes(&current, Some(&previous));

        let metrics: Vec<MetricKind> = analysis.root_causes.iter().map(|c| c.metric).collect();
        assert_eq!(
            metrics,
            vec![
                MetricKind::AvgShippingTime,
                MetricKind::Revenue,
                MetricKind::Aov
            ]
        );
    }

    #[test]
    fn test_every_template_interpolates_percent() {
        for metric in MetricKind::ALL {
            for direction in [Direction::Up, Direction::Down] {
                let text = explain(metric, direction, 12.345);
                assert!(text.contains("12.3%"), "{}", text);
            }
        }
    }
}
