//! Integration tests for storepulse-core
//!
//! These exercise the import → aggregate → report workflow and the engine's
//! documented behaviors through the public API only.

use chrono::NaiveDate;
use storepulse_core::{
    analyze_root_causes, decompose_seasonality, dedupe_orders, derive_seasonal_insights,
    generate_alerts, parse_orders_csv, parse_sessions_csv,
    report::ReportBuilder,
    AlertMetric, AlertSeverity, AlertType, Direction, Impact, ImportConfig, MetricKind,
    MockNarrator, MonthlyAggregator, MonthlySalesPoint, MonthlySummary, ReportConfig, YearMonth,
};

fn summary(year: i32, month: u32) -> MonthlySummary {
    MonthlySummary {
        store_id: "store-1".to_string(),
        month,
        year,
        revenue: 100_000.0,
        orders: 1_000,
        aov: 100.0,
        returning_customer_rate: 0.3,
        conversion_rate: Some(0.02),
        avg_shipping_time: Some(4.0),
        units_sold: 2_500,
        abandoned_carts: None,
    }
}

fn series(units: &[u64]) -> Vec<MonthlySalesPoint> {
    let mut period = YearMonth::new(2022, 1);
    units
        .iter()
        .map(|&u| {
            let point = MonthlySalesPoint::new(period.first_day().unwrap(), u);
            period = period.succ();
            point
        })
        .collect()
}

fn holiday_units(years: usize) -> Vec<u64> {
    (0..12 * years)
        .map(|i| match i % 12 {
            10 => 180,
            11 => 200,
            _ => 100,
        })
        .collect()
}

fn orders_csv() -> &'static str {
    r#"order_id,created_at,customer_id,total,units,shipping_days,status
A1,2024-01-03,c1,$100.00,2,3,completed
A2,2024-01-08,c2,$100.00,1,5,completed
A3,2024-01-15,c3,$100.00,3,4,completed
A4,2024-01-21,c4,$100.00,2,4,completed
A5,2024-01-25,c9,$50.00,1,,abandoned
B1,2024-02-02,c1,$100.00,2,4,completed
B2,2024-02-10,c2,$100.00,1,4,completed
B3,2024-02-18,c5,$100.00,1,4,completed
B3,2024-02-18,c5,$100.00,1,4,completed
B4,2024-02-20,c6,$40.00,1,,cancelled"#
}

// =============================================================================
// Import → Aggregate → Report
// =============================================================================

#[test]
fn test_full_report_workflow() {
    let config = ImportConfig::default();
    let orders = parse_orders_csv(orders_csv().as_bytes(), &config).expect("Failed to parse CSV");
    assert_eq!(orders.len(), 10);

    let orders = dedupe_orders(orders);
    assert_eq!(orders.len(), 9);

    let sessions = parse_sessions_csv("month,sessions\n2024-01,200\n2024-02,150".as_bytes())
        .expect("Failed to parse sessions");

    let aggregator = MonthlyAggregator::new("store-1", config.recovery_rate);
    let summaries = aggregator.summarize(&orders, &sessions);
    assert_eq!(summaries.len(), 2);

    let feb = &summaries[1];
    assert_eq!(feb.revenue, 300.0);
    assert_eq!(feb.orders, 3);
    assert_eq!(feb.conversion_rate, Some(0.02));
    assert_eq!(feb.avg_shipping_time, Some(4.0));
    assert!((feb.returning_customer_rate - 2.0 / 3.0).abs() < 1e-12);

    let report = ReportBuilder::new(&ReportConfig::default())
        .with_narrator(MockNarrator::new())
        .build(&summaries, &aggregator.sales_series(&orders), None, None)
        .expect("Failed to build report");

    assert_eq!(report.period, "2024-02");
    assert_eq!(report.previous.as_ref().map(|p| p.month), Some(1));

    // Revenue and orders both fell 25%; conversion and shipping held steady
    let causes = &report.root_causes.root_causes;
    assert_eq!(causes.len(), 2);
    assert_eq!(causes[0].metric, MetricKind::Revenue);
    assert_eq!(causes[0].direction, Direction::Down);
    assert_eq!(causes[1].metric, MetricKind::Orders);

    assert_eq!(report.alerts[0].alert_type, AlertType::Critical);
    assert_eq!(report.alerts[0].metric, AlertMetric::Revenue);

    // Two months of sales is not enough history
    let seasonality = report.seasonality.as_ref().unwrap();
    assert!(!seasonality.pattern.has_enough_data);

    assert!(report.narrative.is_some());

    let json = serde_json::to_string(&report).unwrap();
    assert!(json.contains("\"storeId\":\"store-1\""));
}

// =============================================================================
// Root causes
// =============================================================================

#[test]
fn test_no_previous_period() {
    let current = summary(2024, 3);

    let analysis = analyze_root_causes(&current, None);
    assert!(analysis.root_causes.is_empty());
    assert!(analysis.deltas.is_none());

    let alerts = generate_alerts(&current, None);
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].alert_type, AlertType::Info);
    assert!(!alerts[0].actionable);
}

#[test]
fn test_revenue_growth_is_high_impact() {
    let previous = summary(2024, 2);
    let current = MonthlySummary {
        revenue: 118_000.0,
        ..summary(2024, 3)
    };

    let analysis = analyze_root_causes(&current, Some(&previous));

    assert_eq!(analysis.root_causes.len(), 1);
    let cause = &analysis.root_causes[0];
    assert_eq!(cause.metric, MetricKind::Revenue);
    assert!((cause.change_percent - 18.0).abs() < 1e-9);
    assert_eq!(cause.impact, Impact::High);
    assert_eq!(cause.direction, Direction::Up);
    assert!(cause.explanation.contains("18.0%"));
}

#[test]
fn test_small_changes_are_ignored() {
    let previous = summary(2024, 2);
    // 4% on every metric: under both the 5% and shipping 10% thresholds
    let current = MonthlySummary {
        revenue: 104_000.0,
        orders: 1_040,
        aov: 104.0,
        returning_customer_rate: 0.312,
        conversion_rate: Some(0.0208),
        avg_shipping_time: Some(4.16),
        ..summary(2024, 3)
    };

    let analysis = analyze_root_causes(&current, Some(&previous));
    assert!(analysis.root_causes.is_empty());
    assert!(analysis.deltas.is_some());
}

#[test]
fn test_impact_tiers_follow_weighted_change() {
    let previous = summary(2024, 2);
    let impact_for = |revenue: f64| {
        let current = MonthlySummary {
            revenue,
            ..summary(2024, 3)
        };
        analyze_root_causes(&current, Some(&previous)).root_causes[0].impact
    };

    assert_eq!(impact_for(116_000.0), Impact::High);
    assert_eq!(impact_for(110_000.0), Impact::Medium);
    assert_eq!(impact_for(106_000.0), Impact::Low);
    assert_eq!(impact_for(84_000.0), Impact::High);
}

#[test]
fn test_small_aov_change() {
    let previous = MonthlySummary {
        aov: 50.0,
        ..summary(2024, 2)
    };
    let current = MonthlySummary {
        aov: 51.5,
        ..summary(2024, 3)
    };

    let analysis = analyze_root_causes(&current, Some(&previous));
    assert!(analysis
        .root_causes
        .iter()
        .all(|c| c.metric != MetricKind::Aov));

    let alerts = generate_alerts(&current, Some(&previous));
    assert!(alerts
        .iter()
        .all(|a| a.metric != AlertMetric::AverageOrderValue));
}

// =============================================================================
// Alerts
// =============================================================================

#[test]
fn test_revenue_drop_alert() {
    let previous = summary(2024, 2);
    let current = MonthlySummary {
        revenue: 80_000.0,
        ..summary(2024, 3)
    };

    let alerts = generate_alerts(&current, Some(&previous));
    let revenue: Vec<_> = alerts
        .iter()
        .filter(|a| a.metric == AlertMetric::Revenue)
        .collect();

    assert_eq!(revenue.len(), 1);
    assert_eq!(revenue[0].alert_type, AlertType::Critical);
    assert_eq!(revenue[0].severity, AlertSeverity::High);
    assert!(revenue[0].message.contains("$20,000"));
    assert!(revenue[0].actionable);
}

// =============================================================================
// Seasonality
// =============================================================================

#[test]
fn test_constant_series_has_no_seasonality() {
    let pattern = decompose_seasonality(&series(&[250; 24]));

    assert!(pattern.has_enough_data);
    assert!(pattern.strength.abs() < 1e-12);
    for index in pattern.index {
        assert!((index - 1.0).abs() < 1e-12);
    }
}

#[test]
fn test_seasonal_indices_average_to_one() {
    let units: Vec<u64> = (0..36).map(|i| 80 + (i * 7 % 50) as u64).collect();
    let pattern = decompose_seasonality(&series(&units));

    assert!(pattern.has_enough_data);
    let mean: f64 = pattern.index.iter().sum::<f64>() / 12.0;
    assert!((mean - 1.0).abs() < 1e-9);
    assert!((0.0..=1.0).contains(&pattern.strength));
}

#[test]
fn test_holiday_peaks() {
    let pattern = decompose_seasonality(&series(&holiday_units(2)));
    assert!(pattern.strength > 0.4);

    let insights = derive_seasonal_insights(&pattern);
    let top: Vec<&str> = insights
        .top_months
        .iter()
        .map(|m| m.month_name.as_str())
        .collect();
    assert!(top.contains(&"November"));
    assert!(top.contains(&"December"));
    assert_ne!(insights.strength_category.as_str(), "Low");
}

#[test]
fn test_short_series_is_neutral() {
    let pattern = decompose_seasonality(&series(&[10, 20, 30]));
    assert!(!pattern.has_enough_data);
    assert_eq!(pattern.index, [1.0; 12]);

    let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let single = decompose_seasonality(&[MonthlySalesPoint::new(date, 5)]);
    assert_eq!(single.strength, 0.0);
}
