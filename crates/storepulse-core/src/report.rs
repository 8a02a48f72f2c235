//! Report assembly
//!
//! Picks the target month out of a set of summaries, runs every analyzer
//! against it and bundles the results into a single serializable report.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::analytics::{
    analyze_root_causes, decompose_seasonality, derive_seasonal_insights, generate_alerts, Alert,
    RootCauseAnalysis, SeasonalInsights, SeasonalPattern,
};
use crate::config::ReportConfig;
use crate::error::{Error, Result};
use crate::models::{MonthlySalesPoint, MonthlySummary, YearMonth};
use crate::narrative::{Narrative, NarrativeBackend, NarrativeRequest};

/// Seasonality section of a report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonalitySection {
    pub pattern: SeasonalPattern,
    pub insights: SeasonalInsights,
}

/// Everything known about one store-month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreReport {
    pub store_id: String,
    /// YYYY-MM
    pub period: String,
    pub current: MonthlySummary,
    pub previous: Option<MonthlySummary>,
    pub root_causes: RootCauseAnalysis,
    pub alerts: Vec<Alert>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seasonality: Option<SeasonalitySection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narrative: Option<Narrative>,
}

pub struct ReportBuilder {
    config: ReportConfig,
    narrator: Option<Box<dyn NarrativeBackend>>,
}

impl ReportBuilder {
    pub fn new(config: &ReportConfig) -> Self {
        Self {
            config: config.clone(),
            narrator: None,
        }
    }

    /// Attach a narrative backend (ignored when `report.narrative` is off)
    pub fn with_narrator(mut self, narrator: impl NarrativeBackend + 'static) -> Self {
        self.narrator = Some(Box::new(narrator));
        self
    }

    /// Build the report for `period`, or the latest month present
    ///
    /// `store` may be omitted only when every summary belongs to one store.
    pub fn build(
        &self,
        summaries: &[MonthlySummary],
        sales: &[MonthlySalesPoint],
        period: Option<YearMonth>,
        store: Option<&str>,
    ) -> Result<StoreReport> {
        let store_id = select_store(summaries, store)?;
        let history: Vec<&MonthlySummary> = summaries
            .iter()
            .filter(|s| s.store_id == store_id)
            .collect();

        let current = select_current(&history, period)?;
        let previous = history.iter().copied().find(|s| s.precedes(current));

        if previous.is_none() {
            debug!(
                store = %current.store_id,
                period = %current.period(),
                "No summary for the preceding month"
            );
        }

        let root_causes = analyze_root_causes(current, previous);
        let alerts = generate_alerts(current, previous);

        let seasonality = (self.config.include_seasonality && !sales.is_empty()).then(|| {
            let pattern = decompose_seasonality(sales);
            let insights = derive_seasonal_insights(&pattern);
            SeasonalitySection { pattern, insights }
        });

        let narrative = self.narrate(current, &root_causes, &alerts);

        Ok(StoreReport {
            store_id: current.store_id.clone(),
            period: current.period().to_string(),
            current: current.clone(),
            previous: previous.cloned(),
            root_causes,
            alerts,
            seasonality,
            narrative,
        })
    }

    fn narrate(
        &self,
        current: &MonthlySummary,
        analysis: &RootCauseAnalysis,
        alerts: &[Alert],
    ) -> Option<Narrative> {
        if !self.config.narrative {
            return None;
        }
        let narrator = self.narrator.as_ref()?;

        let request = NarrativeRequest {
            store_id: &current.store_id,
            period: current.period(),
            root_causes: &analysis.root_causes,
            alerts,
        };

        match narrator.summarize(&request) {
            Ok(narrative) => Some(narrative),
            Err(e) => {
                warn!(backend = narrator.name(), error = %e, "Narrative generation failed");
                None
            }
        }
    }
}

fn select_store<'a>(summaries: &'a [MonthlySummary], store: Option<&'a str>) -> Result<&'a str> {
    if let Some(store) = store {
        return if summaries.iter().any(|s| s.store_id == store) {
            Ok(store)
        } else {
            Err(Error::NotFound(format!("No summaries for store {}", store)))
        };
    }

    let stores: BTreeSet<&str> = summaries.iter().map(|s| s.store_id.as_str()).collect();
    let mut iter = stores.iter().copied();
    match (iter.next(), iter.next()) {
        (None, _) => Err(Error::NotFound("No summaries to report on".into())),
        (Some(only), None) => Ok(only),
        _ => Err(Error::InvalidData(format!(
            "Summaries cover {} stores ({}); choose one",
            stores.len(),
            stores.iter().copied().collect::<Vec<_>>().join(", ")
        ))),
    }
}

fn select_current<'a>(
    history: &[&'a MonthlySummary],
    period: Option<YearMonth>,
) -> Result<&'a MonthlySummary> {
    match period {
        Some(p) => history
            .iter()
            .copied()
            .find(|s| s.period() == p)
            .ok_or_else(|| Error::NotFound(format!("No summary for {}", p))),
        None => history
            .iter()
            .copied()
            .reduce(|best, s| if s.period() > best.period() { s } else { best })
            .ok_or_else(|| Error::NotFound("No summaries to report on".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::{AlertMetric, AlertType};
    use crate::narrative::MockNarrator;
    use crate::test_utils::{holiday_series, SummaryBuilder};

    fn summaries() -> Vec<MonthlySummary> {
        vec![
            SummaryBuilder::new("shop", 2024, 2)
                .revenue(10_000.0)
                .orders(100)
                .aov(100.0)
                .returning_customer_rate(0.3)
                .build(),
            SummaryBuilder::new("shop", 2024, 1)
                .revenue(8_000.0)
                .orders(80)
                .aov(100.0)
                .returning_customer_rate(0.3)
                .build(),
            SummaryBuilder::new("shop", 2024, 3)
                .revenue(11_800.0)
                .orders(118)
                .aov(100.0)
                .returning_customer_rate(0.3)
                .build(),
        ]
    }

    #[test]
    fn test_defaults_to_latest_period() {
        let report = ReportBuilder::new(&ReportConfig::default())
            .build(&summaries(), &[], None, None)
            .unwrap();

        assert_eq!(report.period, "2024-03");
        assert_eq!(report.previous.as_ref().map(|p| p.month), Some(2));
        // Revenue +18%, orders +18%
        assert_eq!(report.root_causes.root_causes.len(), 2);
        assert!(report.seasonality.is_none());
        assert!(report.narrative.is_none());
    }

    #[test]
    fn test_explicit_period() {
        let report = ReportBuilder::new(&ReportConfig::default())
            .build(&summaries(), &[], Some(YearMonth::new(2024, 2)), None)
            .unwrap();

        assert_eq!(report.current.month, 2);
        assert_eq!(report.previous.as_ref().map(|p| p.month), Some(1));
    }

    #[test]
    fn test_missing_period_is_not_found() {
        let builder = ReportBuilder::new(&ReportConfig::default());

        let err = builder
            .build(&summaries(), &[], Some(YearMonth::new(2023, 7)), None)
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));

        let err = builder.build(&[], &[], None, None).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_non_adjacent_previous_is_ignored() {
        let data: Vec<MonthlySummary> = summaries()
            .into_iter()
            .filter(|s| s.month != 2)
            .collect();

        let report = ReportBuilder::new(&ReportConfig::default())
            .build(&data, &[], None, None)
            .unwrap();

        assert!(report.previous.is_none());
        assert!(report.root_causes.root_causes.is_empty());
        assert_eq!(report.alerts.len(), 1);
        assert_eq!(report.alerts[0].alert_type, AlertType::Info);
        assert_eq!(report.alerts[0].metric, AlertMetric::Welcome);
    }

    #[test]
    fn test_seasonality_included_when_enabled() {
        let sales = holiday_series(2);
        let report = ReportBuilder::new(&ReportConfig::default())
            .build(&summaries(), &sales, None, None)
            .unwrap();

        let section = report.seasonality.unwrap();
        assert!(section.pattern.has_enough_data);
        assert_eq!(section.insights.top_months[0].month_name, "December");

        let config = ReportConfig {
            include_seasonality: false,
            ..ReportConfig::default()
        };
        let report = ReportBuilder::new(&config)
            .build(&summaries(), &sales, None, None)
            .unwrap();
        assert!(report.seasonality.is_none());
    }

    #[test]
    fn test_narrative_attached() {
        let report = ReportBuilder::new(&ReportConfig::default())
            .with_narrator(MockNarrator::new())
            .build(&summaries(), &[], None, None)
            .unwrap();

        let narrative = report.narrative.unwrap();
        assert_eq!(narrative.source, "mock");
        assert!(narrative.summary.contains("2024-03"));
    }

    #[test]
    fn test_narrative_disabled_by_config() {
        let config = ReportConfig {
            narrative: false,
            ..ReportConfig::default()
        };
        let report = ReportBuilder::new(&config)
            .with_narrator(MockNarrator::new())
            .build(&summaries(), &[], None, None)
            .unwrap();
        assert!(report.narrative.is_none());
    }

    #[test]
    fn test_narrative_failure_keeps_report() {
        let report = ReportBuilder::new(&ReportConfig::default())
            .with_narrator(MockNarrator::failing())
            .build(&summaries(), &[], None, None)
            .unwrap();

        assert!(report.narrative.is_none());
        assert_eq!(report.period, "2024-03");
    }

    #[test]
    fn test_report_json_is_camel_case() {
        let report = ReportBuilder::new(&ReportConfig::default())
            .build(&summaries(), &[], None, None)
            .unwrap();
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["storeId"], "shop");
        assert!(json["rootCauses"]["rootCauses"].is_array());
        assert_eq!(json["current"]["returningCustomerRate"], 0.3);
        assert!(json.get("narrative").is_none());
    }

    fn two_store_summaries() -> Vec<MonthlySummary> {
        let mut data = summaries();
        data.push(
            SummaryBuilder::new("outlet", 2024, 3)
                .revenue(500.0)
                .orders(5)
                .aov(100.0)
                .build(),
        );
        data
    }

    #[test]
    fn test_multiple_stores_require_selection() {
        let builder = ReportBuilder::new(&ReportConfig::default());

        let mut data = two_store_summaries();
        let err = builder.build(&data, &[], None, None).unwrap_err();
        assert!(matches!(err, Error::InvalidData(_)));
        assert!(err.to_string().contains("outlet, shop"));

        // Same result whatever the input order
        data.reverse();
        let err = builder.build(&data, &[], None, None).unwrap_err();
        assert!(matches!(err, Error::InvalidData(_)));
    }

    #[test]
    fn test_store_selection() {
        let builder = ReportBuilder::new(&ReportConfig::default());
        let mut data = two_store_summaries();

        for _ in 0..2 {
            let report = builder
                .build(&data, &[], Some(YearMonth::new(2024, 3)), Some("outlet"))
                .unwrap();
            assert_eq!(report.store_id, "outlet");
            assert_eq!(report.current.revenue, 500.0);
            assert!(report.previous.is_none());

            let report = builder.build(&data, &[], None, Some("shop")).unwrap();
            assert_eq!(report.store_id, "shop");
            assert_eq!(report.previous.as_ref().map(|p| p.month), Some(2));

            data.reverse();
        }

        let err = builder.build(&data, &[], None, Some("kiosk")).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
