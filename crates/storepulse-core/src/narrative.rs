//! Narrative summaries for store reports
//!
//! A `NarrativeBackend` turns a report's findings into a short prose summary.
//! Only the mock backend ships here; it needs no external service.

use serde::{Deserialize, Serialize};

use crate::analytics::{Alert, AlertType, RootCause};
use crate::error::{Error, Result};
use crate::models::YearMonth;

/// Inputs a backend may draw on when writing a summary
#[derive(Debug, Clone)]
pub struct NarrativeRequest<'a> {
    pub store_id: &'a str,
    pub period: YearMonth,
    pub root_causes: &'a [RootCause],
    pub alerts: &'a [Alert],
}

impl NarrativeRequest<'_> {
    pub fn count_alerts(&self, alert_type: AlertType) -> usize {
        self.alerts
            .iter()
            .filter(|a| a.alert_type == alert_type)
            .count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Narrative {
    pub summary: String,
    /// Backend that produced the summary
    pub source: String,
}

/// Trait for anything that can summarize a report
pub trait NarrativeBackend: Send + Sync {
    fn name(&self) -> &str;

    fn summarize(&self, request: &NarrativeRequest<'_>) -> Result<Narrative>;
}

/// Mock narrator for tests and offline use
///
/// Fills a fixed template from the request.
#[derive(Debug, Clone)]
pub struct MockNarrator {
    fail: bool,
}

impl Default for MockNarrator {
    fn default() -> Self {
        Self::new()
    }
}

impl MockNarrator {
    pub fn new() -> Self {
        Self { fail: false }
    }

    /// A narrator whose every call errors
    pub fn failing() -> Self {
        Self { fail: true }
    }
}

impl NarrativeBackend for MockNarrator {
    fn name(&self) -> &str {
        "mock"
    }

    fn summarize(&self, request: &NarrativeRequest<'_>) -> Result<Narrative> {
        if self.fail {
            return Err(Error::Narrative("mock narrator configured to fail".into()));
        }

        let lead = match request.root_causes.first() {
            Some(cause) => format!("Biggest driver: {}.", cause.explanation),
            None => "No single metric drove a significant change.".to_string(),
        };
        let critical = request.count_alerts(AlertType::Critical);
        let warnings = request.count_alerts(AlertType::Warning);
        let opportunities = request.count_alerts(AlertType::Opportunity);

        let summary = format!(
            "Store {} in {}: {} {} critical, {} warning and {} opportunity alert(s).",
            request.store_id, request.period, lead, critical, warnings, opportunities
        );

        Ok(Narrative {
            summary,
            source: self.name().to_string(),
        })
    }
}
