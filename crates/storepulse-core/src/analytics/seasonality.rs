//! Seasonal decomposition of monthly unit sales
//!
//! Multiplicative model: `units = trend * seasonal * noise`.
//! - Trend is a centered 12-month moving average
//! - Seasonal index is the mean detrended ratio per calendar month, normalized to mean 1
//! - Strength compares residual variance with detrended-ratio variance
//!
//! Both entry points are total: short or degenerate series yield a neutral
//! pattern instead of an error.

use tracing::debug;

use crate::models::{month_name, MonthlySalesPoint};

use super::types::{
    MonthRanking, Priority, Recommendation, RecommendationKind, SeasonalInsights,
    SeasonalPattern, StrengthCategory,
};

/// Months in a seasonal cycle (and moving-average window)
const SEASON_LENGTH: usize = 12;

/// Positions this close to either end of the series have no trend
const HALF_WINDOW: usize = SEASON_LENGTH / 2;

/// Decompose a monthly unit-sales series into trend, seasonal index and strength
pub fn decompose_seasonality(series: &[MonthlySalesPoint]) -> SeasonalPattern {
    if series.len() < SEASON_LENGTH {
        debug!(points = series.len(), "Not enough history for seasonality");
        return SeasonalPattern::neutral();
    }

    let mut points = series.to_vec();
    points.sort_by_key(|p| p.date);

    let values: Vec<f64> = points.iter().map(|p| p.units as f64).collect();
    let trend = centered_moving_average(&values);

    let ratios: Vec<Option<f64>> = values
        .iter()
        .zip(&trend)
        .map(|(value, trend)| match trend {
            Some(t) if *t > 0.0 => Some(value / t),
            _ => None,
        })
        .collect();

    let mut buckets: [Vec<f64>; SEASON_LENGTH] = Default::default();
    for (point, ratio) in points.iter().zip(&ratios) {
        if let Some(r) = ratio {
            buckets[point.month0()].push(*r);
        }
    }

    let mut index = [1.0; SEASON_LENGTH];
    for (slot, bucket) in index.iter_mut().zip(&buckets) {
        if !bucket.is_empty() {
            *slot = mean(bucket);
        }
    }

    let index_mean = mean(&index);
    if index_mean > 0.0 {
        for slot in index.iter_mut() {
            *slot /= index_mean;
        }
    }

    let residuals: Vec<f64> = points
        .iter()
        .zip(&values)
        .zip(&trend)
        .filter_map(|((point, value), trend)| {
            let seasonal = index[point.month0()];
            match trend {
                Some(t) if *t != 0.0 && seasonal != 0.0 => Some(value / (t * seasonal)),
                _ => None,
            }
        })
        .collect();

    let valid_ratios: Vec<f64> = ratios.iter().flatten().copied().collect();
    let strength = seasonal_strength(&valid_ratios, &residuals);

    debug!(
        points = points.len(),
        valid_ratios = valid_ratios.len(),
        strength,
        "Seasonal decomposition complete"
    );

    SeasonalPattern {
        index,
        strength,
        trend,
        has_enough_data: true,
    }
}

/// Rank months and derive rule-based recommendations from a seasonal pattern
pub fn derive_seasonal_insights(pattern: &SeasonalPattern) -> SeasonalInsights {
    let rankings: Vec<MonthRanking> = pattern
        .index
        .iter()
        .enumerate()
        .map(|(month, &index)| MonthRanking {
            month,
            month_name: month_name(month).to_string(),
            index,
            change: round_one_decimal((index - 1.0) * 100.0),
        })
        .collect();

    // Stable sorts keep calendar order among equal indices
    let mut descending = rankings.clone();
    descending.sort_by(|a, b| {
        b.index
            .partial_cmp(&a.index)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let mut ascending = rankings;
    ascending.sort_by(|a, b| {
        a.index
            .partial_cmp(&b.index)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let top_months: Vec<MonthRanking> = descending.into_iter().take(3).collect();
    let bottom_months: Vec<MonthRanking> = ascending.into_iter().take(3).collect();

    let strength_category = StrengthCategory::from_strength(pattern.strength);
    let recommendations = recommend(pattern.strength, &top_months, &bottom_months);

    SeasonalInsights {
        top_months,
        bottom_months,
        strength_category,
        recommendations,
    }
}

fn recommend(
    strength: f64,
    top_months: &[MonthRanking],
    bottom_months: &[MonthRanking],
) -> Vec<Recommendation> {
    let (Some(best), Some(worst)) = (top_months.first(), bottom_months.first()) else {
        return vec![stable_demand()];
    };

    if strength <= 0.4 {
        return vec![stable_demand()];
    }

    let mut recommendations = vec![
        Recommendation {
            kind: RecommendationKind::Inventory,
            priority: Priority::High,
            title: format!("Stock up before {}", best.month_name),
            message: format!(
                "{} sales run {:.1}% above an average month. Increase inventory ahead of the peak to avoid stockouts.",
                best.month_name, best.change
            ),
        },
        Recommendation {
            kind: RecommendationKind::AdSpend,
            priority: Priority::Medium,
            title: format!("Reduce ad spend in {}", worst.month_name),
            message: format!(
                "{} sales run {:.1}% below an average month. Shift advertising budget toward stronger months.",
                worst.month_name,
                worst.change.abs()
            ),
        },
    ];

    if strength > 0.6 {
        let names: Vec<&str> = top_months.iter().map(|m| m.month_name.as_str()).collect();
        recommendations.push(Recommendation {
            kind: RecommendationKind::PreSeasonCampaign,
            priority: Priority::Medium,
            title: "Plan pre-season campaigns".to_string(),
            message: format!(
                "Your strongest months are {}. Launch marketing campaigns a few weeks before each to capture early demand.",
                join_names(&names)
            ),
        });
    }

    recommendations
}

fn stable_demand() -> Recommendation {
    Recommendation {
        kind: RecommendationKind::StableDemand,
        priority: Priority::Low,
        title: "Demand is stable year-round".to_string(),
        message: "Sales show little seasonal variation. Keep inventory and ad spend steady across the year."
            .to_string(),
    }
}

/// "A", "A and B", "A, B and C"
fn join_names(names: &[&str]) -> String {
    match names {
        [] => String::new(),
        [only] => only.to_string(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}

fn centered_moving_average(values: &[f64]) -> Vec<Option<f64>> {
    let n = values.len();
    (0..n)
        .map(|i| {
            if i < HALF_WINDOW || i + HALF_WINDOW >= n {
                None
            } else {
                Some(mean(&values[i - HALF_WINDOW..i + HALF_WINDOW]))
            }
        })
        .collect()
}

fn seasonal_strength(ratios: &[f64], residuals: &[f64]) -> f64 {
    if ratios.is_empty() || residuals.is_empty() {
        return 0.0;
    }
    let ratio_variance = population_variance(ratios);
    if ratio_variance == 0.0 {
        return 0.0;
    }
    (1.0 - population_variance(residuals) / ratio_variance).clamp(0.0, 1.0)
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn population_variance(values: &[f64]) -> f64 {
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
