//! Personal records and radar comparison from testing results.
//!
//! "Best" is always direction-aware: the maximum for metrics scored
//! `highest`, the minimum for metrics scored `lowest`. Results without a best
//! score were not attempted and are skipped everywhere.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::models::{BestScoreMethod, Metric, TestingTrialResult};
use crate::window::{round_half_up, DayWindow};

/// Records set within this many days are flagged as recent
pub const RECENT_RECORD_DAYS: i64 = 7;

/// Length of each radar comparison period
pub const RADAR_PERIOD_DAYS: i64 = 30;

/// Score given to both periods when a metric has no spread
const FLAT_RANGE_SCORE: i64 = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalRecord {
    pub metric_id: String,

    /// None when the metric is missing from the lookup
    pub metric_name: Option<String>,
    pub unit: Option<String>,

    pub value: Decimal,

    /// First day the value was achieved
    pub date: NaiveDate,

    pub is_recent: bool,
}

/// Normalized scores (0-100, higher is better) for the last 30 days and the 30 before
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarPoint {
    pub metric_id: String,
    pub metric_name: Option<String>,
    pub current: i64,
    pub previous: i64,
}

fn metric_lookup(metrics: &[Metric]) -> HashMap<&str, &Metric> {
    metrics.iter().map(|m| (m.id.as_str(), m)).collect()
}

fn method_for(lookup: &HashMap<&str, &Metric>, metric_id: &str) -> BestScoreMethod {
    lookup
        .get(metric_id)
        .map(|m| m.best_score_method)
        .unwrap_or_default()
}

/// Best (value, date) per metric among the given results; ties keep the earliest date
fn best_by_metric<'a>(
    trials: impl Iterator<Item = &'a TestingTrialResult>,
    lookup: &HashMap<&str, &Metric>,
) -> BTreeMap<String, (Decimal, NaiveDate)> {
    let mut best: BTreeMap<String, (Decimal, NaiveDate)> = BTreeMap::new();

    for trial in trials {
        let Some(score) = trial.best_score else {
            continue;
        };
        let method = method_for(lookup, &trial.metric_id);

        best.entry(trial.metric_id.clone())
            .and_modify(|(value, date)| {
                let tie_earlier = score == *value && trial.date < *date;
                if method.is_better(score, *value) || tie_earlier {
                    *value = score;
                    *date = trial.date;
                }
            })
            .or_insert((score, trial.date));
    }

    best
}

/// Best-ever result per metric for one athlete, ordered by metric id
pub fn personal_records(
    trials: &[TestingTrialResult],
    metrics: &[Metric],
    athlete_id: &str,
    as_of: NaiveDate,
) -> Vec<PersonalRecord> {
    let lookup = metric_lookup(metrics);
    let recent = DayWindow::trailing(RECENT_RECORD_DAYS);

    best_by_metric(
        trials
            .iter()
            .filter(|t| t.athlete_id == athlete_id && t.date <= as_of),
        &lookup,
    )
    .into_iter()
    .map(|(metric_id, (value, date))| {
        let metric = lookup.get(metric_id.as_str());
        PersonalRecord {
            metric_name: metric.map(|m| m.name.clone()),
            unit: metric.map(|m| m.unit.clone()),
            metric_id,
            value,
            date,
            is_recent: recent.contains(as_of, date),
        }
    })
    .collect()
}

/// Scale `value` into 0-100 over `[min, max]`, where 100 is the best end
pub fn normalize_score(value: Decimal, min: Decimal, max: Decimal, method: BestScoreMethod) -> i64 {
    let range = max - min;
    if range <= Decimal::ZERO {
        return FLAT_RANGE_SCORE;
    }
    let position = match method {
        BestScoreMethod::Highest => (value - min) / range,
        BestScoreMethod::Lowest => (max - value) / range,
    };
    round_half_up(position * Decimal::ONE_HUNDRED).clamp(0, 100)
}

/// Radar comparison for one athlete.
///
/// Only metrics with a result in both periods are included. Scores are scaled
/// over the metric's full history across every athlete.
pub fn radar_data(
    trials: &[TestingTrialResult],
    metrics: &[Metric],
    athlete_id: &str,
    as_of: NaiveDate,
) -> Vec<RadarPoint> {
    let lookup = metric_lookup(metrics);

    let mut ranges: HashMap<&str, (Decimal, Decimal)> = HashMap::new();
    for trial in trials.iter().filter(|t| t.date <= as_of) {
        if let Some(score) = trial.best_score {
            ranges
                .entry(trial.metric_id.as_str())
                .and_modify(|(min, max)| {
                    *min = (*min).min(score);
                    *max = (*max).max(score);
                })
                .or_insert((score, score));
        }
    }

    let athlete_trials = || trials.iter().filter(|t| t.athlete_id == athlete_id);
    let current_window = DayWindow::trailing(RADAR_PERIOD_DAYS);
    let previous_window = DayWindow::preceding(RADAR_PERIOD_DAYS, RADAR_PERIOD_DAYS);

    let current = best_by_metric(
        athlete_trials().filter(|t| current_window.contains(as_of, t.date)),
        &lookup,
    );
    let previous = best_by_metric(
        athlete_trials().filter(|t| previous_window.contains(as_of, t.date)),
        &lookup,
    );

    current
        .into_iter()
        .filter_map(|(metric_id, (current_value, _))| {
            let (previous_value, _) = *previous.get(&metric_id)?;
            let (min, max) = *ranges.get(metric_id.as_str())?;
            let method = method_for(&lookup, &metric_id);

            Some(RadarPoint {
                metric_name: lookup.get(metric_id.as_str()).map(|m| m.name.clone()),
                current: normalize_score(current_value, min, max, method),
                previous: normalize_score(previous_value, min, max, method),
                metric_id,
            })
        })
        .collect()
}
