use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::ThresholdSettings;
use crate::models::{DailyLoadEntry, WellnessCheckin};
use crate::window::{mean, percent_change, round_dp_half_up, round_half_up, DayWindow};

/// Aggregates for one 7-day window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekSummary {
    pub sessions: u32,

    pub total_load: Decimal,

    /// Mean session RPE (1 dp), 0 without sessions
    pub avg_rpe: Decimal,

    /// Mean readiness, None without check-ins
    pub avg_readiness: Option<i64>,
}

/// Percent change per metric, None without a previous-week baseline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekChanges {
    pub sessions_percent: Option<i64>,
    pub load_percent: Option<i64>,
    pub rpe_percent: Option<i64>,
    pub readiness_percent: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekOverWeek {
    pub current_week: WeekSummary,
    pub previous_week: WeekSummary,
    pub changes: WeekChanges,

    /// Load rose by more than the configured spike percent
    pub load_spike_alert: bool,
}

/// Summarize sessions and check-ins inside a window
pub fn summarize_week(
    entries: &[DailyLoadEntry],
    checkins: &[WellnessCheckin],
    window: DayWindow,
    as_of: NaiveDate,
) -> WeekSummary {
    let sessions: Vec<&DailyLoadEntry> = entries
        .iter()
        .filter(|e| window.contains(as_of, e.date))
        .collect();

    let readiness: Vec<Decimal> = checkins
        .iter()
        .filter(|c| window.contains(as_of, c.date))
        .map(|c| Decimal::from(c.readiness_score))
        .collect();

    WeekSummary {
        sessions: sessions.len() as u32,
        total_load: sessions.iter().map(|e| e.training_load).sum(),
        avg_rpe: mean_rpe(entries, window, as_of)
            .map(|m| round_dp_half_up(m, 1))
            .unwrap_or(Decimal::ZERO),
        avg_readiness: mean(&readiness).map(round_half_up),
    }
}

/// Unrounded mean RPE of the sessions inside a window
fn mean_rpe(entries: &[DailyLoadEntry], window: DayWindow, as_of: NaiveDate) -> Option<Decimal> {
    let rpes: Vec<Decimal> = entries
        .iter()
        .filter(|e| window.contains(as_of, e.date))
        .map(|e| Decimal::from(e.rpe))
        .collect();
    mean(&rpes)
}

/// Compare the last 7 days (`as_of` included) with the 7 days before.
///
/// Callers pass whichever scope they want compared: one athlete's records or
/// the whole team's.
pub fn week_over_week(
    entries: &[DailyLoadEntry],
    checkins: &[WellnessCheckin],
    settings: &ThresholdSettings,
    as_of: NaiveDate,
) -> WeekOverWeek {
    let current_week = summarize_week(entries, checkins, DayWindow::trailing(7), as_of);
    let previous_week = summarize_week(entries, checkins, DayWindow::preceding(7, 7), as_of);

    let readiness_percent = match (current_week.avg_readiness, previous_week.avg_readiness) {
        (Some(current), Some(previous)) => {
            percent_change(Decimal::from(current), Decimal::from(previous))
        }
        _ => None,
    };

    let changes = WeekChanges {
        sessions_percent: percent_change(
            Decimal::from(current_week.sessions),
            Decimal::from(previous_week.sessions),
        ),
        load_percent: percent_change(current_week.total_load, previous_week.total_load),
        rpe_percent: percent_change(
            mean_rpe(entries, DayWindow::trailing(7), as_of).unwrap_or(Decimal::ZERO),
            mean_rpe(entries, DayWindow::preceding(7, 7), as_of).unwrap_or(Decimal::ZERO),
        ),
        readiness_percent,
    };

    let load_spike_alert = changes
        .load_percent
        .map_or(false, |pct| Decimal::from(pct) > settings.load_spike_percent);

    if load_spike_alert {
        tracing::debug!(
            load_percent = ?changes.load_percent,
            threshold = %settings.load_spike_percent,
            "Week-over-week load spike"
        );
    }

    WeekOverWeek {
        current_week,
        previous_week,
        changes,
        load_spike_alert,
    }
}
