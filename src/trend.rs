use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::DailyLoadEntry;
use crate::window::{days_ago, round_dp_half_up, round_half_up};

/// Total load for one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyLoad {
    /// Date of the training day
    pub date: NaiveDate,

    /// Sum of session loads for the day
    pub total_load: Decimal,

    /// Number of sessions logged on this day
    pub session_count: u32,

    /// Individual session loads
    pub session_loads: Vec<Decimal>,
}

/// One point on a load trend chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadTrendPoint {
    pub date: NaiveDate,

    /// Session load, or the mean across sessions for team points
    pub training_load: Decimal,

    /// Session RPE, or the mean across sessions for team points
    pub rpe: Decimal,

    /// Sessions represented by this point
    pub session_count: u32,

    /// Owning athlete for athlete-scoped points
    pub athlete_id: Option<String>,
}

/// Which entries a trend covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendScope<'a> {
    /// Every athlete, one averaged point per calendar day
    Team,
    /// One athlete, one point per logged session
    Athlete(&'a str),
}

/// Sum session loads into per-day totals, optionally for a single athlete
pub fn aggregate_daily_load(
    entries: &[DailyLoadEntry],
    athlete_id: Option<&str>,
) -> BTreeMap<NaiveDate, DailyLoad> {
    let mut daily: BTreeMap<NaiveDate, DailyLoad> = BTreeMap::new();

    for entry in entries
        .iter()
        .filter(|e| athlete_id.map_or(true, |id| e.athlete_id == id))
    {
        daily
            .entry(entry.date)
            .and_modify(|day| {
                day.total_load += entry.training_load;
                day.session_count += 1;
                day.session_loads.push(entry.training_load);
            })
            .or_insert(DailyLoad {
                date: entry.date,
                total_load: entry.training_load,
                session_count: 1,
                session_loads: vec![entry.training_load],
            });
    }

    daily
}

/// Build a load trend over `[as_of - days, as_of]`, ascending by date.
///
/// Team points average load (rounded to a whole number) and RPE (one decimal)
/// across the sessions logged that day. An empty window yields an empty trend.
pub fn load_trend(
    entries: &[DailyLoadEntry],
    scope: TrendScope<'_>,
    as_of: NaiveDate,
    days: u32,
) -> Vec<LoadTrendPoint> {
    let in_window = |entry: &&DailyLoadEntry| {
        let age = days_ago(as_of, entry.date);
        age >= 0 && age <= i64::from(days)
    };

    let points = match scope {
        TrendScope::Athlete(athlete_id) => {
            let mut selected: Vec<&DailyLoadEntry> = entries
                .iter()
                .filter(|e| e.athlete_id == athlete_id)
                .filter(in_window)
                .collect();
            selected.sort_by_key(|e| e.date);

            selected
                .into_iter()
                .map(|e| LoadTrendPoint {
                    date: e.date,
                    training_load: e.training_load,
                    rpe: Decimal::from(e.rpe),
                    session_count: 1,
                    athlete_id: Some(e.athlete_id.clone()),
                })
                .collect()
        }
        TrendScope::Team => {
            let mut by_day: BTreeMap<NaiveDate, (Decimal, Decimal, u32)> = BTreeMap::new();
            for entry in entries.iter().filter(in_window) {
                let slot = by_day
                    .entry(entry.date)
                    .or_insert((Decimal::ZERO, Decimal::ZERO, 0));
                slot.0 += entry.training_load;
                slot.1 += Decimal::from(entry.rpe);
                slot.2 += 1;
            }

            by_day
                .into_iter()
                .map(|(date, (load, rpe, count))| {
                    let n = Decimal::from(count);
                    LoadTrendPoint {
                        date,
                        training_load: Decimal::from(round_half_up(load / n)),
                        rpe: round_dp_half_up(rpe / n, 1),
                        session_count: count,
                        athlete_id: None,
                    }
                })
                .collect::<Vec<_>>()
        }
    };

    tracing::debug!(
        scope = ?scope,
        days,
        points = points.len(),
        "Load trend built"
    );

    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 10, d).unwrap()
    }

    #[test]
    fn test_daily_load_aggregation() {
        let entries = vec![
            DailyLoadEntry::new("l1", "a1", day(3), 5, 60, "Field"),
            DailyLoadEntry::new("l2", "a1", day(3), 4, 30, "Gym"),
            DailyLoadEntry::new("l3", "a2", day(3), 8, 60, "Field"),
        ];

        let daily = aggregate_daily_load(&entries, Some("a1"));

        assert_eq!(daily.len(), 1);
        let d = daily.get(&day(3)).unwrap();
        assert_eq!(d.total_load, dec!(420));
        assert_eq!(d.session_count, 2);
        assert_eq!(d.session_loads, vec![dec!(300), dec!(120)]);

        let team = aggregate_daily_load(&entries, None);
        assert_eq!(team.get(&day(3)).unwrap().total_load, dec!(900));
    }

    #[test]
    fn test_team_trend_averages_same_day() {
        let entries = vec![
            DailyLoadEntry::new("l1", "a1", day(10), 5, 60, "Field"),
            DailyLoadEntry::new("l2", "a2", day(10), 6, 50, "Field"),
            DailyLoadEntry::new("l3", "a3", day(10), 7, 45, "Field"),
            DailyLoadEntry::new("l4", "a1", day(8), 4, 30, "Gym"),
        ];

        let trend = load_trend(&entries, TrendScope::Team, day(10), 30);

        assert_eq!(trend.len(), 2);
        assert_eq!(trend[0].date, day(8));
        assert_eq!(trend[1].date, day(10));
        // (300 + 300 + 315) / 3 = 305
        assert_eq!(trend[1].training_load, dec!(305));
        assert_eq!(trend[1].rpe, dec!(6.0));
        assert_eq!(trend[1].session_count, 3);
        assert!(trend[1].athlete_id.is_none());
    }

    #[test]
    fn test_athlete_trend_keeps_each_session() {
        let entries = vec![
            DailyLoadEntry::new("l2", "a1", day(9), 6, 50, "Field"),
            DailyLoadEntry::new("l1", "a1", day(5), 5, 60, "Field"),
            DailyLoadEntry::new("l3", "a1", day(9), 3, 20, "Recovery"),
            DailyLoadEntry::new("l4", "a2", day(9), 9, 90, "Field"),
        ];

        let trend = load_trend(&entries, TrendScope::Athlete("a1"), day(10), 30);

        assert_eq!(trend.len(), 3);
        assert_eq!(trend[0].date, day(5));
        assert!(trend.iter().all(|p| p.athlete_id.as_deref() == Some("a1")));
    }

    #[test]
    fn test_trend_window_bounds() {
        let entries = vec![
            DailyLoadEntry::new("l1", "a1", day(1), 5, 60, "Field"),
            DailyLoadEntry::new("l2", "a1", day(3), 5, 60, "Field"),
            DailyLoadEntry::new("l3", "a1", day(12), 5, 60, "Field"),
        ];

        // as_of day 10, 7 days back covers days 3..=10
        let trend = load_trend(&entries, TrendScope::Team, day(10), 7);
        assert_eq!(trend.len(), 1);
        assert_eq!(trend[0].date, day(3));
    }

    #[test]
    fn test_empty_window_is_empty_trend() {
        let trend = load_trend(&[], TrendScope::Team, day(10), 30);
        assert!(trend.is_empty());
    }
}
