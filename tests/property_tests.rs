//! Property tests for the analytics invariants
//!
//! Every engine function must stay total over arbitrary (valid) histories:
//! no panics, no division artifacts, and bounded outputs.

use chrono::{Days, NaiveDate};
use loadwatch::records::normalize_score;
use loadwatch::zones::LoadZoneClassifier;
use loadwatch::{
    compute_athlete_risk_indicators, training_streaks, week_over_week, Athlete, BestScoreMethod,
    DailyLoadEntry, LoadZone, RiskLevel, ThresholdSettings,
};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 10, 31).unwrap()
}

fn athlete() -> Athlete {
    Athlete {
        id: "a1".to_string(),
        name: "Prop Athlete".to_string(),
    }
}

/// (days back, rpe, minutes) tuples up to ~3 months of history
fn session_strategy() -> impl Strategy<Value = (u64, u8, u32)> {
    (0u64..90, 1u8..=10, 1u32..180)
}

fn to_entries(sessions: &[(u64, u8, u32)]) -> Vec<DailyLoadEntry> {
    sessions
        .iter()
        .enumerate()
        .map(|(i, (days_back, rpe, minutes))| {
            let date = as_of().checked_sub_days(Days::new(*days_back)).unwrap();
            DailyLoadEntry::new(format!("l{}", i), "a1", date, *rpe, *minutes, "Field")
        })
        .collect()
}

proptest! {
    #[test]
    fn test_acwr_zero_safe_and_non_negative(
        sessions in prop::collection::vec(session_strategy(), 0..60)
    ) {
        let entries = to_entries(&sessions);
        let indicators = compute_athlete_risk_indicators(
            &[athlete()],
            &entries,
            &[],
            &ThresholdSettings::default(),
            as_of(),
        );
        let indicator = &indicators[0];

        prop_assert!(indicator.acwr >= Decimal::ZERO);
        prop_assert!(indicator.acute_load >= 0);
        if indicator.chronic_load == 0 {
            prop_assert_eq!(indicator.acwr, Decimal::ZERO);
            prop_assert_eq!(indicator.risk_level, RiskLevel::Low);
        }
        // acute is part of the chronic window and the divisor is fixed at 4
        prop_assert!(indicator.acwr <= dec!(4));
    }

    #[test]
    fn test_risk_indicators_deterministic(
        sessions in prop::collection::vec(session_strategy(), 0..40)
    ) {
        let entries = to_entries(&sessions);
        let settings = ThresholdSettings::default();
        let first = compute_athlete_risk_indicators(&[athlete()], &entries, &[], &settings, as_of());
        let second = compute_athlete_risk_indicators(&[athlete()], &entries, &[], &settings, as_of());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_every_day_gets_one_zone(
        loads in prop::collection::vec(0u32..2000, 1..60),
        window in 1usize..40
    ) {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let series: Vec<_> = loads
            .iter()
            .enumerate()
            .map(|(i, l)| (start.checked_add_days(Days::new(i as u64)).unwrap(), Decimal::from(*l)))
            .collect();

        let result = LoadZoneClassifier::classify_series(&series, window);

        prop_assert_eq!(result.days.len(), series.len());
        let total: usize = LoadZone::ALL.iter().map(|z| result.count(*z)).sum();
        prop_assert_eq!(total, series.len());
        for day in &result.days {
            prop_assert_eq!(day.zone == LoadZone::Rest, day.training_load.is_zero());
        }
        prop_assert!(result.danger_streak as usize <= result.count(LoadZone::Danger));
    }

    #[test]
    fn test_constant_series_is_optimal(load in 1u32..2000, days in 1usize..40) {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let series: Vec<_> = (0..days)
            .map(|i| (start.checked_add_days(Days::new(i as u64)).unwrap(), Decimal::from(load)))
            .collect();

        let result = LoadZoneClassifier::classify_series(&series, 30);

        prop_assert!(result.days.iter().all(|d| d.zone == LoadZone::Optimal));
        prop_assert_eq!(result.danger_streak, 0);
    }

    #[test]
    fn test_longest_streak_bounds_current(
        sessions in prop::collection::vec(session_strategy(), 0..60)
    ) {
        let entries = to_entries(&sessions);
        let streaks = training_streaks(&entries, as_of());

        prop_assert!(streaks.longest_streak >= streaks.current_streak);

        let most_recent = sessions.iter().map(|(d, _, _)| *d).min();
        match most_recent {
            Some(days_back) if days_back > 1 => prop_assert_eq!(streaks.current_streak, 0),
            Some(_) => prop_assert!(streaks.current_streak >= 1),
            None => prop_assert_eq!(streaks.longest_streak, 0),
        }
    }

    #[test]
    fn test_week_over_week_null_without_baseline(
        sessions in prop::collection::vec((0u64..7, 1u8..=10, 1u32..180), 0..20)
    ) {
        // nothing in the previous week
        let entries = to_entries(&sessions);
        let wow = week_over_week(&entries, &[], &ThresholdSettings::default(), as_of());

        prop_assert_eq!(wow.previous_week.total_load, Decimal::ZERO);
        prop_assert_eq!(wow.changes.load_percent, None);
        prop_assert!(!wow.load_spike_alert);
    }

    #[test]
    fn test_normalized_scores_bounded(
        a in 0u32..10_000,
        b in 0u32..10_000,
        c in 0u32..10_000
    ) {
        let mut values = [a, b, c];
        values.sort_unstable();
        let (min, value, max) = (
            Decimal::from(values[0]),
            Decimal::from(values[1]),
            Decimal::from(values[2]),
        );

        for method in [BestScoreMethod::Highest, BestScoreMethod::Lowest] {
            let score = normalize_score(value, min, max, method);
            prop_assert!((0..=100).contains(&score));
        }
        prop_assert_eq!(normalize_score(max, min, max, BestScoreMethod::Highest), if min == max { 50 } else { 100 });
    }
}
