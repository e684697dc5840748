use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::models::DailyLoadEntry;
use crate::window::days_ago;

/// Consecutive-day training streaks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingStreaks {
    /// Run of consecutive training days ending today or yesterday
    pub current_streak: u32,

    /// Longest run of consecutive training days anywhere in history
    pub longest_streak: u32,
}

/// Compute streaks from the entries supplied (usually one athlete's).
///
/// Several sessions on one day count once; sessions dated after `as_of` are ignored.
pub fn training_streaks(entries: &[DailyLoadEntry], as_of: NaiveDate) -> TrainingStreaks {
    let dates: BTreeSet<NaiveDate> = entries
        .iter()
        .map(|e| e.date)
        .filter(|d| *d <= as_of)
        .collect();

    let Some(&most_recent) = dates.iter().next_back() else {
        return TrainingStreaks::default();
    };

    let mut longest = 0u32;
    let mut run = 0u32;
    let mut previous: Option<NaiveDate> = None;
    let mut trailing_run = 0u32;
    let mut in_trailing_run = true;

    for &date in dates.iter().rev() {
        run = match previous {
            Some(p) if (p - date).num_days() == 1 => run + 1,
            Some(_) => {
                in_trailing_run = false;
                1
            }
            None => 1,
        };
        if in_trailing_run {
            trailing_run = run;
        }
        longest = longest.max(run);
        previous = Some(date);
    }

    let current_streak = if days_ago(as_of, most_recent) <= 1 {
        trailing_run
    } else {
        0
    };

    tracing::debug!(current_streak, longest_streak = longest, "Training streaks computed");

    TrainingStreaks {
        current_streak,
        longest_streak: longest,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 10, 31).unwrap()
    }

    fn sessions(days_back: &[u64]) -> Vec<DailyLoadEntry> {
        days_back
            .iter()
            .map(|d| {
                let date = as_of().checked_sub_days(Days::new(*d)).unwrap();
                DailyLoadEntry::new(format!("l{}", d), "a1", date, 5, 60, "Field")
            })
            .collect()
    }

    #[test]
    fn test_current_streak_ending_today() {
        let streaks = training_streaks(&sessions(&[0, 1, 2, 5, 6, 7, 8, 9]), as_of());
        assert_eq!(streaks.current_streak, 3);
        assert_eq!(streaks.longest_streak, 5);
    }

    #[test]
    fn test_current_streak_ending_yesterday() {
        let streaks = training_streaks(&sessions(&[1, 2, 3, 4]), as_of());
        assert_eq!(streaks.current_streak, 4);
        assert_eq!(streaks.longest_streak, 4);
    }

    #[test]
    fn test_stale_streak_is_zero() {
        let streaks = training_streaks(&sessions(&[2, 3, 4]), as_of());
        assert_eq!(streaks.current_streak, 0);
        assert_eq!(streaks.longest_streak, 3);
    }

    #[test]
    fn test_duplicate_days_count_once() {
        let streaks = training_streaks(&sessions(&[0, 0, 1, 1]), as_of());
        assert_eq!(streaks.current_streak, 2);
        assert_eq!(streaks.longest_streak, 2);
    }

    #[test]
    fn test_future_sessions_ignored() {
        let mut entries = sessions(&[0]);
        entries.push(DailyLoadEntry::new(
            "future",
            "a1",
            as_of().checked_add_days(Days::new(1)).unwrap(),
            5,
            60,
            "Field",
        ));
        let streaks = training_streaks(&entries, as_of());
        assert_eq!(streaks.current_streak, 1);
    }

    #[test]
    fn test_no_sessions() {
        assert_eq!(training_streaks(&[], as_of()), TrainingStreaks::default());
    }
}
