//! Rule-based achievement badges.
//!
//! Every rule is a standalone function over already-computed stats so that it
//! can be evaluated and tested on its own. `progress` is clamped to `target`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::compliance::{compliance_rate, ComplianceRate};
use crate::models::{DailyLoadEntry, WellnessCheckin};
use crate::records::PersonalRecord;
use crate::streaks::{training_streaks, TrainingStreaks};
use crate::window::DayWindow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementBadge {
    pub id: String,
    pub title: String,
    pub description: String,
    pub earned: bool,
    pub progress: u32,
    pub target: u32,
}

impl AchievementBadge {
    fn new(id: &str, title: &str, description: &str, progress: u32, target: u32) -> Self {
        AchievementBadge {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            earned: progress >= target,
            progress: progress.min(target),
            target,
        }
    }
}

/// Logged a first session
pub fn first_session_badge(total_sessions: usize) -> AchievementBadge {
    AchievementBadge::new(
        "first-session",
        "First Session",
        "Log your first training session",
        total_sessions as u32,
        1,
    )
}

/// Trained seven days in a row at some point
pub fn seven_day_streak_badge(streaks: &TrainingStreaks) -> AchievementBadge {
    AchievementBadge::new(
        "seven-day-streak",
        "7-Day Streak",
        "Train on seven consecutive days",
        streaks.longest_streak,
        7,
    )
}

/// Holds personal records in at least three metrics
pub fn personal_bests_badge(records: &[PersonalRecord]) -> AchievementBadge {
    AchievementBadge::new(
        "three-personal-bests",
        "Record Breaker",
        "Set personal bests in three different tests",
        records.len() as u32,
        3,
    )
}

/// Hit 90% of the monthly session target
pub fn monthly_compliance_badge(compliance: &ComplianceRate) -> AchievementBadge {
    AchievementBadge::new(
        "monthly-compliance",
        "Consistent Month",
        "Reach 90% session compliance over 30 days",
        compliance.monthly_percent.max(0) as u32,
        90,
    )
}

/// Checked in on seven distinct days this week
pub fn wellness_week_badge(checkins: &[WellnessCheckin], as_of: NaiveDate) -> AchievementBadge {
    let window = DayWindow::trailing(7);
    let days: BTreeSet<NaiveDate> = checkins
        .iter()
        .map(|c| c.date)
        .filter(|d| window.contains(as_of, *d))
        .collect();

    AchievementBadge::new(
        "wellness-week",
        "Self-Aware",
        "Complete a wellness check-in every day for a week",
        days.len() as u32,
        7,
    )
}

/// Logged one hundred sessions
pub fn century_club_badge(total_sessions: usize) -> AchievementBadge {
    AchievementBadge::new(
        "century-club",
        "Century Club",
        "Log 100 training sessions",
        total_sessions as u32,
        100,
    )
}

/// Evaluate every badge rule for one athlete's records
pub fn achievement_badges(
    entries: &[DailyLoadEntry],
    checkins: &[WellnessCheckin],
    records: &[PersonalRecord],
    as_of: NaiveDate,
) -> Vec<AchievementBadge> {
    let logged = entries.iter().filter(|e| e.date <= as_of).count();
    let streaks = training_streaks(entries, as_of);
    let compliance = compliance_rate(entries, as_of);

    vec![
        first_session_badge(logged),
        seven_day_streak_badge(&streaks),
        personal_bests_badge(records),
        monthly_compliance_badge(&compliance),
        wellness_week_badge(checkins, as_of),
        century_club_badge(logged),
    ]
}
