use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{InjuryRecord, InjuryStatus};
use crate::window::days_ago;

/// Injury counts and time lost for a squad or one athlete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InjurySummary {
    pub active: u32,
    pub rehab: u32,
    pub monitoring: u32,
    pub resolved: u32,

    /// Days lost across every injury in scope
    pub total_days_lost: u32,

    /// Athlete(s) with at least one active injury
    pub currently_unavailable: u32,
}

/// Training days lost to one injury as of a given day.
///
/// Resolved injuries use the recorded figure, falling back to the length of
/// the injury. Ongoing injuries keep accruing until `as_of`.
pub fn days_lost(injury: &InjuryRecord, as_of: NaiveDate) -> u32 {
    let span = |end: NaiveDate| days_ago(end, injury.date_occurred).max(0) as u32;

    if injury.status.is_ongoing() {
        let elapsed = span(as_of);
        return injury.days_lost.map_or(elapsed, |recorded| recorded.max(elapsed));
    }

    injury
        .days_lost
        .or_else(|| injury.date_resolved.map(span))
        .unwrap_or(0)
}

/// Count injuries by status, optionally restricted to one athlete
pub fn summarize_injuries(
    injuries: &[InjuryRecord],
    athlete_id: Option<&str>,
    as_of: NaiveDate,
) -> InjurySummary {
    let in_scope = injuries
        .iter()
        .filter(|i| athlete_id.map_or(true, |id| i.athlete_id == id))
        .filter(|i| i.date_occurred <= as_of);

    let mut summary = InjurySummary::default();
    let mut unavailable: Vec<&str> = Vec::new();

    for injury in in_scope {
        match injury.status {
            InjuryStatus::Active => {
                summary.active += 1;
                if !unavailable.contains(&injury.athlete_id.as_str()) {
                    unavailable.push(&injury.athlete_id);
                }
            }
            InjuryStatus::Rehab => summary.rehab += 1,
            InjuryStatus::Monitoring => summary.monitoring += 1,
            InjuryStatus::Resolved => summary.resolved += 1,
        }
        summary.total_days_lost += days_lost(injury, as_of);
    }

    summary.currently_unavailable = unavailable.len() as u32;
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 10, d).unwrap()
    }

    fn injury(
        id: &str,
        athlete_id: &str,
        status: InjuryStatus,
        occurred: u32,
        resolved: Option<u32>,
        days_lost: Option<u32>,
    ) -> InjuryRecord {
        InjuryRecord {
            id: id.to_string(),
            athlete_id: athlete_id.to_string(),
            status,
            date_occurred: day(occurred),
            date_resolved: resolved.map(day),
            days_lost,
        }
    }

    #[test]
    fn test_resolved_days_lost() {
        let recorded = injury("i1", "a1", InjuryStatus::Resolved, 1, Some(15), Some(12));
        assert_eq!(days_lost(&recorded, day(30)), 12);

        let derived = injury("i2", "a1", InjuryStatus::Resolved, 1, Some(15), None);
        assert_eq!(days_lost(&derived, day(30)), 14);

        let undated = injury("i3", "a1", InjuryStatus::Resolved, 1, None, None);
        assert_eq!(days_lost(&undated, day(30)), 0);
    }

    #[test]
    fn test_ongoing_injury_accrues() {
        let active = injury("i1", "a1", InjuryStatus::Active, 10, None, None);
        assert_eq!(days_lost(&active, day(20)), 10);

        // a larger recorded figure wins
        let rehab = injury("i2", "a1", InjuryStatus::Rehab, 10, None, Some(25));
        assert_eq!(days_lost(&rehab, day(20)), 25);
    }

    #[test]
    fn test_future_injury_never_negative() {
        let active = injury("i1", "a1", InjuryStatus::Active, 25, None, None);
        assert_eq!(days_lost(&active, day(20)), 0);
    }

    #[test]
    fn test_summary_counts() {
        let injuries = vec![
            injury("i1", "a1", InjuryStatus::Active, 10, None, None),
            injury("i2", "a1", InjuryStatus::Active, 12, None, None),
            injury("i3", "a2", InjuryStatus::Rehab, 5, None, None),
            injury("i4", "a2", InjuryStatus::Resolved, 1, Some(4), None),
            injury("i5", "a3", InjuryStatus::Monitoring, 18, None, None),
        ];

        let squad = summarize_injuries(&injuries, None, day(20));
        assert_eq!(squad.active, 2);
        assert_eq!(squad.rehab, 1);
        assert_eq!(squad.monitoring, 1);
        assert_eq!(squad.resolved, 1);
        assert_eq!(squad.currently_unavailable, 1);
        assert_eq!(squad.total_days_lost, 10 + 8 + 15 + 3 + 2);

        let a2 = summarize_injuries(&injuries, Some("a2"), day(20));
        assert_eq!(a2.active, 0);
        assert_eq!(a2.currently_unavailable, 0);
        assert_eq!(a2.total_days_lost, 18);
    }

    #[test]
    fn test_summary_empty() {
        assert_eq!(summarize_injuries(&[], None, day(20)), InjurySummary::default());
    }
}
