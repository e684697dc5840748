//! Acute:Chronic Workload Ratio (ACWR) risk engine
//!
//! - Acute load: sum of session loads over the last 7 days (`as_of` included)
//! - Chronic load: sum over the last 28 days divided by 4, the average week
//! - ACWR: acute / chronic, rounded to 2 decimal places, 0 without chronic load
//!
//! The chronic divisor is always 4, even for athletes with less than 28 days
//! of history. Partial histories therefore read low on chronic load and high
//! on ACWR; downstream dashboards depend on that behaviour.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::ThresholdSettings;
use crate::models::{Athlete, DailyLoadEntry, InjuryRecord, InjuryStatus, TrendDirection};
use crate::window::{round_dp_half_up, round_half_up, DayWindow};

/// Acute window length in days
pub const ACUTE_DAYS: i64 = 7;

/// Chronic window length in days
pub const CHRONIC_DAYS: i64 = 28;

/// Weeks the chronic total is averaged over
pub const CHRONIC_WEEKS: i64 = 4;

/// Injury risk classification from ACWR
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    /// Classify an ACWR value. Comparisons are strict: a ratio exactly on a
    /// cutoff stays in the lower band.
    pub fn classify(acwr: Decimal, settings: &ThresholdSettings) -> Self {
        if acwr > settings.acwr_high {
            RiskLevel::High
        } else if acwr > settings.acwr_moderate {
            RiskLevel::Moderate
        } else {
            RiskLevel::Low
        }
    }

    /// Recommended action for this level
    pub fn recommendation(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Workload is within a safe range relative to recent training",
            RiskLevel::Moderate => "Workload is rising faster than fitness - monitor closely",
            RiskLevel::High => "Workload spike - reduce load to lower injury risk",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "low"),
            RiskLevel::Moderate => write!(f, "moderate"),
            RiskLevel::High => write!(f, "high"),
        }
    }
}

/// Per-athlete workload risk snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskIndicator {
    pub athlete_id: String,

    pub athlete_name: String,

    /// 7-day load total, rounded to a whole number
    pub acute_load: i64,

    /// Average weekly load over 28 days, rounded to a whole number
    pub chronic_load: i64,

    /// Acute:chronic ratio (2 dp), 0 when there is no chronic load
    pub acwr: Decimal,

    pub risk_level: RiskLevel,

    /// Injuries currently in `active` status
    pub active_injuries: u32,

    /// This week's acute load against the week before
    pub load_trend: TrendDirection,
}

/// ACWR calculation engine
pub struct AcwrCalculator {
    settings: ThresholdSettings,
}

impl AcwrCalculator {
    /// Create calculator with default thresholds
    pub fn new() -> Self {
        AcwrCalculator {
            settings: ThresholdSettings::default(),
        }
    }

    /// Create calculator with explicit thresholds
    pub fn with_settings(settings: ThresholdSettings) -> Self {
        AcwrCalculator { settings }
    }

    /// Sum of training load within a window for one athlete
    fn window_load(
        entries: &[DailyLoadEntry],
        athlete_id: &str,
        window: DayWindow,
        as_of: NaiveDate,
    ) -> Decimal {
        entries
            .iter()
            .filter(|e| e.athlete_id == athlete_id && window.contains(as_of, e.date))
            .map(|e| e.training_load)
            .sum()
    }

    /// Ratio of acute to chronic load, 0 when chronic load is zero
    pub fn ratio(acute: Decimal, chronic: Decimal) -> Decimal {
        if chronic > Decimal::ZERO {
            round_dp_half_up(acute / chronic, 2)
        } else {
            Decimal::ZERO
        }
    }

    /// Compute the risk snapshot for one athlete
    pub fn indicator_for(
        &self,
        athlete: &Athlete,
        entries: &[DailyLoadEntry],
        injuries: &[InjuryRecord],
        as_of: NaiveDate,
    ) -> RiskIndicator {
        let acute = Self::window_load(entries, &athlete.id, DayWindow::trailing(ACUTE_DAYS), as_of);
        let chronic_total =
            Self::window_load(entries, &athlete.id, DayWindow::trailing(CHRONIC_DAYS), as_of);
        let chronic = chronic_total / Decimal::from(CHRONIC_WEEKS);
        let previous_acute = Self::window_load(
            entries,
            &athlete.id,
            DayWindow::preceding(ACUTE_DAYS, ACUTE_DAYS),
            as_of,
        );

        let acwr = Self::ratio(acute, chronic);
        let risk_level = RiskLevel::classify(acwr, &self.settings);

        let active_injuries = injuries
            .iter()
            .filter(|i| i.athlete_id == athlete.id && i.status == InjuryStatus::Active)
            .count() as u32;

        tracing::debug!(
            athlete_id = %athlete.id,
            %acute,
            %chronic,
            %acwr,
            risk = %risk_level,
            "ACWR computed"
        );

        RiskIndicator {
            athlete_id: athlete.id.clone(),
            athlete_name: athlete.name.clone(),
            acute_load: round_half_up(acute),
            chronic_load: round_half_up(chronic),
            acwr,
            risk_level,
            active_injuries,
            load_trend: TrendDirection::between(previous_acute, acute),
        }
    }

    /// Compute risk snapshots for every athlete, in the order supplied
    pub fn compute_athlete_risk_indicators(
        &self,
        athletes: &[Athlete],
        entries: &[DailyLoadEntry],
        injuries: &[InjuryRecord],
        as_of: NaiveDate,
    ) -> Vec<RiskIndicator> {
        athletes
            .iter()
            .map(|athlete| self.indicator_for(athlete, entries, injuries, as_of))
            .collect()
    }
}

impl Default for AcwrCalculator {
    fn default() -> Self {
        Self::new()
    }
}

/// Compute risk snapshots for every athlete with explicit thresholds
pub fn compute_athlete_risk_indicators(
    athletes: &[Athlete],
    entries: &[DailyLoadEntry],
    injuries: &[InjuryRecord],
    settings: &ThresholdSettings,
    as_of: NaiveDate,
) -> Vec<RiskIndicator> {
    AcwrCalculator::with_settings(settings.clone())
        .compute_athlete_risk_indicators(athletes, entries, injuries, as_of)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;
    use rust_decimal_macros::dec;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 10, 31).unwrap()
    }

    fn athlete(id: &str) -> Athlete {
        Athlete {
            id: id.to_string(),
            name: format!("Athlete {}", id),
        }
    }

    fn entry(athlete_id: &str, days_back: u64, rpe: u8, minutes: u32) -> DailyLoadEntry {
        let date = as_of().checked_sub_days(Days::new(days_back)).unwrap();
        DailyLoadEntry::new(
            format!("{}-{}", athlete_id, days_back),
            athlete_id,
            date,
            rpe,
            minutes,
            "Field",
        )
    }

    #[test]
    fn test_steady_load_is_low_risk() {
        // 300 per day for 28 days
        let entries: Vec<_> = (0..28).map(|d| entry("a1", d, 5, 60)).collect();
        let calculator = AcwrCalculator::new();

        let indicator = calculator.indicator_for(&athlete("a1"), &entries, &[], as_of());

        assert_eq!(indicator.acute_load, 2100);
        assert_eq!(indicator.chronic_load, 2100);
        assert_eq!(indicator.acwr, dec!(1.00));
        assert_eq!(indicator.risk_level, RiskLevel::Low);
        assert_eq!(indicator.load_trend, TrendDirection::Stable);
    }

    #[test]
    fn test_acute_spike_is_high_risk() {
        // acute 900 (days 0..=6), chronic 1600 / 4 = 400
        let mut entries = vec![entry("a1", 0, 9, 100)];
        entries.push(entry("a1", 20, 7, 100));

        let indicator = AcwrCalculator::new().indicator_for(&athlete("a1"), &entries, &[], as_of());

        assert_eq!(indicator.acute_load, 900);
        assert_eq!(indicator.chronic_load, 400);
        assert_eq!(indicator.acwr, dec!(2.25));
        assert_eq!(indicator.risk_level, RiskLevel::High);
        assert_eq!(indicator.load_trend, TrendDirection::Increasing);
    }

    #[test]
    fn test_no_history_is_zero() {
        let indicator = AcwrCalculator::new().indicator_for(&athlete("a1"), &[], &[], as_of());

        assert_eq!(indicator.acwr, Decimal::ZERO);
        assert_eq!(indicator.acute_load, 0);
        assert_eq!(indicator.chronic_load, 0);
        assert_eq!(indicator.risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_window_edges() {
        // day 7 is outside the acute window, day 28 outside the chronic window
        let entries = vec![entry("a1", 7, 5, 60), entry("a1", 28, 5, 60)];
        let indicator = AcwrCalculator::new().indicator_for(&athlete("a1"), &entries, &[], as_of());

        assert_eq!(indicator.acute_load, 0);
        assert_eq!(indicator.chronic_load, 75);
        assert_eq!(indicator.acwr, Decimal::ZERO);
    }

    #[test]
    fn test_future_entries_ignored() {
        let future = DailyLoadEntry::new(
            "f1",
            "a1",
            as_of().checked_add_days(Days::new(1)).unwrap(),
            9,
            120,
            "Field",
        );
        let indicator = AcwrCalculator::new().indicator_for(&athlete("a1"), &[future], &[], as_of());
        assert_eq!(indicator.acute_load, 0);
    }

    #[test]
    fn test_threshold_boundaries() {
        let settings = ThresholdSettings::default();
        assert_eq!(RiskLevel::classify(dec!(1.3), &settings), RiskLevel::Low);
        assert_eq!(RiskLevel::classify(dec!(1.3001), &settings), RiskLevel::Moderate);
        assert_eq!(RiskLevel::classify(dec!(1.5), &settings), RiskLevel::Moderate);
        assert_eq!(RiskLevel::classify(dec!(1.51), &settings), RiskLevel::High);
    }

    #[test]
    fn test_custom_thresholds() {
        let settings = ThresholdSettings {
            acwr_moderate: dec!(0.8),
            acwr_high: dec!(0.95),
            ..ThresholdSettings::default()
        };
        let entries: Vec<_> = (0..28).map(|d| entry("a1", d, 5, 60)).collect();

        let indicators =
            compute_athlete_risk_indicators(&[athlete("a1")], &entries, &[], &settings, as_of());

        assert_eq!(indicators[0].risk_level, RiskLevel::High);
    }

    #[test]
    fn test_active_injuries_counted() {
        let injury = |id: &str, status| InjuryRecord {
            id: id.to_string(),
            athlete_id: "a1".to_string(),
            status,
            date_occurred: as_of(),
            date_resolved: None,
            days_lost: None,
        };
        let injuries = vec![
            injury("i1", InjuryStatus::Active),
            injury("i2", InjuryStatus::Active),
            injury("i3", InjuryStatus::Rehab),
            injury("i4", InjuryStatus::Resolved),
        ];

        let indicator =
            AcwrCalculator::new().indicator_for(&athlete("a1"), &[], &injuries, as_of());
        assert_eq!(indicator.active_injuries, 2);
    }

    #[test]
    fn test_indicators_follow_athlete_order() {
        let athletes = vec![athlete("b"), athlete("a")];
        let entries = vec![entry("a", 0, 5, 60), entry("b", 1, 5, 60)];

        let indicators = AcwrCalculator::new().compute_athlete_risk_indicators(
            &athletes,
            &entries,
            &[],
            as_of(),
        );

        assert_eq!(indicators.len(), 2);
        assert_eq!(indicators[0].athlete_id, "b");
        assert_eq!(indicators[1].athlete_name, "Athlete a");
    }
}
