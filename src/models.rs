use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Athlete lookup record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Athlete {
    /// Unique athlete identifier
    pub id: String,

    /// Display name
    pub name: String,
}

/// Direction in which a testing metric improves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BestScoreMethod {
    /// Larger scores are better (jump height, load lifted)
    #[default]
    Highest,
    /// Smaller scores are better (sprint times)
    Lowest,
}

impl BestScoreMethod {
    /// True when `candidate` beats `current` in this direction
    pub fn is_better(&self, candidate: Decimal, current: Decimal) -> bool {
        match self {
            BestScoreMethod::Highest => candidate > current,
            BestScoreMethod::Lowest => candidate < current,
        }
    }
}

/// Testing metric definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metric {
    /// Unique metric identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Unit label (cm, s, kg)
    pub unit: String,

    /// Comparison direction for "best" judgments
    #[serde(default)]
    pub best_score_method: BestScoreMethod,
}

/// One logged training session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyLoadEntry {
    /// Record identifier
    pub id: String,

    /// Athlete who performed the session
    pub athlete_id: String,

    /// Calendar day of the session
    pub date: NaiveDate,

    /// Rate of perceived exertion (1-10)
    pub rpe: u8,

    /// Session duration in minutes
    pub duration_minutes: u32,

    /// Session load, rpe x duration, precomputed by the caller
    pub training_load: Decimal,

    /// Free-text session category
    #[serde(default)]
    pub session_type: String,
}

impl DailyLoadEntry {
    /// Build an entry with training load precomputed from rpe and duration
    pub fn new(
        id: impl Into<String>,
        athlete_id: impl Into<String>,
        date: NaiveDate,
        rpe: u8,
        duration_minutes: u32,
        session_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            athlete_id: athlete_id.into(),
            date,
            rpe,
            duration_minutes,
            training_load: Decimal::from(rpe) * Decimal::from(duration_minutes),
            session_type: session_type.into(),
        }
    }
}

/// Injury lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InjuryStatus {
    Active,
    Rehab,
    Monitoring,
    Resolved,
}

impl InjuryStatus {
    /// Injury is still accruing lost days
    pub fn is_ongoing(&self) -> bool {
        !matches!(self, InjuryStatus::Resolved)
    }
}

/// Injury record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InjuryRecord {
    /// Record identifier
    pub id: String,

    /// Injured athlete
    pub athlete_id: String,

    /// Current status
    pub status: InjuryStatus,

    /// Day the injury occurred
    pub date_occurred: NaiveDate,

    /// Day the injury was resolved, if it has been
    #[serde(default)]
    pub date_resolved: Option<NaiveDate>,

    /// Training days lost, usually only populated once resolved
    #[serde(default)]
    pub days_lost: Option<u32>,
}

/// Daily wellness questionnaire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WellnessCheckin {
    /// Record identifier
    pub id: String,

    /// Reporting athlete
    pub athlete_id: String,

    /// Day of the check-in
    pub date: NaiveDate,

    /// Hours slept the previous night
    pub sleep_hours: Decimal,

    /// Sleep quality (1-5)
    pub sleep_quality: u8,

    /// Muscle soreness (1-5)
    pub soreness: u8,

    /// Fatigue (1-5)
    pub fatigue: u8,

    /// Mood (1-5)
    pub mood: u8,

    /// Hydration (1-5)
    pub hydration: u8,

    /// Composite readiness (0-100), derived upstream
    pub readiness_score: u8,
}

/// One athlete's result for one metric in a testing session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestingTrialResult {
    /// Record identifier
    pub id: String,

    /// Tested athlete
    pub athlete_id: String,

    /// Metric tested
    pub metric_id: String,

    /// Day of the testing session
    pub date: NaiveDate,

    /// Best attempt, None when the metric was not attempted
    #[serde(default)]
    pub best_score: Option<Decimal>,

    /// Average across attempts
    #[serde(default)]
    pub average_score: Option<Decimal>,
}

/// Direction of change between two values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Increasing,
    Stable,
    Decreasing,
}

impl TrendDirection {
    /// Classify the change from `start` to `end` with a 5% dead band
    pub fn between(start: Decimal, end: Decimal) -> Self {
        let change_threshold = dec!(0.05);
        let percent_change = (end - start) / start.abs().max(Decimal::ONE);

        if percent_change > change_threshold {
            TrendDirection::Increasing
        } else if percent_change < -change_threshold {
            TrendDirection::Decreasing
        } else {
            TrendDirection::Stable
        }
    }
}

impl std::fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrendDirection::Increasing => write!(f, "increasing"),
            TrendDirection::Stable => write!(f, "stable"),
            TrendDirection::Decreasing => write!(f, "decreasing"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_training_load_precomputed() {
        let date = NaiveDate::from_ymd_opt(2024, 9, 23).unwrap();
        let entry = DailyLoadEntry::new("l1", "a1", date, 7, 60, "Field");
        assert_eq!(entry.training_load, dec!(420));
    }

    #[test]
    fn test_best_score_direction() {
        assert!(BestScoreMethod::Highest.is_better(dec!(45), dec!(40)));
        assert!(!BestScoreMethod::Highest.is_better(dec!(40), dec!(40)));
        assert!(BestScoreMethod::Lowest.is_better(dec!(4.1), dec!(4.3)));
    }

    #[test]
    fn test_trend_direction() {
        assert_eq!(TrendDirection::between(dec!(100), dec!(110)), TrendDirection::Increasing);
        assert_eq!(TrendDirection::between(dec!(100), dec!(103)), TrendDirection::Stable);
        assert_eq!(TrendDirection::between(dec!(100), dec!(80)), TrendDirection::Decreasing);
        assert_eq!(TrendDirection::between(dec!(0), dec!(0)), TrendDirection::Stable);
    }

    #[test]
    fn test_camel_case_deserialization() {
        let json = r#"{
            "id": "l1",
            "athleteId": "a1",
            "date": "2024-09-23",
            "rpe": 6,
            "durationMinutes": 50,
            "trainingLoad": 300,
            "sessionType": "Gym"
        }"#;
        let entry: DailyLoadEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.athlete_id, "a1");
        assert_eq!(entry.training_load, dec!(300));

        let injury: InjuryRecord = serde_json::from_str(
            r#"{"id":"i1","athleteId":"a1","status":"rehab","dateOccurred":"2024-09-01"}"#,
        )
        .unwrap();
        assert_eq!(injury.status, InjuryStatus::Rehab);
        assert!(injury.date_resolved.is_none());
    }
}
