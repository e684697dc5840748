//! Boundary validation for incoming records.
//!
//! The analytics modules assume well-formed input. Everything that arrives
//! from outside (dataset files, adapters over the record store) passes through
//! here first so that bad values fail fast instead of leaking into results.

use rust_decimal::Decimal;

use crate::dataset::Dataset;
use crate::error::ValidationError;
use crate::models::{DailyLoadEntry, InjuryRecord, WellnessCheckin};

/// Validator for engine input records
pub struct RecordValidator;

impl RecordValidator {
    /// Validate a training session entry
    pub fn validate_load_entry(entry: &DailyLoadEntry) -> Result<(), ValidationError> {
        Self::require_id("load entry", &entry.id, "id")?;
        Self::require_id(&entry.id, &entry.athlete_id, "athleteId")?;

        if !(1..=10).contains(&entry.rpe) {
            return Err(ValidationError::RpeOutOfRange {
                entry: entry.id.clone(),
                rpe: entry.rpe,
            });
        }

        if entry.duration_minutes == 0 {
            return Err(ValidationError::NonPositiveDuration {
                entry: entry.id.clone(),
                minutes: entry.duration_minutes,
            });
        }

        let expected = Decimal::from(entry.rpe) * Decimal::from(entry.duration_minutes);
        if entry.training_load != expected {
            return Err(ValidationError::TrainingLoadMismatch {
                entry: entry.id.clone(),
                expected: expected.to_string(),
                actual: entry.training_load.to_string(),
            });
        }

        Ok(())
    }

    /// Validate a wellness check-in
    pub fn validate_checkin(checkin: &WellnessCheckin) -> Result<(), ValidationError> {
        Self::require_id("check-in", &checkin.id, "id")?;
        Self::require_id(&checkin.id, &checkin.athlete_id, "athleteId")?;

        let scores = [
            ("sleepQuality", checkin.sleep_quality),
            ("soreness", checkin.soreness),
            ("fatigue", checkin.fatigue),
            ("mood", checkin.mood),
            ("hydration", checkin.hydration),
        ];
        for (field, value) in scores {
            if !(1..=5).contains(&value) {
                return Err(ValidationError::ScoreOutOfRange {
                    checkin: checkin.id.clone(),
                    field: field.to_string(),
                    value,
                });
            }
        }

        if checkin.readiness_score > 100 {
            return Err(ValidationError::ReadinessOutOfRange {
                checkin: checkin.id.clone(),
                value: checkin.readiness_score,
            });
        }

        if checkin.sleep_hours < Decimal::ZERO {
            return Err(ValidationError::NegativeSleep {
                checkin: checkin.id.clone(),
                hours: checkin.sleep_hours.to_string(),
            });
        }

        Ok(())
    }

    /// Validate an injury record
    pub fn validate_injury(injury: &InjuryRecord) -> Result<(), ValidationError> {
        Self::require_id("injury", &injury.id, "id")?;
        Self::require_id(&injury.id, &injury.athlete_id, "athleteId")?;

        if let Some(resolved) = injury.date_resolved {
            if resolved < injury.date_occurred {
                return Err(ValidationError::InjuryDatesInverted {
                    injury: injury.id.clone(),
                    occurred: injury.date_occurred.to_string(),
                    resolved: resolved.to_string(),
                });
            }
        }

        Ok(())
    }

    fn require_id(record: &str, value: &str, field: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::EmptyIdentifier {
                record: record.to_string(),
                field: field.to_string(),
            });
        }
        Ok(())
    }
}

/// Validate every record in a dataset, collecting all failures in record order
pub fn validate_dataset(dataset: &Dataset) -> Vec<ValidationError> {
    let athletes = dataset
        .athletes
        .iter()
        .map(|a| RecordValidator::require_id("athlete", &a.id, "id"));
    let metrics = dataset
        .metrics
        .iter()
        .map(|m| RecordValidator::require_id("metric", &m.id, "id"));
    let loads = dataset.loads.iter().map(RecordValidator::validate_load_entry);
    let checkins = dataset.wellness.iter().map(RecordValidator::validate_checkin);
    let injuries = dataset.injuries.iter().map(RecordValidator::validate_injury);
    let trials = dataset.trials.iter().map(|t| {
        RecordValidator::require_id("testing result", &t.id, "id")
            .and_then(|_| RecordValidator::require_id(&t.id, &t.metric_id, "metricId"))
    });

    let errors: Vec<ValidationError> = athletes
        .chain(metrics)
        .chain(loads)
        .chain(checkins)
        .chain(injuries)
        .chain(trials)
        .filter_map(|r| r.err())
        .collect();

    if !errors.is_empty() {
        tracing::warn!(invalid = errors.len(), "Dataset validation failed");
    }
    errors
}
