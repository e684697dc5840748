//! JSON dataset boundary.
//!
//! A dataset is the full snapshot handed to the engine: athletes, metric
//! definitions and the four record streams. Field names are camelCase to match
//! the record store's export format.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::{DatasetError, Result};
use crate::models::{
    Athlete, DailyLoadEntry, InjuryRecord, Metric, TestingTrialResult, WellnessCheckin,
};
use crate::validation::validate_dataset;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Dataset {
    pub athletes: Vec<Athlete>,
    pub metrics: Vec<Metric>,
    pub loads: Vec<DailyLoadEntry>,
    pub injuries: Vec<InjuryRecord>,
    pub wellness: Vec<WellnessCheckin>,
    pub trials: Vec<TestingTrialResult>,
}

impl Dataset {
    /// Parse and validate a dataset file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;

        let dataset: Dataset =
            serde_json::from_str(&content).map_err(|e| DatasetError::Parse {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        dataset.validate()?;

        tracing::info!(
            path = %path.display(),
            athletes = dataset.athletes.len(),
            loads = dataset.loads.len(),
            wellness = dataset.wellness.len(),
            injuries = dataset.injuries.len(),
            trials = dataset.trials.len(),
            "Dataset loaded"
        );

        Ok(dataset)
    }

    /// Reject the dataset if any record is invalid, reporting all of them.
    ///
    /// References to unknown athletes or metrics are tolerated and logged.
    pub fn validate(&self) -> std::result::Result<(), DatasetError> {
        let errors = validate_dataset(self);
        if !errors.is_empty() {
            return Err(DatasetError::Invalid(errors));
        }

        let known: HashSet<&str> = self.athletes.iter().map(|a| a.id.as_str()).collect();
        let orphans = self
            .loads
            .iter()
            .map(|e| e.athlete_id.as_str())
            .chain(self.wellness.iter().map(|c| c.athlete_id.as_str()))
            .chain(self.injuries.iter().map(|i| i.athlete_id.as_str()))
            .chain(self.trials.iter().map(|t| t.athlete_id.as_str()))
            .filter(|id| !known.contains(id))
            .collect::<HashSet<_>>();
        for athlete_id in orphans {
            tracing::warn!(athlete_id, "Records reference an unknown athlete");
        }

        let metric_ids: HashSet<&str> = self.metrics.iter().map(|m| m.id.as_str()).collect();
        let unknown_metrics = self
            .trials
            .iter()
            .map(|t| t.metric_id.as_str())
            .filter(|id| !metric_ids.contains(id))
            .collect::<HashSet<_>>();
        for metric_id in unknown_metrics {
            tracing::warn!(metric_id, "Testing results reference an unknown metric");
        }

        Ok(())
    }

    pub fn athlete(&self, id: &str) -> Option<&Athlete> {
        self.athletes.iter().find(|a| a.id == id)
    }

    /// Athlete lookup that fails with `UnknownAthlete`
    pub fn require_athlete(&self, id: &str) -> std::result::Result<&Athlete, DatasetError> {
        self.athlete(id)
            .ok_or_else(|| DatasetError::UnknownAthlete(id.to_string()))
    }

    pub fn athlete_name(&self, id: &str) -> Option<&str> {
        self.athlete(id).map(|a| a.name.as_str())
    }

    /// Training sessions for one athlete
    pub fn entries_for(&self, athlete_id: &str) -> Vec<DailyLoadEntry> {
        self.loads
            .iter()
            .filter(|e| e.athlete_id == athlete_id)
            .cloned()
            .collect()
    }

    /// Wellness check-ins for one athlete
    pub fn checkins_for(&self, athlete_id: &str) -> Vec<WellnessCheckin> {
        self.wellness
            .iter()
            .filter(|c| c.athlete_id == athlete_id)
            .cloned()
            .collect()
    }

    /// Injury history for one athlete
    pub fn injuries_for(&self, athlete_id: &str) -> Vec<InjuryRecord> {
        self.injuries
            .iter()
            .filter(|i| i.athlete_id == athlete_id)
            .cloned()
            .collect()
    }

    /// Testing results for one athlete
    pub fn trials_for(&self, athlete_id: &str) -> Vec<TestingTrialResult> {
        self.trials
            .iter()
            .filter(|t| t.athlete_id == athlete_id)
            .cloned()
            .collect()
    }
}
