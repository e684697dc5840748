//! Risk flag synthesis
//!
//! Fuses the ACWR snapshot, the latest wellness check-in and the
//! week-over-week load comparison into dismissible alert flags. Each rule
//! fires independently and only when its signal is present: an athlete with
//! no check-ins never gets a readiness flag.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::acwr::{RiskIndicator, RiskLevel};
use crate::config::ThresholdSettings;
use crate::models::{DailyLoadEntry, WellnessCheckin};
use crate::weekly::week_over_week;
use crate::wellness::latest_checkin;

/// Readiness below this value raises a warning
pub const LOW_READINESS_THRESHOLD: u8 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlagSeverity {
    Warning,
    Danger,
}

impl std::fmt::Display for FlagSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FlagSeverity::Warning => write!(f, "warning"),
            FlagSeverity::Danger => write!(f, "danger"),
        }
    }
}

/// One alert for the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskFlag {
    /// Stable per flag kind, used for client-side dismissal
    pub id: String,
    pub severity: FlagSeverity,
    pub title: String,
    pub message: String,
}

impl RiskFlag {
    fn new(id: &str, severity: FlagSeverity, title: &str, message: String) -> Self {
        RiskFlag {
            id: id.to_string(),
            severity,
            title: title.to_string(),
            message,
        }
    }
}

fn acwr_flag(indicator: &RiskIndicator, settings: &ThresholdSettings) -> Option<RiskFlag> {
    match indicator.risk_level {
        RiskLevel::High => Some(RiskFlag::new(
            "acwr-high",
            FlagSeverity::Danger,
            "High workload ratio",
            format!(
                "ACWR is {} (above {}). Reduce training load to lower injury risk.",
                indicator.acwr, settings.acwr_high
            ),
        )),
        RiskLevel::Moderate => Some(RiskFlag::new(
            "acwr-moderate",
            FlagSeverity::Warning,
            "Elevated workload ratio",
            format!(
                "ACWR is {} (above {}). Monitor load progression closely.",
                indicator.acwr, settings.acwr_moderate
            ),
        )),
        RiskLevel::Low => None,
    }
}

fn readiness_flag(checkins: &[WellnessCheckin]) -> Option<RiskFlag> {
    let latest = latest_checkin(checkins)?;
    if latest.readiness_score >= LOW_READINESS_THRESHOLD {
        return None;
    }
    Some(RiskFlag::new(
        "low-readiness",
        FlagSeverity::Warning,
        "Low readiness",
        format!(
            "Latest readiness score is {} (checked in {}). Consider a lighter session.",
            latest.readiness_score, latest.date
        ),
    ))
}

fn load_spike_flag(
    entries: &[DailyLoadEntry],
    checkins: &[WellnessCheckin],
    settings: &ThresholdSettings,
    as_of: NaiveDate,
) -> Option<RiskFlag> {
    let wow = week_over_week(entries, checkins, settings, as_of);
    if !wow.load_spike_alert {
        return None;
    }
    let percent = wow.changes.load_percent?;
    Some(RiskFlag::new(
        "load-spike",
        FlagSeverity::Danger,
        "Load spike",
        format!(
            "Weekly load is up {}% on last week (threshold {}%).",
            percent, settings.load_spike_percent
        ),
    ))
}

/// Build the alert list for one athlete.
///
/// `checkins` and `entries` must already be filtered to the athlete the
/// indicator belongs to. Flags are deduplicated by id and danger flags are
/// listed before warnings; otherwise rule order is kept.
pub fn synthesize_risk_flags(
    indicator: &RiskIndicator,
    checkins: &[WellnessCheckin],
    entries: &[DailyLoadEntry],
    settings: &ThresholdSettings,
    as_of: NaiveDate,
) -> Vec<RiskFlag> {
    let candidates = [
        acwr_flag(indicator, settings),
        readiness_flag(checkins),
        load_spike_flag(entries, checkins, settings, as_of),
    ];

    let mut seen = HashSet::new();
    let mut flags: Vec<RiskFlag> = candidates
        .into_iter()
        .flatten()
        .filter(|flag| seen.insert(flag.id.clone()))
        .collect();

    flags.sort_by(|a, b| b.severity.cmp(&a.severity));

    tracing::debug!(
        athlete_id = %indicator.athlete_id,
        flags = flags.len(),
        "Risk flags synthesized"
    );

    flags
}
