use chrono::{Days, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use crate::config::ThresholdSettings;
use crate::models::DailyLoadEntry;
use crate::trend::aggregate_daily_load;

/// Standard deviations below which a standard deviation counts as zero
const ZERO_VARIANCE_EPSILON: f64 = 1e-9;

/// Load band relative to the athlete's own recent history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadZone {
    /// No load logged
    Rest,
    /// Below mean - 1 SD
    Low,
    /// Within mean +/- 1 SD
    Optimal,
    /// Above mean + 1 SD
    High,
    /// Above mean + 2 SD
    Danger,
}

impl LoadZone {
    pub const ALL: [LoadZone; 5] = [
        LoadZone::Rest,
        LoadZone::Low,
        LoadZone::Optimal,
        LoadZone::High,
        LoadZone::Danger,
    ];

    /// Classify a load against a mean and standard deviation
    ///
    /// Band edges:
    /// - Rest: load == 0
    /// - Danger: > mean + 2 SD
    /// - High: > mean + 1 SD
    /// - Low: < mean - 1 SD
    /// - Optimal: everything else, including any nonzero load when SD == 0
    pub fn classify(load: f64, mean: f64, std_dev: f64) -> Self {
        if load <= 0.0 {
            LoadZone::Rest
        } else if std_dev.abs() < ZERO_VARIANCE_EPSILON || !std_dev.is_finite() {
            LoadZone::Optimal
        } else if load > mean + 2.0 * std_dev {
            LoadZone::Danger
        } else if load > mean + std_dev {
            LoadZone::High
        } else if load < mean - std_dev {
            LoadZone::Low
        } else {
            LoadZone::Optimal
        }
    }
}

impl std::fmt::Display for LoadZone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            LoadZone::Rest => "rest",
            LoadZone::Low => "low",
            LoadZone::Optimal => "optimal",
            LoadZone::High => "high",
            LoadZone::Danger => "danger",
        };
        write!(f, "{}", label)
    }
}

/// One classified day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadZoneDay {
    pub date: NaiveDate,
    pub training_load: Decimal,
    pub zone: LoadZone,
}

/// Classified series plus the trailing run of danger days
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadZoneResult {
    pub days: Vec<LoadZoneDay>,

    /// Consecutive danger days ending at the most recent day
    pub danger_streak: u32,
}

impl LoadZoneResult {
    /// Number of days in a zone
    pub fn count(&self, zone: LoadZone) -> usize {
        self.days.iter().filter(|d| d.zone == zone).count()
    }
}

/// Rolling mean/SD zone classifier
pub struct LoadZoneClassifier;

impl LoadZoneClassifier {
    /// Contiguous per-day load series for one athlete over the last `days` days.
    /// Days without sessions carry zero load; several sessions on one day are summed.
    pub fn daily_series(
        entries: &[DailyLoadEntry],
        athlete_id: &str,
        as_of: NaiveDate,
        days: u32,
    ) -> Vec<(NaiveDate, Decimal)> {
        let daily = aggregate_daily_load(entries, Some(athlete_id));
        let start = as_of
            .checked_sub_days(Days::new(u64::from(days.saturating_sub(1))))
            .unwrap_or(as_of);

        start
            .iter_days()
            .take_while(|d| *d <= as_of)
            .map(|date| {
                let load = daily
                    .get(&date)
                    .map(|d| d.total_load)
                    .unwrap_or(Decimal::ZERO);
                (date, load)
            })
            .collect()
    }

    /// Classify a chronological day series.
    ///
    /// Each training day is compared with the mean and population SD of the
    /// training days inside the trailing `window` days ending at (and
    /// including) that day. Rest days stay `Rest` and never enter the
    /// statistics. Shorter histories use whatever is available.
    pub fn classify_series(series: &[(NaiveDate, Decimal)], window: usize) -> LoadZoneResult {
        let window = window.max(1);
        let loads: Vec<f64> = series
            .iter()
            .map(|(_, load)| load.to_f64().unwrap_or(0.0))
            .collect();

        let days: Vec<LoadZoneDay> = series
            .iter()
            .enumerate()
            .map(|(i, (date, load))| {
                let zone = if loads[i] <= 0.0 {
                    LoadZone::Rest
                } else {
                    let start = (i + 1).saturating_sub(window);
                    let training: Vec<f64> = loads[start..=i]
                        .iter()
                        .copied()
                        .filter(|l| *l > 0.0)
                        .collect();
                    let mean = training.iter().mean();
                    let std_dev = training.iter().population_std_dev();
                    LoadZone::classify(loads[i], mean, std_dev)
                };

                LoadZoneDay {
                    date: *date,
                    training_load: *load,
                    zone,
                }
            })
            .collect();

        let danger_streak = days
            .iter()
            .rev()
            .take_while(|d| d.zone == LoadZone::Danger)
            .count() as u32;

        LoadZoneResult {
            days,
            danger_streak,
        }
    }

    /// Zones for one athlete over the configured default window
    pub fn load_zones(
        entries: &[DailyLoadEntry],
        athlete_id: &str,
        settings: &ThresholdSettings,
        as_of: NaiveDate,
    ) -> LoadZoneResult {
        let series = Self::daily_series(entries, athlete_id, as_of, settings.default_days);
        let result = Self::classify_series(&series, settings.default_days as usize);

        tracing::debug!(
            athlete_id,
            days = result.days.len(),
            danger_streak = result.danger_streak,
            "Load zones classified"
        );

        result
    }
}
