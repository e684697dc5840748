use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{TrendDirection, WellnessCheckin};
use crate::window::{mean, round_half_up, DayWindow};

/// Qualitative readiness band used for heatmap colouring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadinessBand {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl ReadinessBand {
    /// Bands: poor < 40, fair < 60, good < 80, excellent otherwise
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=39 => ReadinessBand::Poor,
            40..=59 => ReadinessBand::Fair,
            60..=79 => ReadinessBand::Good,
            _ => ReadinessBand::Excellent,
        }
    }
}

impl std::fmt::Display for ReadinessBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadinessBand::Poor => write!(f, "poor"),
            ReadinessBand::Fair => write!(f, "fair"),
            ReadinessBand::Good => write!(f, "good"),
            ReadinessBand::Excellent => write!(f, "excellent"),
        }
    }
}

/// Readiness over a trailing window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadinessSummary {
    /// Mean readiness, None without check-ins
    pub average: Option<i64>,

    /// Most recent readiness in the window
    pub latest: Option<u8>,

    /// Second half of the window against the first half
    pub trend: TrendDirection,

    pub checkin_count: usize,
}

/// One calendar day on the readiness heatmap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapCell {
    pub date: NaiveDate,
    pub readiness: Option<u8>,
    pub band: Option<ReadinessBand>,
}

/// Most recent check-in by date; on equal dates the last one supplied wins
pub fn latest_checkin<'a>(
    checkins: impl IntoIterator<Item = &'a WellnessCheckin>,
) -> Option<&'a WellnessCheckin> {
    checkins.into_iter().fold(None::<&'a WellnessCheckin>, |best, c| match best {
        Some(b) if b.date > c.date => Some(b),
        _ => Some(c),
    })
}

/// Summarize readiness over the last `days` days
pub fn readiness_summary(
    checkins: &[WellnessCheckin],
    as_of: NaiveDate,
    days: u32,
) -> ReadinessSummary {
    let days = i64::from(days.max(1));
    let window = DayWindow::trailing(days);
    let in_window: Vec<&WellnessCheckin> = checkins
        .iter()
        .filter(|c| window.contains(as_of, c.date))
        .collect();

    let scores = |w: DayWindow| -> Vec<Decimal> {
        in_window
            .iter()
            .filter(|c| w.contains(as_of, c.date))
            .map(|c| Decimal::from(c.readiness_score))
            .collect()
    };

    let all = scores(window);
    let half = days / 2;
    let recent = mean(&scores(DayWindow::trailing(half.max(1))));
    let earlier = mean(&scores(DayWindow::preceding(half.max(1), days - half.max(1))));

    let trend = match (earlier, recent) {
        (Some(earlier), Some(recent)) => TrendDirection::between(earlier, recent),
        _ => TrendDirection::Stable,
    };

    let latest = latest_checkin(in_window.iter().copied()).map(|c| c.readiness_score);

    ReadinessSummary {
        average: mean(&all).map(round_half_up),
        latest,
        trend,
        checkin_count: in_window.len(),
    }
}

/// One cell per day over the last `days` days, oldest first.
///
/// Several check-ins on one day are averaged.
pub fn readiness_heatmap(
    checkins: &[WellnessCheckin],
    as_of: NaiveDate,
    days: u32,
) -> Vec<HeatmapCell> {
    let mut by_day: BTreeMap<NaiveDate, Vec<Decimal>> = BTreeMap::new();
    for checkin in checkins {
        by_day
            .entry(checkin.date)
            .or_default()
            .push(Decimal::from(checkin.readiness_score));
    }

    let start = as_of
        .checked_sub_days(Days::new(u64::from(days.saturating_sub(1))))
        .unwrap_or(as_of);

    start
        .iter_days()
        .take_while(|d| *d <= as_of)
        .map(|date| {
            let readiness = by_day
                .get(&date)
                .and_then(|scores| mean(scores))
                .map(|m| round_half_up(m).clamp(0, 100) as u8);
            HeatmapCell {
                date,
                readiness,
                band: readiness.map(ReadinessBand::from_score),
            }
        })
        .collect()
}
