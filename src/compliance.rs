use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::DailyLoadEntry;
use crate::window::{round_half_up, DayWindow};

/// Expected sessions in a trailing 7-day window
pub const WEEKLY_SESSION_TARGET: u32 = 4;

/// Expected sessions in a trailing 30-day window (4 per week, rounded)
pub const MONTHLY_SESSION_TARGET: u32 = 17;

const MONTHLY_DAYS: i64 = 30;

/// Logged sessions against the expected session count
///
/// Percentages are not capped: values above 100 mean more sessions than planned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceRate {
    pub weekly_actual: u32,
    pub weekly_target: u32,
    pub weekly_percent: i64,
    pub monthly_actual: u32,
    pub monthly_target: u32,
    pub monthly_percent: i64,
}

fn rate(actual: u32, target: u32) -> i64 {
    if target == 0 {
        return 0;
    }
    round_half_up(Decimal::from(actual) / Decimal::from(target) * Decimal::ONE_HUNDRED)
}

/// Compliance for the entries supplied (usually one athlete's)
pub fn compliance_rate(entries: &[DailyLoadEntry], as_of: NaiveDate) -> ComplianceRate {
    let count = |window: DayWindow| {
        entries
            .iter()
            .filter(|e| window.contains(as_of, e.date))
            .count() as u32
    };

    let weekly_actual = count(DayWindow::trailing(7));
    let monthly_actual = count(DayWindow::trailing(MONTHLY_DAYS));

    ComplianceRate {
        weekly_actual,
        weekly_target: WEEKLY_SESSION_TARGET,
        weekly_percent: rate(weekly_actual, WEEKLY_SESSION_TARGET),
        monthly_actual,
        monthly_target: MONTHLY_SESSION_TARGET,
        monthly_percent: rate(monthly_actual, MONTHLY_SESSION_TARGET),
    }
}
