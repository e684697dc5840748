//! Trailing day windows and rounding helpers shared by the analytics modules.
//!
//! All windows are anchored on an explicit `as_of` day. A record's age is
//! `(as_of - date)` in whole days, so `as_of` itself is day 0 and records
//! dated after `as_of` have a negative age and fall outside every window.

use chrono::NaiveDate;
use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// Whole days between `date` and `as_of` (negative for future dates)
pub fn days_ago(as_of: NaiveDate, date: NaiveDate) -> i64 {
    (as_of - date).num_days()
}

/// Inclusive range of record ages, in days before `as_of`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    /// Youngest age included (0 = `as_of`)
    pub newest: i64,
    /// Oldest age included
    pub oldest: i64,
}

impl DayWindow {
    /// The last `days` days, `as_of` included
    pub const fn trailing(days: i64) -> Self {
        DayWindow {
            newest: 0,
            oldest: days - 1,
        }
    }

    /// `days` days immediately preceding a trailing window of `offset` days
    pub const fn preceding(offset: i64, days: i64) -> Self {
        DayWindow {
            newest: offset,
            oldest: offset + days - 1,
        }
    }

    /// True when `date` falls inside the window
    pub fn contains(&self, as_of: NaiveDate, date: NaiveDate) -> bool {
        let age = days_ago(as_of, date);
        age >= self.newest && age <= self.oldest
    }

    /// Number of calendar days covered
    pub fn len(&self) -> i64 {
        (self.oldest - self.newest + 1).max(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Round half up to the nearest integer (`floor(x + 0.5)`)
pub fn round_half_up(value: Decimal) -> i64 {
    (value + Decimal::new(5, 1)).floor().to_i64().unwrap_or(0)
}

/// Round half up to `dp` decimal places
pub fn round_dp_half_up(value: Decimal, dp: u32) -> Decimal {
    let scale = Decimal::from(10u64.pow(dp));
    ((value * scale) + Decimal::new(5, 1)).floor() / scale
}

/// Mean of a slice of decimals, None when empty
pub fn mean(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<Decimal>() / Decimal::from(values.len()))
}

/// Percent change from `previous` to `current`, None without a baseline
pub fn percent_change(current: Decimal, previous: Decimal) -> Option<i64> {
    if previous.is_zero() {
        return None;
    }
    Some(round_half_up(
        (current - previous) / previous * Decimal::ONE_HUNDRED,
    ))
}
