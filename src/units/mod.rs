//! Time units and the interval arithmetic shared by schedule generation and
//! agenda projection.
//!
//! Two kinds of arithmetic live here. `add_interval` is calendar-correct and
//! is used for treatment end dates. `frequency_interval` converts to a flat
//! number of hours (a month is 30 days) and is used for stepping between
//! doses.

use crate::error::{ScheduleError, ScheduleResult};
use chrono::{Days, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const HOURS_PER_DAY: i64 = 24;
pub const HOURS_PER_WEEK: i64 = HOURS_PER_DAY * 7;
/// Flat month used for frequency stepping.
pub const HOURS_PER_MONTH: i64 = HOURS_PER_DAY * 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TimeUnit {
    Hours,
    Days,
    Weeks,
    Months,
}

impl TimeUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeUnit::Hours => "hours",
            TimeUnit::Days => "days",
            TimeUnit::Weeks => "weeks",
            TimeUnit::Months => "months",
        }
    }
}

impl FromStr for TimeUnit {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hour" | "hours" => Ok(TimeUnit::Hours),
            "day" | "days" => Ok(TimeUnit::Days),
            "week" | "weeks" => Ok(TimeUnit::Weeks),
            "month" | "months" => Ok(TimeUnit::Months),
            other => Err(ScheduleError::InvalidUnit(format!(
                "'{}' is not one of hours, days, weeks, months",
                other
            ))),
        }
    }
}

impl TryFrom<String> for TimeUnit {
    type Error = ScheduleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeUnit> for String {
    fn from(unit: TimeUnit) -> Self {
        unit.as_str().to_string()
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Number of hours in `value` units, using the flat 30-day month.
pub fn unit_to_hours(value: i64, unit: TimeUnit) -> ScheduleResult<i64> {
    let factor = match unit {
        TimeUnit::Hours => 1,
        TimeUnit::Days => HOURS_PER_DAY,
        TimeUnit::Weeks => HOURS_PER_WEEK,
        TimeUnit::Months => HOURS_PER_MONTH,
    };

    value.checked_mul(factor).ok_or_else(|| {
        ScheduleError::OutOfRange(format!("{} {} does not fit in hours", value, unit))
    })
}

/// Gap between consecutive doses for a frequency of `value` units.
pub fn frequency_interval(value: i64, unit: TimeUnit) -> ScheduleResult<Duration> {
    let hours = unit_to_hours(value, unit)?;
    Duration::try_hours(hours).ok_or_else(|| {
        ScheduleError::OutOfRange(format!("{} hours exceeds the supported interval", hours))
    })
}

/// Add `value` units to `instant` using calendar arithmetic.
///
/// Month addition clamps to the last day of the target month, so
/// 2024-01-31 plus one month is 2024-02-29. Negative values step backwards.
pub fn add_interval(instant: NaiveDateTime, value: i64, unit: TimeUnit) -> ScheduleResult<NaiveDateTime> {
    let out_of_range = || {
        ScheduleError::OutOfRange(format!("{} + {} {}", instant, value, unit))
    };

    let result = match unit {
        TimeUnit::Hours => Duration::try_hours(value)
            .and_then(|delta| instant.checked_add_signed(delta)),
        TimeUnit::Days => add_days(instant, Some(value)),
        TimeUnit::Weeks => add_days(instant, value.checked_mul(7)),
        TimeUnit::Months => {
            let months = u32::try_from(value.unsigned_abs()).ok().map(Months::new);
            match months {
                Some(m) if value >= 0 => instant.checked_add_months(m),
                Some(m) => instant.checked_sub_months(m),
                None => None,
            }
        }
    };

    result.ok_or_else(out_of_range)
}

fn add_days(instant: NaiveDateTime, days: Option<i64>) -> Option<NaiveDateTime> {
    let days = days?;
    let magnitude = Days::new(days.unsigned_abs());
    if days >= 0 {
        instant.checked_add_days(magnitude)
    } else {
        instant.checked_sub_days(magnitude)
    }
}

/// Midnight and 23:59:59 of the calendar day containing `now`.
pub fn day_bounds(now: NaiveDateTime) -> (NaiveDateTime, NaiveDateTime) {
    let date: NaiveDate = now.date();
    let start = date.and_time(NaiveTime::MIN);
    let end = date.and_hms_opt(23, 59, 59).unwrap_or(start);
    (start, end)
}

const INSTANT_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parse a naive local instant such as `2024-01-01T08:00` or `2024-01-01 08:00:00`.
pub fn parse_instant(text: &str) -> ScheduleResult<NaiveDateTime> {
    let trimmed = text.trim();
    INSTANT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| ScheduleError::InvalidDateTime(format!(
            "'{}' (expected YYYY-MM-DDTHH:MM[:SS])",
            trimmed
        )))
}
