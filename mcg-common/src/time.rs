//! Timestamp utilities

use crate::{Error, Result};
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

/// Build a UTC timestamp from calendar fields (seconds are always zero)
///
/// Fails with `InvalidInput` for dates that do not exist (e.g. 31 February).
pub fn compose_datetime(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
) -> Result<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| {
            Error::InvalidInput(format!(
                "invalid date/time {:04}-{:02}-{:02} {:02}:{:02}",
                year, month, day, hour, minute
            ))
        })
}

/// Add whole hours and minutes to a timestamp
pub fn add_period(start: DateTime<Utc>, hours: i64, minutes: i64) -> Result<DateTime<Utc>> {
    let period = Duration::try_hours(hours)
        .zip(Duration::try_minutes(minutes))
        .and_then(|(h, m)| h.checked_add(&m))
        .ok_or_else(|| Error::InvalidInput(format!("period {}h {}m out of range", hours, minutes)))?;

    start
        .checked_add_signed(period)
        .ok_or_else(|| Error::InvalidInput(format!("period {}h {}m overflows", hours, minutes)))
}

/// Seconds since the Unix epoch
pub fn to_unix_time(time: DateTime<Utc>) -> i64 {
    time.timestamp()
}
