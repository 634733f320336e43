use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use super::types::RecoveryError;

const MS_PER_DAY: i64 = 86_400_000;

/// Parses the surgery date as the browser client would: a bare
/// `YYYY-MM-DD` is midnight UTC, an RFC 3339 timestamp keeps its offset,
/// and an offset-less timestamp is read as UTC.
pub fn parse_surgery_date(value: &str) -> Result<DateTime<Utc>, RecoveryError> {
    let trimmed = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(surgery_instant(date));
    }

    Err(RecoveryError::InvalidSurgeryDate(value.to_string()))
}

/// Midnight UTC on the given calendar day.
pub fn surgery_instant(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Whole days from `surgery` to `now`, floored toward negative infinity.
pub fn days_since_surgery(surgery: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - surgery).num_milliseconds().div_euclid(MS_PER_DAY)
}
