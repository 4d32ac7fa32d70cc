use time::{format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime, UtcOffset};

use crate::error::DiaryError;

/// Parses a calendar day from a path or query parameter. Accepts a plain
/// `YYYY-MM-DD` as well as a full RFC 3339 instant, which is collapsed onto
/// its UTC calendar date.
pub fn parse_day(raw: &str) -> Result<Date, DiaryError> {
    let format = format_description!("[year]-[month]-[day]");
    if let Ok(date) = Date::parse(raw, &format) {
        return Ok(date);
    }
    OffsetDateTime::parse(raw, &Rfc3339)
        .map(day_of)
        .map_err(|_| DiaryError::InvalidDate(raw.to_string()))
}

/// UTC calendar date of an instant.
pub fn day_of(instant: OffsetDateTime) -> Date {
    instant.to_offset(UtcOffset::UTC).date()
}

/// Half-open `[midnight, next midnight)` UTC window for one calendar day.
/// Used identically for upsert matching, day listing and summary totals.
pub fn day_window(date: Date) -> Result<(OffsetDateTime, OffsetDateTime), DiaryError> {
    let start = date.midnight().assume_utc();
    let next = date
        .next_day()
        .ok_or_else(|| DiaryError::InvalidDate(date.to_string()))?;
    Ok((start, next.midnight().assume_utc()))
}

/// Serde adapter for `Date` fields carried as `YYYY-MM-DD` strings.
pub mod day_string {
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};
    use time::Date;

    pub fn serialize<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(date)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_day(&raw).map_err(D::Error::custom)
    }
}
