//! Calendar helpers. Days are local dates rendered as `YYYY-MM-DD`, instants are Unix epoch
//! milliseconds.

use chrono::{Datelike, Local, NaiveDate, NaiveTime, Utc};

pub const DAY_FORMAT: &str = "%Y-%m-%d";

#[must_use]
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Today's date in server local time.
#[must_use]
pub fn today() -> String {
    format_day(Local::now().date_naive())
}

#[must_use]
pub fn format_day(day: NaiveDate) -> String {
    day.format(DAY_FORMAT).to_string()
}

/// Parses a strict `YYYY-MM-DD` date.
#[must_use]
pub fn parse_day(value: &str) -> Option<NaiveDate> {
    if value.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(value, DAY_FORMAT).ok()
}

/// Parses `HH:MM` or `HH:MM:SS`.
#[must_use]
pub fn parse_time(value: &str) -> Option<NaiveTime> {
    match value.len() {
        5 => NaiveTime::parse_from_str(value, "%H:%M").ok(),
        8 => NaiveTime::parse_from_str(value, "%H:%M:%S").ok(),
        _ => None,
    }
}

/// Weekday of a `YYYY-MM-DD` date, counted from Monday (`0`).
#[must_use]
pub fn weekday_index(day: &str) -> Option<u32> {
    parse_day(day).map(|date| date.weekday().num_days_from_monday())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn days_are_strict() {
        assert!(parse_day("2025-03-14").is_some());
        assert!(parse_day("2025-3-14").is_none());
        assert!(parse_day("14.03.2025").is_none());
        assert!(parse_day("2025-02-30").is_none());
        assert_eq!(format_day(parse_day("2025-03-14").unwrap()), "2025-03-14");
    }

    #[test]
    fn times_accept_minutes_and_seconds() {
        assert!(parse_time("12:30").is_some());
        assert!(parse_time("12:30:59").is_some());
        assert!(parse_time("24:00").is_none());
        assert!(parse_time("1230").is_none());
    }

    #[test]
    fn weekday_counts_from_monday() {
        // 2025-03-10 is a Monday.
        assert_eq!(weekday_index("2025-03-10"), Some(0));
        assert_eq!(weekday_index("2025-03-16"), Some(6));
        assert_eq!(weekday_index("nope"), None);
    }

    #[test]
    fn today_is_well_formed() {
        assert!(parse_day(&today()).is_some());
    }
}
