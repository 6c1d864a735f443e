use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Source of "now" for anything that compares against the current time.
#[cfg_attr(test, mockall::automock)]
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Parses a backend or form timestamp into local wall-clock time.
///
/// Offsets (RFC 3339) are converted to the local zone; naive values are taken
/// as already local. A bare date means midnight. Returns `None` for anything
/// that does not describe a real point in time.
pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Local).naive_local());
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN))
}

/// Calendar date of a stored value, read as written.
///
/// Application dates travel as `YYYY-MM-DD` or as a UTC midnight timestamp;
/// the leading date is the one the user picked, so no zone shift applies.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let value = raw.trim();
    let prefix = value.get(..10)?;
    let date = NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()?;
    if value.len() > 10 && parse_datetime(value).is_none() {
        return None;
    }
    Some(date)
}

pub fn is_valid_datetime(raw: &str) -> bool {
    parse_datetime(raw).is_some()
}

pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let (next_year, next_month) = next_month(year, month);
    let next_first = NaiveDate::from_ymd_opt(next_year, next_month, 1)?;
    u32::try_from((next_first - first).num_days()).ok()
}

/// Weekday of the 1st, counted from Sunday = 0.
pub fn first_weekday(year: i32, month: u32) -> Option<u32> {
    NaiveDate::from_ymd_opt(year, month, 1).map(|d| d.weekday().num_days_from_sunday())
}

pub fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month >= 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

pub fn prev_month(year: i32, month: u32) -> (i32, u32) {
    if month <= 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

pub fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

pub fn format_wire_datetime(dt: &NaiveDateTime) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S").to_string()
}

pub fn format_wire_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn february_follows_leap_years() {
        assert_eq!(days_in_month(2024, 2), Some(29));
        assert_eq!(days_in_month(2023, 2), Some(28));
        assert_eq!(days_in_month(1900, 2), Some(28));
        assert_eq!(days_in_month(2000, 2), Some(29));
    }

    #[test]
    fn month_lengths_cover_every_case() {
        assert_eq!(days_in_month(2024, 4), Some(30));
        assert_eq!(days_in_month(2024, 12), Some(31));
        assert_eq!(days_in_month(2024, 13), None);
        assert_eq!(days_in_month(2024, 0), None);
    }

    #[test]
    fn parses_form_and_backend_shapes() {
        let expected = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        assert_eq!(parse_datetime("2024-05-01T09:30"), Some(expected));
        assert_eq!(parse_datetime("2024-05-01T09:30:00"), Some(expected));
        assert_eq!(parse_datetime("2024-05-01 09:30:00"), Some(expected));
        assert_eq!(parse_datetime("2024-05-01T09:30:00.000"), Some(expected));
        assert_eq!(
            parse_datetime("2024-05-01"),
            NaiveDate::from_ymd_opt(2024, 5, 1).map(|d| d.and_time(NaiveTime::MIN))
        );
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_datetime(""), None);
        assert_eq!(parse_datetime("   "), None);
        assert_eq!(parse_datetime("not a date"), None);
        assert_eq!(parse_datetime("2024-02-30T10:00"), None);
        assert!(!is_valid_datetime("2024-13-01"));
    }

    #[test]
    fn date_reads_leading_component_without_zone_shift() {
        let may_first = NaiveDate::from_ymd_opt(2024, 5, 1);
        assert_eq!(parse_date("2024-05-01"), may_first);
        assert_eq!(parse_date("2024-05-01T00:00:00+00:00"), may_first);
        assert_eq!(parse_date("2024-05-01Tgarbage"), None);
        assert_eq!(parse_date("05/01/2024"), None);
    }

    #[test]
    fn month_navigation_wraps_years() {
        assert_eq!(next_month(2024, 12), (2025, 1));
        assert_eq!(prev_month(2025, 1), (2024, 12));
        assert_eq!(first_weekday(2024, 5), Some(3));
        assert_eq!(month_key(NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()), "2024-03");
    }
}
