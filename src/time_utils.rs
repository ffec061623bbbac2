// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time handling.

use chrono::{DateTime, Months, NaiveDate, NaiveTime, SecondsFormat, SubsecRound, TimeDelta, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Current time truncated to whole seconds, so stored timestamps sort lexically.
pub fn now_utc() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}

/// Add calendar months, clamping to the last day of the target month.
///
/// `2024-01-31 + 1 month` is `2024-02-29`.
pub fn add_months(date: DateTime<Utc>, months: u32) -> DateTime<Utc> {
    date.checked_add_months(Months::new(months)).unwrap_or(date)
}

/// Inclusive `[00:00:00, 23:59:59.999]` bounds of a UTC calendar day.
pub fn day_bounds(day: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = day.and_time(NaiveTime::MIN).and_utc();
    let end = start + TimeDelta::days(1) - TimeDelta::milliseconds(1);
    (start, end)
}

/// Parse a `YYYY-MM-DD` query parameter.
pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_add_months_simple() {
        let start = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        assert_eq!(
            add_months(start, 3),
            Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_add_months_clamps_to_month_end() {
        let start = Utc.with_ymd_and_hms(2024, 1, 31, 8, 30, 0).unwrap();
        assert_eq!(
            add_months(start, 1),
            Utc.with_ymd_and_hms(2024, 2, 29, 8, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_add_months_crosses_year() {
        let start = Utc.with_ymd_and_hms(2025, 11, 15, 0, 0, 0).unwrap();
        assert_eq!(
            add_months(start, 6),
            Utc.with_ymd_and_hms(2026, 5, 15, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_day_bounds() {
        let day = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
        let (start, end) = day_bounds(day);
        assert_eq!(format_utc_rfc3339(start), "2025-05-01T00:00:00Z");
        assert_eq!(
            end,
            Utc.with_ymd_and_hms(2025, 5, 1, 23, 59, 59).unwrap() + TimeDelta::milliseconds(999)
        );
    }

    #[test]
    fn test_parse_day() {
        assert_eq!(parse_day("2025-05-01"), NaiveDate::from_ymd_opt(2025, 5, 1));
        assert_eq!(parse_day("01/05/2025"), None);
    }
}
