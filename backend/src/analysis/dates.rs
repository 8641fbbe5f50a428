//! Publish-date parsing.
//!
//! Exports use either ISO dates or the US display form ("Jan 5, 2026").
//! Unparseable values yield `None`; such items are only dropped from the
//! year-scoped summary.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATE_FORMATS: [&str; 7] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d %b %Y",
    "%d %B %Y",
];

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"];

/// Parse a publish date, ignoring any time-of-day component.
pub fn parse_publish_date(raw: &str) -> Option<NaiveDate> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|dt| dt.date())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn test_display_format() {
        assert_eq!(parse_publish_date("Jan 5, 2026"), ymd(2026, 1, 5));
        assert_eq!(parse_publish_date("December 31, 2025"), ymd(2025, 12, 31));
    }

    #[test]
    fn test_iso_formats() {
        assert_eq!(parse_publish_date("2026-03-14"), ymd(2026, 3, 14));
        assert_eq!(parse_publish_date("2026-03-14 18:30:00"), ymd(2026, 3, 14));
        assert_eq!(parse_publish_date("2026-03-14T18:30:00Z"), ymd(2026, 3, 14));
        assert_eq!(parse_publish_date("2026/03/14"), ymd(2026, 3, 14));
    }

    #[test]
    fn test_us_numeric_format() {
        assert_eq!(parse_publish_date("03/14/2026"), ymd(2026, 3, 14));
    }

    #[test]
    fn test_unparseable() {
        assert_eq!(parse_publish_date(""), None);
        assert_eq!(parse_publish_date("yesterday"), None);
        assert_eq!(parse_publish_date("2026-13-40"), None);
    }
}
