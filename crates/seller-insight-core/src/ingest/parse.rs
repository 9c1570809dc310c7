//! Best-effort parsing of raw spreadsheet cells.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::str::FromStr;

const DATETIME_FORMATS: [&str; 12] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%Y.%m.%d %H:%M:%S",
    "%Y.%m.%d %H:%M",
    "%Y. %m. %d %H:%M:%S",
    "%Y%m%d%H%M%S",
    "%m/%d/%Y %H:%M:%S",
];

const DATE_FORMATS: [&str; 6] = ["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d", "%Y. %m. %d", "%Y%m%d", "%m/%d/%Y"];

/// Largest serial day number Excel can represent (9999-12-31).
const EXCEL_MAX_SERIAL: i64 = 2_958_465;

/// Parse a timestamp cell. Unparsable or blank cells yield `None`.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim().trim_end_matches('.');
    if s.is_empty() {
        return None;
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }

    parse_excel_serial(s)
}

/// Excel stores dates as fractional days since 1899-12-30.
fn parse_excel_serial(s: &str) -> Option<NaiveDateTime> {
    if !s.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }
    let serial = Decimal::from_str(s).ok()?;
    let days = serial.trunc().to_i64()?;
    if !(1..=EXCEL_MAX_SERIAL).contains(&days) {
        return None;
    }
    let seconds = (serial.fract() * dec!(86400)).round().to_i64()?;
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    Some(epoch + Duration::days(days) + Duration::seconds(seconds))
}

/// Parse a numeric cell, ignoring everything except digits, `.` and `-`.
///
/// `"₩12,900원"` parses as `12900`; `"-"` and `""` yield `None`.
pub fn parse_number(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    Decimal::from_str(&cleaned).ok()
}

/// Trimmed cell contents, `None` when blank.
pub fn non_empty(raw: &str) -> Option<&str> {
    let s = raw.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("nan") {
        None
    } else {
        Some(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn ymd_hms(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn test_parse_common_layouts() {
        let expected = ymd_hms(2025, 8, 18, 12, 1, 57);
        assert_eq!(parse_timestamp("2025-08-18 12:01:57"), Some(expected));
        assert_eq!(parse_timestamp("2025/08/18 12:01:57"), Some(expected));
        assert_eq!(parse_timestamp("2025.08.18 12:01:57"), Some(expected));
        assert_eq!(parse_timestamp(" 2025-08-18T12:01:57 "), Some(expected));
        assert_eq!(parse_timestamp("20250818120157"), Some(expected));
    }

    #[test]
    fn test_parse_date_only() {
        assert_eq!(
            parse_timestamp("2025-08-18"),
            Some(ymd_hms(2025, 8, 18, 0, 0, 0))
        );
        assert_eq!(
            parse_timestamp("2025. 08. 18."),
            Some(ymd_hms(2025, 8, 18, 0, 0, 0))
        );
    }

    #[test]
    fn test_parse_rfc3339_keeps_wall_clock() {
        let dt = parse_timestamp("2025-08-18T09:30:00+09:00").unwrap();
        assert_eq!(dt.hour(), 9);
        assert_eq!(dt.minute(), 30);
    }

    #[test]
    fn test_parse_excel_serial() {
        // 45887 = 2025-08-18, .5 = noon
        assert_eq!(
            parse_timestamp("45887.5"),
            Some(ymd_hms(2025, 8, 18, 12, 0, 0))
        );
    }

    #[test]
    fn test_unparsable_timestamp() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("not a date"), None);
        assert_eq!(parse_timestamp("0"), None);
    }

    #[test]
    fn test_parse_number_strips_formatting() {
        assert_eq!(parse_number("₩12,900원"), Some(dec!(12900)));
        assert_eq!(parse_number("1,234.50"), Some(dec!(1234.50)));
        assert_eq!(parse_number("-3,000"), Some(dec!(-3000)));
        assert_eq!(parse_number(" 2 "), Some(dec!(2)));
    }

    #[test]
    fn test_parse_number_rejects_garbage() {
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("-"), None);
        assert_eq!(parse_number("없음"), None);
        assert_eq!(parse_number("1.2.3"), None);
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty("  a "), Some("a"));
        assert_eq!(non_empty("   "), None);
        assert_eq!(non_empty("NaN"), None);
    }
}
