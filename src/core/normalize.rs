//! Per-field normalizers for statement rows.

use crate::domain::model::{CellValue, SkipReason};
use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

pub const DEFAULT_DETAIL: &str = "Sin detalle";
pub const MAX_DETAIL_LEN: usize = 2000;

/// Accepted text date layouts, tried in order. Day-month-year wins ties.
/// Each layout is gated by a shape check so the year is always four digits.
pub const DATE_PATTERNS: [(&str, &str); 2] = [
    (r"^\d{1,2}-\d{1,2}-\d{4}$", "%d-%m-%Y"),
    (r"^\d{4}-\d{1,2}-\d{1,2}$", "%Y-%m-%d"),
];

static DATE_SHAPES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    DATE_PATTERNS
        .iter()
        .map(|(shape, format)| (Regex::new(shape).expect("valid date shape"), *format))
        .collect()
});

pub fn normalize_date(value: &CellValue) -> Result<NaiveDate, SkipReason> {
    if value.is_empty() {
        return Err(SkipReason::EmptyDate);
    }

    match value {
        CellValue::Date(d) => Ok(*d),
        CellValue::DateTime(dt) => Ok(dt.date()),
        CellValue::Text(raw) => {
            let text = raw.trim();
            DATE_SHAPES
                .iter()
                .filter(|(shape, _)| shape.is_match(text))
                .find_map(|(_, format)| NaiveDate::parse_from_str(text, format).ok())
                .ok_or_else(|| SkipReason::InvalidDateFormat(raw.clone()))
        }
        other => Err(SkipReason::InvalidDateType(other.to_string())),
    }
}

/// Cleans a free-text cell into something the store's title field accepts.
///
/// The result is printable ASCII, single-spaced, trimmed, never empty and at
/// most `max_len` characters. Applying it to its own output is a no-op.
pub fn sanitize_text(value: &CellValue, default: &str, max_len: usize) -> String {
    if value.is_empty() {
        return fallback(default, max_len);
    }

    let raw = value.to_string();
    let printable: String = raw
        .trim()
        .chars()
        .filter(|c| (' '..='~').contains(c))
        .collect();
    let collapsed = printable.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.is_empty() {
        return fallback(default, max_len);
    }
    truncate(collapsed, max_len)
}

fn fallback(default: &str, max_len: usize) -> String {
    truncate(default.to_string(), max_len)
}

// ASCII only at this point, so byte length == char count.
fn truncate(mut text: String, max_len: usize) -> String {
    if text.len() > max_len {
        text.truncate(max_len);
        let trimmed_len = text.trim_end().len();
        text.truncate(trimmed_len);
    }
    text
}

/// Blank means "no movement": 0.0. Anything else must parse to a finite number.
pub fn coerce_number(field: &str, value: &CellValue) -> Result<f64, SkipReason> {
    if value.is_empty() {
        return Ok(0.0);
    }

    let invalid = || SkipReason::InvalidNumeric {
        field: field.to_string(),
        value: value.to_string(),
    };

    let number = match value {
        CellValue::Number(n) => *n,
        CellValue::Text(s) => s.trim().parse::<f64>().map_err(|_| invalid())?,
        _ => return Err(invalid()),
    };

    if number.is_finite() {
        Ok(number)
    } else {
        Err(invalid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_date_day_month_year_first() {
        assert_eq!(normalize_date(&text("15-03-2024")), Ok(ymd(2024, 3, 15)));
        // both layouts parse, day-month-year wins
        assert_eq!(normalize_date(&text("01-02-2024")), Ok(ymd(2024, 2, 1)));
    }

    #[test]
    fn test_date_iso_fallback() {
        assert_eq!(normalize_date(&text("2024-03-15")), Ok(ymd(2024, 3, 15)));
        assert_eq!(normalize_date(&text(" 2024-03-15 ")), Ok(ymd(2024, 3, 15)));
    }

    #[test]
    fn test_date_requires_four_digit_year() {
        for raw in ["05-03-24", "2024-3-5x", "24-03-15", "15-03-02024", "15-3-2024 "] {
            let expected = if raw == "15-3-2024 " {
                Ok(ymd(2024, 3, 15))
            } else {
                Err(SkipReason::InvalidDateFormat(raw.to_string()))
            };
            assert_eq!(normalize_date(&text(raw)), expected, "input {:?}", raw);
        }
    }

    #[test]
    fn test_date_structured_values() {
        let dt = NaiveDateTime::parse_from_str("2024-03-15 13:45:00", "%Y-%m-%d %H:%M:%S").unwrap();
        assert_eq!(normalize_date(&CellValue::DateTime(dt)), Ok(ymd(2024, 3, 15)));
        assert_eq!(normalize_date(&CellValue::Date(ymd(2023, 12, 31))), Ok(ymd(2023, 12, 31)));
    }

    #[test]
    fn test_date_errors() {
        assert_eq!(normalize_date(&CellValue::Empty), Err(SkipReason::EmptyDate));
        assert_eq!(normalize_date(&text("  ")), Err(SkipReason::EmptyDate));
        assert_eq!(
            normalize_date(&text("15/03/2024")),
            Err(SkipReason::InvalidDateFormat("15/03/2024".to_string()))
        );
        assert_eq!(
            normalize_date(&text("31-02-2024")),
            Err(SkipReason::InvalidDateFormat("31-02-2024".to_string()))
        );
        assert_eq!(
            normalize_date(&CellValue::Number(45366.0)),
            Err(SkipReason::InvalidDateType("45366".to_string()))
        );
    }

    #[test]
    fn test_sanitize_defaults() {
        assert_eq!(sanitize_text(&CellValue::Empty, DEFAULT_DETAIL, MAX_DETAIL_LEN), "Sin detalle");
        assert_eq!(sanitize_text(&text(" \t "), DEFAULT_DETAIL, MAX_DETAIL_LEN), "Sin detalle");
        // nothing printable survives
        assert_eq!(sanitize_text(&text("ñ\u{7}é"), DEFAULT_DETAIL, MAX_DETAIL_LEN), "Sin detalle");
    }

    #[test]
    fn test_sanitize_cleans_and_collapses() {
        let cleaned = sanitize_text(
            &text("  Transferencia\u{0}  a   Peña\r\n SpA  "),
            DEFAULT_DETAIL,
            MAX_DETAIL_LEN,
        );
        assert_eq!(cleaned, "Transferencia a Pea SpA");
        assert_eq!(sanitize_text(&CellValue::Number(1500.0), DEFAULT_DETAIL, MAX_DETAIL_LEN), "1500");
    }

    #[test]
    fn test_sanitize_truncates() {
        let long = "x".repeat(MAX_DETAIL_LEN + 50);
        let cleaned = sanitize_text(&text(&long), DEFAULT_DETAIL, MAX_DETAIL_LEN);
        assert_eq!(cleaned.len(), MAX_DETAIL_LEN);

        // a cut landing on a space must not leave a trailing blank
        let cleaned = sanitize_text(&text("abcd efgh"), DEFAULT_DETAIL, 5);
        assert_eq!(cleaned, "abcd");
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let inputs = [
            "é leading non-ascii",
            "  lots   of\tspace  ",
            "abcd efgh ijkl",
            "",
            "\u{1b}[31mred\u{1b}[0m",
        ];
        for input in inputs {
            for max in [5, 9, MAX_DETAIL_LEN] {
                let once = sanitize_text(&text(input), DEFAULT_DETAIL, max);
                let twice = sanitize_text(&text(&once), DEFAULT_DETAIL, max);
                assert_eq!(once, twice, "input {:?} max {}", input, max);
                assert!(!once.is_empty());
                assert!(once.len() <= max);
            }
        }
    }

    #[test]
    fn test_numbers() {
        assert_eq!(coerce_number("Saldo ($)", &CellValue::Empty), Ok(0.0));
        assert_eq!(coerce_number("Saldo ($)", &text("")), Ok(0.0));
        assert_eq!(coerce_number("Saldo ($)", &CellValue::Number(f64::NAN)), Ok(0.0));
        assert_eq!(coerce_number("Saldo ($)", &CellValue::Number(-12.5)), Ok(-12.5));
        assert_eq!(coerce_number("Saldo ($)", &text(" 1500.75 ")), Ok(1500.75));
    }

    #[test]
    fn test_number_rejections() {
        assert_eq!(
            coerce_number("Monto cargo ($)", &text("abc")),
            Err(SkipReason::InvalidNumeric {
                field: "Monto cargo ($)".to_string(),
                value: "abc".to_string(),
            })
        );
        assert!(coerce_number("Saldo ($)", &text("inf")).is_err());
        assert!(coerce_number("Saldo ($)", &CellValue::Bool(true)).is_err());
    }
}
