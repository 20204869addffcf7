//! Variable-precision E2B timestamp normalization.
//!
//! E2B reports carry timestamps as digit strings of varying precision:
//! `YYYY`, `YYYYMM`, or `YYYYMMDD` (longer strings carry a time suffix
//! that is ignored here). Each value is normalized into two parallel
//! representations:
//!
//! - a display string (`15-Jun-2023`, `Jun-2023`, `2023`), and
//! - a comparable [`NaiveDate`], where partial dates are rounded **up**
//!   to their latest plausible instant (month -> last calendar day,
//!   year -> Dec 31).
//!
//! Rounding up is the conservative policy for launch-timeline checks:
//! an imprecise date is only flagged as "before launch" when even its
//! latest possible reading precedes the launch date.
//!
//! Parsing never fails; unparseable input yields an empty value.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Precision of a parsed E2B timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DatePrecision {
    Year,
    Month,
    Day,
}

/// A normalized E2B date: display form plus comparable calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct E2bDate {
    /// Human-readable form: `DD-Mon-YYYY`, `Mon-YYYY`, `YYYY`, or empty.
    pub display: String,
    /// Comparable date with partial precision rounded up.
    pub comparable: Option<NaiveDate>,
    /// Precision of the source value, if it parsed at all.
    pub precision: Option<DatePrecision>,
}

impl E2bDate {
    /// An absent date (empty input or parse failure).
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when the source value yielded no usable date.
    pub fn is_empty(&self) -> bool {
        self.comparable.is_none()
    }
}

impl fmt::Display for E2bDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display)
    }
}

/// Parses a raw E2B timestamp string into an [`E2bDate`].
///
/// Non-digit separators are tolerated and stripped before precision is
/// judged by digit count. Invalid calendar dates (e.g. month 13) fall
/// back to the empty value rather than erroring.
///
/// # Examples
///
/// ```
/// use icsr_model::datetime::parse_e2b_date;
///
/// let full = parse_e2b_date("20230615");
/// assert_eq!(full.display, "15-Jun-2023");
///
/// let month = parse_e2b_date("202306");
/// assert_eq!(month.display, "Jun-2023");
/// // rounded up to the last day of June
/// assert_eq!(month.comparable.map(|d| d.to_string()), Some("2023-06-30".into()));
///
/// assert!(parse_e2b_date("n/a").is_empty());
/// ```
pub fn parse_e2b_date(raw: &str) -> E2bDate {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();

    match digits.len() {
        0..=3 | 5 | 7 => E2bDate::empty(),
        4 => parse_year(&digits),
        6 => parse_year_month(&digits),
        // 8 or more: date plus an optional time suffix we do not need
        _ => parse_full_date(&digits[..8]),
    }
}

fn parse_year(digits: &str) -> E2bDate {
    let Ok(year) = digits.parse::<i32>() else {
        return E2bDate::empty();
    };
    let Some(date) = NaiveDate::from_ymd_opt(year, 12, 31) else {
        return E2bDate::empty();
    };
    E2bDate {
        display: digits.to_string(),
        comparable: Some(date),
        precision: Some(DatePrecision::Year),
    }
}

fn parse_year_month(digits: &str) -> E2bDate {
    let (Ok(year), Ok(month)) = (digits[..4].parse::<i32>(), digits[4..6].parse::<u32>()) else {
        return E2bDate::empty();
    };
    let Some(date) = last_day_of_month(year, month) else {
        return E2bDate::empty();
    };
    E2bDate {
        display: date.format("%b-%Y").to_string(),
        comparable: Some(date),
        precision: Some(DatePrecision::Month),
    }
}

fn parse_full_date(digits: &str) -> E2bDate {
    let (Ok(year), Ok(month), Ok(day)) = (
        digits[..4].parse::<i32>(),
        digits[4..6].parse::<u32>(),
        digits[6..8].parse::<u32>(),
    ) else {
        return E2bDate::empty();
    };
    let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
        return E2bDate::empty();
    };
    E2bDate {
        display: date.format("%d-%b-%Y").to_string(),
        comparable: Some(date),
        precision: Some(DatePrecision::Day),
    }
}

/// Returns the last calendar day of the given month.
fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_date_parses_exactly() {
        let d = parse_e2b_date("20230615");
        assert_eq!(d.display, "15-Jun-2023");
        assert_eq!(d.comparable, NaiveDate::from_ymd_opt(2023, 6, 15));
        assert_eq!(d.precision, Some(DatePrecision::Day));
    }

    #[test]
    fn year_month_rounds_up_to_last_day() {
        let d = parse_e2b_date("202306");
        assert_eq!(d.display, "Jun-2023");
        assert_eq!(d.comparable, NaiveDate::from_ymd_opt(2023, 6, 30));
        assert_eq!(d.precision, Some(DatePrecision::Month));
    }

    #[test]
    fn february_leap_year_rounds_to_29() {
        let d = parse_e2b_date("202402");
        assert_eq!(d.comparable, NaiveDate::from_ymd_opt(2024, 2, 29));
    }

    #[test]
    fn december_rounds_within_year() {
        let d = parse_e2b_date("202312");
        assert_eq!(d.comparable, NaiveDate::from_ymd_opt(2023, 12, 31));
    }

    #[test]
    fn year_only_rounds_to_dec_31() {
        let d = parse_e2b_date("2023");
        assert_eq!(d.display, "2023");
        assert_eq!(d.comparable, NaiveDate::from_ymd_opt(2023, 12, 31));
        assert_eq!(d.precision, Some(DatePrecision::Year));
    }

    #[test]
    fn empty_and_garbage_yield_empty() {
        assert!(parse_e2b_date("").is_empty());
        assert!(parse_e2b_date("unknown").is_empty());
        assert!(parse_e2b_date("202").is_empty());
        assert!(parse_e2b_date("2023131").is_empty());
    }

    #[test]
    fn invalid_calendar_date_yields_empty() {
        assert!(parse_e2b_date("20231301").is_empty());
        assert!(parse_e2b_date("20230230").is_empty());
    }

    #[test]
    fn separators_are_tolerated() {
        let d = parse_e2b_date("2023-06-15");
        assert_eq!(d.display, "15-Jun-2023");
    }

    #[test]
    fn time_suffix_is_ignored() {
        let d = parse_e2b_date("20230615123000");
        assert_eq!(d.display, "15-Jun-2023");
        assert_eq!(d.comparable, NaiveDate::from_ymd_opt(2023, 6, 15));
    }
}
