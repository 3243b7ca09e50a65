//! Conversion between calendar dates and the `YYYY-MM-DD` form used in todo lines.

use crate::error::{MagodoError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const DATE_FMT: &str = "%Y-%m-%d";

/// Regex fragment matching a date token as the grammar sees it.
///
/// The codec is stricter than this pattern (it checks the calendar), so a
/// matched token can still fail to decode.
pub const RE_DATE: &str = r"[1-9][0-9]{3}-[0-1][0-9]-[0-3][0-9]";

/// Parses a `YYYY-MM-DD` string.
///
/// The year must be four digits and at least 1000; month and day must be two
/// digits each. Anything else (including trailing text) is an
/// [`MagodoError::InvalidDate`].
pub fn to_date(text: &str) -> Result<NaiveDate> {
    let invalid = || MagodoError::InvalidDate(text.to_string());

    let bytes = text.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes[0] != b'0'
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !well_formed {
        return Err(invalid());
    }

    NaiveDate::parse_from_str(text, DATE_FMT).map_err(|_| invalid())
}

/// Formats a date as exactly ten characters, `YYYY-MM-DD`.
pub fn from_date(date: NaiveDate) -> String {
    date.format(DATE_FMT).to_string()
}

/// An inclusive range of dates. A range without an end covers a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn day(date: NaiveDate) -> Self {
        Self::new(date, None)
    }

    /// Builds a range from `YYYY-MM-DD` strings.
    pub fn from_strings(start: &str, end: Option<&str>) -> Result<Self> {
        let start = to_date(start)?;
        let end = end.map(to_date).transpose()?;
        Ok(Self::new(start, end))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end.unwrap_or(self.start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_to_date() {
        assert_eq!(to_date("2022-01-10").unwrap(), date(2022, 1, 10));
        assert_eq!(to_date("1000-12-31").unwrap(), date(1000, 12, 31));
    }

    #[test]
    fn test_to_date_rejects_bad_shapes() {
        for text in [
            "",
            "2022-1-10",
            "22-01-10",
            "0999-01-10",
            "2022-01-10x",
            "2022/01/10",
            "2022-13-01",
            "2022-02-30",
            " 2022-01-10",
        ] {
            assert!(
                matches!(to_date(text), Err(MagodoError::InvalidDate(_))),
                "{text:?} should not decode"
            );
        }
    }

    #[test]
    fn test_from_date() {
        assert_eq!(from_date(date(2022, 3, 4)), "2022-03-04");
        assert_eq!(from_date(date(1999, 12, 31)).len(), 10);
    }

    #[test]
    fn test_date_range_contains() {
        let range = DateRange::from_strings("2022-01-01", Some("2022-01-31")).unwrap();
        assert!(range.contains(date(2022, 1, 1)));
        assert!(range.contains(date(2022, 1, 31)));
        assert!(!range.contains(date(2022, 2, 1)));

        let single = DateRange::day(date(2022, 1, 5));
        assert!(single.contains(date(2022, 1, 5)));
        assert!(!single.contains(date(2022, 1, 6)));
    }
}
