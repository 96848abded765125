use std::fmt;

use chrono::{Datelike, NaiveDate, Utc};
use serde::Serialize;

use crate::error::ValidationError;

pub const INVALID_MONTH: &str = "Invalid month format. Please use m/yyyy (e.g., 8/2025).";

/// Calendar year-month used to group transactions and goals.
///
/// Stored as `yyyy-mm`, shown to users as `m/yyyy` without a leading zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if !(1..=12).contains(&month) || !(0..=9999).contains(&year) {
            return None;
        }
        Some(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn current() -> Self {
        Self::of(Utc::now().date_naive())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Parses user input in `m/yyyy` form, `mm/yyyy` is accepted as well.
    pub fn parse_display(s: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::new(INVALID_MONTH);

        let (month, year) = s.trim().split_once('/').ok_or_else(invalid)?;
        if month.is_empty() || month.len() > 2 || year.len() != 4 {
            return Err(invalid());
        }
        if !month.bytes().chain(year.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let month: u32 = month.parse().map_err(|_| invalid())?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        Self::new(year, month).ok_or_else(invalid)
    }

    /// Parses the storage form `yyyy-mm`.
    pub fn parse_key(s: &str) -> Option<Self> {
        let (year, month) = s.split_once('-')?;
        if year.len() != 4 || month.len() != 2 {
            return None;
        }
        Self::new(year.parse().ok()?, month.parse().ok()?)
    }

    pub fn key(&self) -> String {
        self.to_string()
    }

    pub fn display(&self) -> String {
        format!("{}/{}", self.month, self.year)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for MonthKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_form_round_trips_through_key() {
        let m = MonthKey::parse_display("8/2025").unwrap();
        assert_eq!(m.key(), "2025-08");

        let back = MonthKey::parse_key("2025-08").unwrap();
        assert_eq!(back, m);
        assert_eq!(back.display(), "8/2025");
    }

    #[test]
    fn accepts_padded_month_and_whitespace() {
        let m = MonthKey::parse_display(" 08/2025 ").unwrap();
        assert_eq!(m.key(), "2025-08");
        assert_eq!(MonthKey::parse_display("12/1999").unwrap().key(), "1999-12");
    }

    #[test]
    fn rejects_malformed_months() {
        for input in ["13/2025", "0/2025", "August", "", "8/25", "8-2025", "/2025", "8/20x5", "+8/2025"] {
            let err = MonthKey::parse_display(input).unwrap_err();
            assert_eq!(err.to_string(), INVALID_MONTH, "input {input:?}");
        }
    }

    #[test]
    fn key_of_date() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        assert_eq!(MonthKey::of(date).key(), "2025-01");
        assert_eq!(MonthKey::of(date).display(), "1/2025");
    }

    #[test]
    fn parse_key_rejects_garbage() {
        assert!(MonthKey::parse_key("2025-13").is_none());
        assert!(MonthKey::parse_key("2025-8").is_none());
        assert!(MonthKey::parse_key("8/2025").is_none());
    }
}
