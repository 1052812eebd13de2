use std::fmt;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// The reporting window for one month: day 1 through day 30, both inclusive.
///
/// The end is a fixed calendar offset (start plus 29 days), not the month's
/// true last day: February's "day 30" overflows into March, and 31-day
/// months end one day short.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cycle {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Cycle {
    /// Resolve a cycle from an optional `YYYY-MM` selector, falling back to
    /// the month of `today` when absent.
    pub fn for_month(token: Option<&str>, today: NaiveDate) -> Result<Self, InvalidMonth> {
        let (year, month) = match token {
            Some(token) => parse_month(token)?,
            None => (today.year(), today.month()),
        };
        let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or(InvalidMonth)?;
        let end = start + Duration::days(29);
        Ok(Self { start, end })
    }

    /// Whether a date falls inside the window.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

fn parse_month(token: &str) -> Result<(i32, u32), InvalidMonth> {
    let (year_str, month_str) = token.split_once('-').ok_or(InvalidMonth)?;
    if year_str.len() != 4
        || month_str.len() != 2
        || !year_str.chars().all(|c| c.is_ascii_digit())
        || !month_str.chars().all(|c| c.is_ascii_digit())
    {
        return Err(InvalidMonth);
    }
    let year = year_str.parse().map_err(|_| InvalidMonth)?;
    let month: u32 = month_str.parse().map_err(|_| InvalidMonth)?;
    if !(1..=12).contains(&month) {
        return Err(InvalidMonth);
    }
    Ok((year, month))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidMonth;

impl fmt::Display for InvalidMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "month selector must be YYYY-MM")
    }
}

impl std::error::Error for InvalidMonth {}
