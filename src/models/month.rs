//! Calendar month values and the global month filter.

use core::str::FromStr;

use chrono::{Datelike as _, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A calendar year and month, rendered as `YYYY-MM`.
///
/// Internally anchored on the first day of the month so every value is a
/// real calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct YearMonth {
    /// First day of the month.
    first: NaiveDate,
}

impl YearMonth {
    /// Creates a year-month from a 1-indexed month number.
    ///
    /// Returns `None` when `month` is outside `1..=12` or the year is out
    /// of range for the calendar.
    #[inline]
    #[must_use]
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|first| Self { first })
    }

    /// Returns the month containing `date`.
    #[inline]
    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        Self {
            first: date.with_day(1).unwrap_or(date),
        }
    }

    /// Calendar year.
    #[inline]
    #[must_use]
    pub fn year(self) -> i32 {
        self.first.year()
    }

    /// 1-indexed month number.
    #[inline]
    #[must_use]
    pub fn month(self) -> u32 {
        self.first.month()
    }

    /// First day of the month.
    #[inline]
    #[must_use]
    pub const fn first_day(self) -> NaiveDate {
        self.first
    }

    /// Number of days in the month, leap years included.
    #[inline]
    #[must_use]
    pub fn days_in_month(self) -> u32 {
        self.first
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .map_or(28, |last| last.day())
    }

    /// Returns `true` if `date` falls within this month.
    #[inline]
    #[must_use]
    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    /// Long English label, e.g. `January 2024`.
    #[inline]
    #[must_use]
    pub fn long_label(self) -> String {
        self.first.format("%B %Y").to_string()
    }
}

impl core::fmt::Display for YearMonth {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for YearMonth {
    type Err = ValidationError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidMonth {
            input: s.to_owned(),
        };
        let (year_part, month_part) = s.trim().split_once('-').ok_or_else(invalid)?;
        if year_part.len() != 4 || month_part.len() != 2 {
            return Err(invalid());
        }
        let year = year_part.parse::<i32>().map_err(|_err| invalid())?;
        let month = month_part.parse::<u32>().map_err(|_err| invalid())?;
        Self::new(year, month).ok_or_else(invalid)
    }
}

impl From<YearMonth> for String {
    #[inline]
    fn from(value: YearMonth) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for YearMonth {
    type Error = ValidationError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Month selector shared by the list, summary, stats, charts and export.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MonthFilter {
    /// No month restriction.
    #[default]
    All,
    /// Restrict to one calendar month.
    Month(YearMonth),
}

impl MonthFilter {
    /// Returns `true` if `date` passes the filter.
    #[inline]
    #[must_use]
    pub fn matches(self, date: NaiveDate) -> bool {
        match self {
            Self::All => true,
            Self::Month(month) => month.contains(date),
        }
    }

    /// Returns the selected month, if any.
    #[inline]
    #[must_use]
    pub const fn month(self) -> Option<YearMonth> {
        match self {
            Self::All => None,
            Self::Month(month) => Some(month),
        }
    }
}

impl FromStr for MonthFilter {
    type Err = ValidationError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            s.parse().map(Self::Month)
        }
    }
}

impl core::fmt::Display for MonthFilter {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match *self {
            Self::All => f.write_str("all"),
            Self::Month(month) => core::fmt::Display::fmt(&month, f),
        }
    }
}
