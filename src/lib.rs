//! A discrete, content-derived timeline.
//!
//! The crate keeps a sorted set of *defined dates* (days for which content
//! exists), resolves symbolic references such as `"current"` or `"first"`
//! against it, and answers inclusive overlap questions about date ranges.
//! Every in-process cache lives in an explicit state object scoped to one
//! unit of work; persistent and per-visitor state are reached through the
//! collaborator traits in [`store`] and [`content`].

mod config;
pub mod content;
mod consts;
mod current_date;
mod default_date;
mod defined_dates;
mod error;
mod prelude;
mod range;
mod resolver;
pub mod store;
mod timeline;
mod types;
mod validation;

#[cfg(test)]
mod test_utils;

pub use config::TimelineConfig;
pub use consts::*;
pub use current_date::CurrentDate;
pub use default_date::DefaultDate;
pub use defined_dates::{DefinedDates, DefinedDatesSnapshot};
pub use error::{InferenceError, Result, StoreError, TimelineError, TrackerError};
pub use range::{DateRange, RangeError};
pub use resolver::{DateRef, DateResolver, Keyword};
pub use timeline::{ContentEvent, Timeline};
pub use types::{Day, Month, Year, is_leap_year};
use types::days_in_month;
pub use validation::{DatedEntity, Violation};

use crate::consts::STORAGE_WIDTHS;
use crate::prelude::*;
use std::str::FromStr;

/// A single calendar day with no time component.
///
/// Only constructible from the storage format `YYYY-MM-DD`; the derived
/// ordering is calendar order because fields compare year, month, day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{}-{}-{}", year, month, day)]
pub struct TimelineDate {
    year: Year,
    month: Month,
    day: Day,
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ParseError {
    #[display(fmt = "Invalid date format (expected YYYY-MM-DD): {_0:?}")]
    InvalidFormat(String),
    #[display(fmt = "Invalid year: {} (must be {}-{})", "_0", MIN_YEAR, MAX_YEAR)]
    InvalidYear(u16),
    #[display(fmt = "Invalid month: {} (must be 1-{})", "_0", MAX_MONTH)]
    InvalidMonth(u8),
    #[display(fmt = "Invalid day {day} for month {year:04}-{month:02}")]
    InvalidDay { year: u16, month: u8, day: u8 },
    #[display(fmt = "Empty date string")]
    EmptyInput,
}

impl std::error::Error for ParseError {}

/// Named presentation styles a [`TimelineDate`] can be rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DateFormat {
    /// `YYYY-MM-DD`, the canonical persisted form
    Storage,
    /// `YYYY-MM-DD`, as used by HTML date inputs
    Html,
    /// e.g. "October 1st 2049"
    #[default]
    Long,
    /// `YYYY/MM/DD`
    Short,
}

impl FromStr for DateFormat {
    type Err = TimelineError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "storage" => Ok(Self::Storage),
            "html" => Ok(Self::Html),
            "long" => Ok(Self::Long),
            "short" => Ok(Self::Short),
            other => Err(TimelineError::UnsupportedFormat(other.to_owned())),
        }
    }
}

impl TimelineDate {
    /// Creates a date from numeric components, validating each one.
    ///
    /// # Errors
    /// Returns the `ParseError` of the first component that is out of range.
    pub fn from_ymd(year: u16, month: u8, day: u8) -> std::result::Result<Self, ParseError> {
        let year = Year::new(year)?;
        let month = Month::new(month)?;
        let day = Day::new(day, year, month)?;
        Ok(Self { year, month, day })
    }

    /// Parses a storage-format string. Equivalent to `str::parse`.
    ///
    /// # Errors
    /// Returns a `ParseError` if `s` is not a valid `YYYY-MM-DD` calendar date.
    pub fn parse(s: &str) -> std::result::Result<Self, ParseError> {
        s.parse()
    }

    pub const fn year(&self) -> Year {
        self.year
    }

    pub const fn month(&self) -> Month {
        self.month
    }

    pub const fn day(&self) -> Day {
        self.day
    }

    /// The storage-format string, `YYYY-MM-DD`
    pub fn to_storage(&self) -> String {
        self.to_string()
    }

    /// Renders the date in the given presentation style.
    pub fn format(&self, style: DateFormat) -> String {
        match style {
            DateFormat::Storage | DateFormat::Html => self.to_string(),
            DateFormat::Long => format!(
                "{} {}{} {}",
                self.month.name(),
                self.day.get(),
                self.day.ordinal_suffix(),
                self.year.get()
            ),
            DateFormat::Short => format!(
                "{}{SHORT_SEPARATOR}{}{SHORT_SEPARATOR}{}",
                self.year, self.month, self.day
            ),
        }
    }

    /// Renders the date in a style named by keyword (`storage`, `html`,
    /// `long` or `short`).
    ///
    /// # Errors
    /// Returns `TimelineError::UnsupportedFormat` for any other keyword.
    pub fn format_named(&self, style: &str) -> Result<String> {
        Ok(self.format(style.parse()?))
    }

    /// The following calendar day, or `None` past `MAX_YEAR`.
    ///
    /// Ranges treat touching endpoints as overlapping; shifting one endpoint
    /// with this gives strict adjacency.
    pub fn next_day(&self) -> Option<Self> {
        let (y, m, d) = (self.year.get(), self.month.get(), self.day.get());
        if d < days_in_month(y, m) {
            Self::from_ymd(y, m, d + 1).ok()
        } else if m < MAX_MONTH {
            Self::from_ymd(y, m + 1, MIN_DAY).ok()
        } else {
            Self::from_ymd(y.checked_add(1)?, 1, MIN_DAY).ok()
        }
    }

    /// The preceding calendar day, or `None` before year 1.
    pub fn previous_day(&self) -> Option<Self> {
        let (y, m, d) = (self.year.get(), self.month.get(), self.day.get());
        if d > MIN_DAY {
            Self::from_ymd(y, m, d - 1).ok()
        } else if m > 1 {
            Self::from_ymd(y, m - 1, days_in_month(y, m - 1)).ok()
        } else {
            Self::from_ymd(y.checked_sub(1)?, MAX_MONTH, days_in_month(y - 1, MAX_MONTH)).ok()
        }
    }

    /// Parses one fixed-width, all-digit component of the storage format.
    fn parse_component(part: &str, width: usize, input: &str) -> std::result::Result<u16, ParseError> {
        if part.len() != width || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseError::InvalidFormat(input.to_owned()));
        }
        part.parse::<u16>()
            .map_err(|_| ParseError::InvalidFormat(input.to_owned()))
    }
}

impl FromStr for TimelineDate {
    type Err = ParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ParseError::EmptyInput);
        }

        let parts: Vec<&str> = s.split(STORAGE_SEPARATOR).collect();
        let [year, month, day] = parts.as_slice() else {
            return Err(ParseError::InvalidFormat(s.to_owned()));
        };
        let [year_width, month_width, day_width] = STORAGE_WIDTHS;

        let year = Self::parse_component(year, year_width, s)?;
        let month = Self::parse_component(month, month_width, s)?;
        let day = Self::parse_component(day, day_width, s)?;

        // Two-digit components always fit in a u8.
        Self::from_ymd(year, month as u8, day as u8)
    }
}

impl TryFrom<&str> for TimelineDate {
    type Error = ParseError;

    fn try_from(value: &str) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl serde::Serialize for TimelineDate {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for TimelineDate {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
