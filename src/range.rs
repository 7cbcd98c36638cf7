use std::{cmp::Ordering, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{ParseError, RANGE_SEPARATOR, TimelineDate, prelude::*};

/// An inclusive span of whole days.
/// The start date must be less than or equal to the end date; equal dates
/// make a single-day range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display(fmt = "{start}/{end}")]
pub struct DateRange {
    start: TimelineDate,
    end: TimelineDate,
}

/// Error type for date range operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    /// Start date is after end date.
    #[error("The start date ({start}) cannot be after the end date ({end})")]
    InvalidRange { start: TimelineDate, end: TimelineDate },

    /// Error parsing one of the endpoints.
    #[error(transparent)]
    ParseError(#[from] ParseError),

    /// Invalid range format.
    #[error("Invalid range format: {0}")]
    InvalidFormat(String),
}

impl DateRange {
    /// Creates a new date range.
    ///
    /// # Errors
    /// Returns `RangeError::InvalidRange` if start > end.
    pub fn new(start: TimelineDate, end: TimelineDate) -> Result<Self, RangeError> {
        if start > end {
            return Err(RangeError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// A range covering exactly one day
    pub const fn single_day(date: TimelineDate) -> Self {
        Self { start: date, end: date }
    }

    pub const fn start(&self) -> TimelineDate {
        self.start
    }

    pub const fn end(&self) -> TimelineDate {
        self.end
    }

    /// Whether `date` falls within the range, both ends inclusive.
    pub fn overlaps_date(&self, date: &TimelineDate) -> bool {
        self.start <= *date && *date <= self.end
    }

    /// Whether the two ranges share at least one day.
    ///
    /// Touching ranges (one ends on the day the other starts) overlap. The
    /// relation is symmetric: `a.overlaps_with_range(&b) == b.overlaps_with_range(&a)`.
    pub fn overlaps_with_range(&self, other: &Self) -> bool {
        // The other range holds our start or our end...
        other.overlaps_date(&self.start)
            || other.overlaps_date(&self.end)
            // ...or we hold all of it.
            || (self.start <= other.start && self.end >= other.end)
    }
}

impl FromStr for DateRange {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let separator_count = s.matches(RANGE_SEPARATOR).count();

        match separator_count {
            0 => Err(RangeError::InvalidFormat(format!(
                "No range separator found (expected '{RANGE_SEPARATOR}'): {s}"
            ))),
            1 => {
                let (start, end) = s.split_once(RANGE_SEPARATOR).ok_or_else(|| {
                    RangeError::InvalidFormat(format!("Separator '{RANGE_SEPARATOR}' not found in {s}"))
                })?;
                Self::new(start.parse()?, end.parse()?)
            },
            _ => Err(RangeError::InvalidFormat(format!(
                "Too many '{RANGE_SEPARATOR}' separators: expected 1, found {separator_count}"
            ))),
        }
    }
}

impl PartialOrd for DateRange {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DateRange {
    fn cmp(&self, other: &Self) -> Ordering {
        self.start
            .cmp(&other.start)
            .then_with(|| self.end.cmp(&other.end))
    }
}

impl Serialize for DateRange {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for DateRange {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
