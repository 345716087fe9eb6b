//! Calendar-date parsing and inclusive date ranges.
//!
//! Stores hand back dates in a few shapes: plain `YYYY-MM-DD`, RFC 3339
//! timestamps, and SQLite's `YYYY-MM-DD HH:MM:SS`. All of them are reduced to
//! the literal date portion; no timezone conversion happens here.

use std::fmt;

use chrono::{Datelike, NaiveDate};

use crate::types::ValidationError;

/// Parses the calendar date out of a date or timestamp string.
///
/// Returns `None` for empty strings and anything whose date portion is not a
/// valid `YYYY-MM-DD` date.
pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let date_part = trimmed
        .split(['T', ' '])
        .next()
        .unwrap_or(trimmed);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Formats a date as `YYYY-MM-DD`.
pub fn format_day(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// An inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Creates a range covering `start..=end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ValidationError> {
        if end < start {
            return Err(ValidationError::InvertedRange {
                start: format_day(start),
                end: format_day(end),
            });
        }
        Ok(Self { start, end })
    }

    /// A single-day range.
    pub const fn day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// The range covering every day of a calendar month (month is 1-12).
    pub fn month(year: i32, month: u32) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidMonth { year, month };
        let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        let next = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        }
        .ok_or_else(invalid)?;
        let end = next.pred_opt().ok_or_else(invalid)?;
        debug_assert_eq!(end.month(), month);
        Ok(Self { start, end })
    }

    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether `date` falls inside the range.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of calendar days in the range.
    pub fn len(&self) -> usize {
        usize::try_from((self.end - self.start).num_days() + 1).unwrap_or(0)
    }

    /// Always false: a range holds at least one day.
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Iterates every date in the range in ascending order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let end = self.end;
        self.start.iter_days().take_while(move |day| *day <= end)
    }

    /// The part of `start..=end` that overlaps this range, if any.
    pub fn clip(&self, start: NaiveDate, end: NaiveDate) -> Option<Self> {
        let start = start.max(self.start);
        let end = end.min(self.end);
        (start <= end).then_some(Self { start, end })
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", format_day(self.start), format_day(self.end))
    }
}
