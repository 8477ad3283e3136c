//! Calendar types for monthly billing
//!
//! This module provides the date arithmetic billing depends on:
//! - Billing months: a calendar month identified by its first day
//! - Date ranges: inclusive, optionally open-ended spans of days
//! - Timezones: resolving "today" for the billing jurisdiction

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// ISO date format used for every date on the wire
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors related to temporal operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Invalid period: start {start} must not be after end {end}")]
    InvalidPeriod {
        start: String,
        end: String,
    },

    #[error("Not the first day of a month: {0}")]
    NotFirstOfMonth(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),
}

/// Returns true for Gregorian leap years
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of calendar days in the given month (28-31)
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 31,
    }
}

/// Parses a `YYYY-MM-DD` string
pub fn parse_iso_date(value: &str) -> Result<NaiveDate, TemporalError> {
    NaiveDate::parse_from_str(value.trim(), ISO_DATE_FORMAT)
        .map_err(|_| TemporalError::InvalidDate(value.to_string()))
}

/// A calendar month, identified by its first day
///
/// Serialized as the ISO date of the first day (`2025-03-01`). Construction
/// rejects any date that is not the first of its month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BillingMonth(NaiveDate);

impl BillingMonth {
    /// Creates a billing month from the first day of the month
    pub fn new(first_day: NaiveDate) -> Result<Self, TemporalError> {
        if first_day.day() != 1 {
            return Err(TemporalError::NotFirstOfMonth(first_day.to_string()));
        }
        Ok(Self(first_day))
    }

    /// Creates a billing month from a year and 1-based month number
    pub fn from_ymd(year: i32, month: u32) -> Result<Self, TemporalError> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(Self)
            .ok_or_else(|| TemporalError::InvalidDate(format!("{year}-{month:02}")))
    }

    /// Returns the month that contains the given date
    pub fn containing(date: NaiveDate) -> Self {
        Self(date - Days::new(u64::from(date.day0())))
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// First calendar day of the month
    pub fn first_day(&self) -> NaiveDate {
        self.0
    }

    /// Last calendar day of the month
    pub fn last_day(&self) -> NaiveDate {
        self.0 + Days::new(u64::from(self.days() - 1))
    }

    /// Number of calendar days in the month, leap-aware
    pub fn days(&self) -> u32 {
        days_in_month(self.year(), self.month())
    }

    /// Human-readable label such as `"March 2025"`
    pub fn label(&self) -> String {
        self.0.format("%B %Y").to_string()
    }

    /// The month following this one
    pub fn next(&self) -> Option<Self> {
        self.0.checked_add_months(Months::new(1)).map(Self)
    }

    /// The month preceding this one
    pub fn previous(&self) -> Option<Self> {
        self.0.checked_sub_months(Months::new(1)).map(Self)
    }

    /// The inclusive range covering every day of the month
    pub fn range(&self) -> DateRange {
        DateRange {
            start: self.first_day(),
            end: Some(self.last_day()),
        }
    }
}

impl fmt::Display for BillingMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(ISO_DATE_FORMAT))
    }
}

impl FromStr for BillingMonth {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BillingMonth::new(parse_iso_date(s)?)
    }
}

impl Serialize for BillingMonth {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BillingMonth {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// An inclusive span of calendar days
///
/// `end` is the last day included; `None` means the range never ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// Creates a range, rejecting an end before the start
    pub fn new(start: NaiveDate, end: Option<NaiveDate>) -> Result<Self, TemporalError> {
        if let Some(end) = end {
            if end < start {
                return Err(TemporalError::InvalidPeriod {
                    start: start.to_string(),
                    end: end.to_string(),
                });
            }
        }
        Ok(Self { start, end })
    }

    /// Creates a range that starts on `start` and never ends
    pub fn starting(start: NaiveDate) -> Self {
        Self { start, end: None }
    }

    /// Creates a bounded range
    pub fn bounded(start: NaiveDate, end: NaiveDate) -> Result<Self, TemporalError> {
        Self::new(start, Some(end))
    }

    /// A range covering exactly one day
    pub fn single_day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: Some(date),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.end.is_none()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && self.end.map_or(true, |e| date <= e)
    }

    /// Inclusive day count, `None` when unbounded
    pub fn days(&self) -> Option<u32> {
        self.end.map(|end| {
            let span = (end - self.start).num_days() + 1;
            u32::try_from(span).unwrap_or(u32::MAX)
        })
    }

    /// The days shared by both ranges, `None` when they are disjoint
    pub fn intersection(&self, other: &DateRange) -> Option<DateRange> {
        let start = self.start.max(other.start);
        let end = match (self.end, other.end) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (Some(a), None) | (None, Some(a)) => Some(a),
            (None, None) => None,
        };
        match end {
            Some(end) if end < start => None,
            _ => Some(DateRange { start, end }),
        }
    }

    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.intersection(other).is_some()
    }
}

/// Inclusive number of days two ranges share
///
/// Disjoint ranges share 0 days; `[d, d]` against `[d, d]` shares 1. When both
/// ranges are unbounded the overlap saturates at `u32::MAX`.
pub fn days_overlap(a: &DateRange, b: &DateRange) -> u32 {
    a.intersection(b)
        .map_or(0, |overlap| overlap.days().unwrap_or(u32::MAX))
}

/// Timezone of the billing jurisdiction
///
/// Wraps chrono_tz::Tz with custom serialization support.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timezone(pub Tz);

impl Timezone {
    pub fn new(tz: Tz) -> Self {
        Self(tz)
    }

    pub fn name(&self) -> &'static str {
        self.0.name()
    }

    /// Calendar date in this timezone at the given instant
    pub fn date_at(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.0).date_naive()
    }

    /// Current calendar date in this timezone
    pub fn today(&self) -> NaiveDate {
        self.date_at(Utc::now())
    }
}

impl Default for Timezone {
    fn default() -> Self {
        Self(chrono_tz::UTC)
    }
}

impl FromStr for Timezone {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tz::from_str(s.trim())
            .map(Timezone)
            .map_err(|_| TemporalError::InvalidTimezone(s.to_string()))
    }
}

impl Serialize for Timezone {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.0.name())
    }
}

impl<'de> Deserialize<'de> for Timezone {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
