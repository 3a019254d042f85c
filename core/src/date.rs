// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Calendar dates and user-chosen date ranges.

use std::cmp::{max, min};
use std::fmt;
use std::str::FromStr;

use jiff::civil;
use serde::de;
use sublime_rrule::WeekDay;

/// Earliest year a [`DateValue`] can hold.
pub const MIN_YEAR: i16 = -9999;

/// Latest year a [`DateValue`] can hold.
pub const MAX_YEAR: i16 = 9999;

/// How leap years are determined when validating dates.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum LeapYearRule {
    /// Every year divisible by four is a leap year, 1900 and 2100 included.
    #[default]
    Simplified,

    /// Proleptic Gregorian rule, a century is a leap year only when divisible by 400.
    Gregorian,
}

impl LeapYearRule {
    /// Whether `year` has a February 29th under this rule.
    #[must_use]
    pub const fn is_leap_year(self, year: i16) -> bool {
        match self {
            Self::Simplified => year % 4 == 0,
            Self::Gregorian => year % 4 == 0 && (year % 100 != 0 || year % 400 == 0),
        }
    }

    /// Number of days in a zero-based month, zero if the month is invalid.
    #[must_use]
    pub const fn days_in_month(self, year: i16, month: u8) -> u8 {
        match month {
            0 | 2 | 4 | 6 | 7 | 9 | 11 => 31,
            3 | 5 | 8 | 10 => 30,
            1 if self.is_leap_year(year) => 29,
            1 => 28,
            _ => 0,
        }
    }
}

/// Errors raised while building or parsing dates.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateError {
    /// The day does not exist in the month.
    #[error("day {day} is out of range for {year:04}-{m:02}, which has {max} days", m = .month + 1)]
    OutOfRangeDate {
        /// Year of the rejected date
        year: i16,
        /// Zero-based month of the rejected date
        month: u8,
        /// Rejected day
        day: u8,
        /// Number of days in the month
        max: u8,
    },

    /// The zero-based month is not within 0..=11.
    #[error("month {0} is out of range, expected 0..=11")]
    InvalidMonth(u8),

    /// The year is not within [`MIN_YEAR`]..=[`MAX_YEAR`].
    #[error("year {0} is out of range, expected {MIN_YEAR}..={MAX_YEAR}")]
    InvalidYear(i16),

    /// The date only exists under the simplified leap-year rule.
    #[error("{0} does not exist in the Gregorian calendar")]
    NotGregorian(DateValue),

    /// Text is not an ISO `YYYY-MM-DD` date.
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    Malformed(String),

    /// The earliest date is after the latest date.
    #[error("minimum date {min} is after maximum date {max}")]
    InvertedBounds {
        /// Earliest date
        min: DateValue,
        /// Latest date
        max: DateValue,
    },

    /// The month lies outside the selectable bounds.
    #[error("{year:04}-{m:02} is outside the selectable dates", m = .month + 1)]
    PageOutsideBounds {
        /// Year of the month
        year: i16,
        /// Zero-based month
        month: u8,
    },
}

/// A calendar date with a zero-based month.
///
/// Values are ordered by `(year, month, day)` and always name a day that
/// exists under the leap-year rule they were built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateValue {
    year: i16,
    month: u8,
    day: u8,
}

impl DateValue {
    /// Build a date under the default [`LeapYearRule`].
    ///
    /// ## Errors
    ///
    /// Fails when the year, the month or the day is out of range. A day past
    /// the end of the month is never clamped.
    pub fn new(year: i16, month: u8, day: u8) -> Result<Self, DateError> {
        Self::with_rule(year, month, day, LeapYearRule::default())
    }

    /// Build a date under an explicit leap-year rule.
    ///
    /// ## Errors
    ///
    /// See [`DateValue::new`].
    pub fn with_rule(year: i16, month: u8, day: u8, rule: LeapYearRule) -> Result<Self, DateError> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(DateError::InvalidYear(year));
        }
        if month > 11 {
            return Err(DateError::InvalidMonth(month));
        }

        let max = rule.days_in_month(year, month);
        if day == 0 || day > max {
            return Err(DateError::OutOfRangeDate {
                year,
                month,
                day,
                max,
            });
        }
        Ok(Self { year, month, day })
    }

    #[must_use]
    pub const fn year(self) -> i16 {
        self.year
    }

    /// Zero-based month, January = 0.
    #[must_use]
    pub const fn month(self) -> u8 {
        self.month
    }

    #[must_use]
    pub const fn day(self) -> u8 {
        self.day
    }

    /// Whether the date exists under `rule`.
    #[must_use]
    pub const fn is_valid_under(self, rule: LeapYearRule) -> bool {
        self.day <= rule.days_in_month(self.year, self.month)
    }

    /// Day of the week.
    #[must_use]
    pub fn weekday(self) -> WeekDay {
        let (date, extra) = self.nearest_civil();
        let offset = date.weekday().to_sunday_zero_offset();
        let index = (usize::try_from(offset).unwrap_or_default() + usize::from(extra)) % 7;
        WeekDay::from_index(index).unwrap_or(WeekDay::Sunday)
    }

    /// Convert to a Gregorian date.
    ///
    /// ## Errors
    ///
    /// Fails for February 29th of a year that is a leap year only under the
    /// simplified rule, e.g. 1900-02-29.
    pub fn to_civil(self) -> Result<civil::Date, DateError> {
        match self.nearest_civil() {
            (date, 0) => Ok(date),
            _ => Err(DateError::NotGregorian(self)),
        }
    }

    /// Months since year zero, used to order month pages.
    pub(crate) const fn month_key(self) -> i32 {
        month_key(self.year, self.month)
    }

    /// The closest Gregorian date on or before `self`, and the distance in days.
    fn nearest_civil(self) -> (civil::Date, u8) {
        let day = min(
            self.day,
            LeapYearRule::Gregorian.days_in_month(self.year, self.month),
        );
        #[allow(clippy::cast_possible_wrap)]
        let date = civil::date(self.year, self.month as i8 + 1, day as i8);
        (date, self.day - day)
    }
}

pub(crate) const fn month_key(year: i16, month: u8) -> i32 {
    year as i32 * 12 + month as i32
}

impl From<civil::Date> for DateValue {
    #[allow(clippy::cast_sign_loss)]
    fn from(date: civil::Date) -> Self {
        Self {
            year: date.year(),
            month: (date.month() - 1) as u8,
            day: date.day() as u8,
        }
    }
}

impl fmt::Display for DateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.year < 0 {
            write!(f, "-{:04}", -self.year)?;
        } else {
            write!(f, "{:04}", self.year)?;
        }
        write!(f, "-{:02}-{:02}", self.month + 1, self.day)
    }
}

impl FromStr for DateValue {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || DateError::Malformed(s.to_string());
        let (negative, rest) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };

        let mut parts = rest.splitn(3, '-');
        let (Some(year), Some(month), Some(day)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(malformed());
        };

        let digits = |part: &str, len: usize| part.len() == len || (len == 4 && part.len() > 4);
        let all_digits = [year, month, day]
            .iter()
            .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()));
        if !all_digits || !digits(year, 4) || !digits(month, 2) || !digits(day, 2) {
            return Err(malformed());
        }

        let year: i16 = year.parse().map_err(|_| malformed())?;
        let month: u8 = month.parse().map_err(|_| malformed())?;
        let day: u8 = day.parse().map_err(|_| malformed())?;
        let month = month.checked_sub(1).ok_or_else(malformed)?;
        Self::new(if negative { -year } else { year }, month, day)
    }
}

impl serde::Serialize for DateValue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for DateValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct DateVisitor;

        impl de::Visitor<'_> for DateVisitor {
            type Value = DateValue;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str(r#"a date string like "2024-02-29""#)
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                value.parse().map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_str(DateVisitor)
    }
}

/// Inclusive range of selectable dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateBounds {
    min: DateValue,
    max: DateValue,
}

impl DateBounds {
    /// ## Errors
    ///
    /// Fails when `min` is after `max`.
    pub fn new(min: DateValue, max: DateValue) -> Result<Self, DateError> {
        if min > max {
            return Err(DateError::InvertedBounds { min, max });
        }
        Ok(Self { min, max })
    }

    #[must_use]
    pub const fn min(&self) -> DateValue {
        self.min
    }

    #[must_use]
    pub const fn max(&self) -> DateValue {
        self.max
    }

    #[must_use]
    pub fn contains(&self, date: DateValue) -> bool {
        (self.min..=self.max).contains(&date)
    }
}

impl Default for DateBounds {
    /// 1900-01-01 to 2100-12-31.
    fn default() -> Self {
        Self {
            min: DateValue {
                year: 1900,
                month: 0,
                day: 1,
            },
            max: DateValue {
                year: 2100,
                month: 11,
                day: 31,
            },
        }
    }
}

/// Whether a [`DateRange`] covers one day or several.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "UPPERCASE")]
pub enum RangeKind {
    /// Start and end are the same day
    Single,
    /// Start is before end
    Range,
}

/// Two dates in the order the user picked them.
///
/// The range is a plain `Copy` value, so every component boundary receives
/// its own copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    first: DateValue,
    second: DateValue,
}

impl DateRange {
    #[must_use]
    pub const fn new(first: DateValue, second: DateValue) -> Self {
        Self { first, second }
    }

    /// A range of one day.
    #[must_use]
    pub const fn single(date: DateValue) -> Self {
        Self::new(date, date)
    }

    /// The date picked first, the anchor of a drag.
    #[must_use]
    pub const fn first(&self) -> DateValue {
        self.first
    }

    /// The date picked last.
    #[must_use]
    pub const fn second(&self) -> DateValue {
        self.second
    }

    /// The earlier of both dates.
    #[must_use]
    pub fn start(&self) -> DateValue {
        min(self.first, self.second)
    }

    /// The later of both dates.
    #[must_use]
    pub fn end(&self) -> DateValue {
        max(self.first, self.second)
    }

    #[must_use]
    pub fn kind(&self) -> RangeKind {
        if self.first == self.second {
            RangeKind::Single
        } else {
            RangeKind::Range
        }
    }

    /// Whether `date` lies between start and end, both inclusive.
    #[must_use]
    pub fn contains(&self, date: DateValue) -> bool {
        (self.start()..=self.end()).contains(&date)
    }

    /// Same anchor, new second date.
    #[must_use]
    pub const fn with_second(self, second: DateValue) -> Self {
        Self::new(self.first, second)
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            RangeKind::Single => write!(f, "{}", self.first),
            RangeKind::Range => write!(f, "{}..{}", self.start(), self.end()),
        }
    }
}

impl FromStr for DateRange {
    type Err = DateError;

    /// Parse `DATE` or `FIRST..SECOND`, keeping the given order.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once("..") {
            Some((first, second)) => Ok(Self::new(first.trim().parse()?, second.trim().parse()?)),
            None => s.trim().parse().map(Self::single),
        }
    }
}
