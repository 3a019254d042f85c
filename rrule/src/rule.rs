// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Recurrence rule value and its canonical text form.

use std::fmt::{self, Display};
use std::str::FromStr;

use crate::keyword::{
    KW_RRULE_BYDAY, KW_RRULE_BYHOUR, KW_RRULE_BYMINUTE, KW_RRULE_BYMONTH, KW_RRULE_BYMONTHDAY,
    KW_RRULE_BYSECOND, KW_RRULE_BYSETPOS, KW_RRULE_BYWEEKNO, KW_RRULE_BYYEARDAY, KW_RRULE_COUNT,
    KW_RRULE_FREQ, KW_RRULE_INTERVAL, KW_RRULE_UNTIL, KW_RRULE_WKST,
};
use crate::{ParseError, parse};

/// Recurrence rule as written in the `recur` grammar.
///
/// The value is purely syntactic: it holds every rule part the grammar
/// allows, whether or not a particular consumer can make sense of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceRule {
    /// Frequency of recurrence
    pub freq: Frequency,
    /// Last date (or date-time) of the recurrence set
    pub until: Option<Until>,
    /// Number of occurrences
    pub count: Option<u32>,
    /// Interval between recurrences
    pub interval: Option<u32>,
    /// Second specifier, 0 to 60
    pub by_second: Vec<i16>,
    /// Minute specifier, 0 to 59
    pub by_minute: Vec<i16>,
    /// Hour specifier, 0 to 23
    pub by_hour: Vec<i16>,
    /// Day of week specifier
    pub by_day: Vec<WeekDayNum>,
    /// Day of month specifier, -31 to -1 and 1 to 31
    pub by_month_day: Vec<i16>,
    /// Day of year specifier, -366 to -1 and 1 to 366
    pub by_year_day: Vec<i16>,
    /// Week number specifier, -53 to -1 and 1 to 53
    pub by_week_no: Vec<i16>,
    /// Month specifier, 1 to 12
    pub by_month: Vec<i16>,
    /// Position in the recurrence set, -366 to -1 and 1 to 366
    pub by_set_pos: Vec<i16>,
    /// Start day of week
    pub wkst: Option<WeekDay>,
}

impl RecurrenceRule {
    /// Create a rule with only the frequency set.
    #[must_use]
    pub const fn new(freq: Frequency) -> Self {
        Self {
            freq,
            until: None,
            count: None,
            interval: None,
            by_second: Vec::new(),
            by_minute: Vec::new(),
            by_hour: Vec::new(),
            by_day: Vec::new(),
            by_month_day: Vec::new(),
            by_year_day: Vec::new(),
            by_week_no: Vec::new(),
            by_month: Vec::new(),
            by_set_pos: Vec::new(),
            wkst: None,
        }
    }

    /// Names of the time and calendar-position parts that are set, in
    /// canonical order. `BYDAY` and `BYMONTHDAY` are not included.
    pub fn positional_parts(&self) -> impl Iterator<Item = &'static str> {
        [
            (KW_RRULE_BYSECOND, &self.by_second),
            (KW_RRULE_BYMINUTE, &self.by_minute),
            (KW_RRULE_BYHOUR, &self.by_hour),
            (KW_RRULE_BYYEARDAY, &self.by_year_day),
            (KW_RRULE_BYWEEKNO, &self.by_week_no),
            (KW_RRULE_BYMONTH, &self.by_month),
            (KW_RRULE_BYSETPOS, &self.by_set_pos),
        ]
        .into_iter()
        .filter(|(_, values)| !values.is_empty())
        .map(|(name, _)| name)
    }
}

impl Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{KW_RRULE_FREQ}={}", self.freq)?;

        if let Some(until) = &self.until {
            write!(f, ";{KW_RRULE_UNTIL}={until}")?;
        }
        if let Some(count) = self.count {
            write!(f, ";{KW_RRULE_COUNT}={count}")?;
        }

        if let Some(interval) = self.interval {
            write!(f, ";{KW_RRULE_INTERVAL}={interval}")?;
        }

        if let Some(wkst) = self.wkst {
            write!(f, ";{KW_RRULE_WKST}={wkst}")?;
        }

        write_list(f, KW_RRULE_BYSECOND, &self.by_second)?;
        write_list(f, KW_RRULE_BYMINUTE, &self.by_minute)?;
        write_list(f, KW_RRULE_BYHOUR, &self.by_hour)?;
        write_list(f, KW_RRULE_BYDAY, &self.by_day)?;
        write_list(f, KW_RRULE_BYMONTHDAY, &self.by_month_day)?;
        write_list(f, KW_RRULE_BYYEARDAY, &self.by_year_day)?;
        write_list(f, KW_RRULE_BYWEEKNO, &self.by_week_no)?;
        write_list(f, KW_RRULE_BYMONTH, &self.by_month)?;
        write_list(f, KW_RRULE_BYSETPOS, &self.by_set_pos)
    }
}

impl FromStr for RecurrenceRule {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

fn write_list<T: Display>(f: &mut fmt::Formatter<'_>, name: &str, values: &[T]) -> fmt::Result {
    if values.is_empty() {
        return Ok(());
    }

    write!(f, ";{name}=")?;
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            write!(f, ",")?;
        }
        write!(f, "{value}")?;
    }
    Ok(())
}

/// Recurrence frequency
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(serialize_all = "UPPERCASE")]
#[expect(missing_docs)]
pub enum Frequency {
    Secondly,
    Minutely,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

/// Day of the week, numbered from Sunday = 0 to Saturday = 6.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[expect(missing_docs)]
pub enum WeekDay {
    #[strum(to_string = "SU")]
    Sunday = 0,
    #[strum(to_string = "MO")]
    Monday = 1,
    #[strum(to_string = "TU")]
    Tuesday = 2,
    #[strum(to_string = "WE")]
    Wednesday = 3,
    #[strum(to_string = "TH")]
    Thursday = 4,
    #[strum(to_string = "FR")]
    Friday = 5,
    #[strum(to_string = "SA")]
    Saturday = 6,
}

impl WeekDay {
    /// All days, Sunday first.
    pub const ALL: [WeekDay; 7] = [
        WeekDay::Sunday,
        WeekDay::Monday,
        WeekDay::Tuesday,
        WeekDay::Wednesday,
        WeekDay::Thursday,
        WeekDay::Friday,
        WeekDay::Saturday,
    ];

    /// Zero-based index, Sunday = 0.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Day for a zero-based index, Sunday = 0.
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(WeekDay::Sunday),
            1 => Some(WeekDay::Monday),
            2 => Some(WeekDay::Tuesday),
            3 => Some(WeekDay::Wednesday),
            4 => Some(WeekDay::Thursday),
            5 => Some(WeekDay::Friday),
            6 => Some(WeekDay::Saturday),
            _ => None,
        }
    }
}

/// Day of week with optional occurrence, e.g. `MO`, `2TU` or `-1FR`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekDayNum {
    /// Day of the week
    pub day: WeekDay,
    /// Occurrence in the month or year, negative values count from the end
    pub occurrence: Option<i8>,
}

impl WeekDayNum {
    /// Plain weekday without occurrence.
    #[must_use]
    pub const fn every(day: WeekDay) -> Self {
        Self {
            day,
            occurrence: None,
        }
    }

    /// Weekday with an occurrence.
    #[must_use]
    pub const fn nth(day: WeekDay, occurrence: i8) -> Self {
        Self {
            day,
            occurrence: Some(occurrence),
        }
    }
}

impl Display for WeekDayNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.occurrence {
            Some(n) => write!(f, "{n}{}", self.day),
            None => write!(f, "{}", self.day),
        }
    }
}

/// Value of the `UNTIL` rule part, a date with an optional time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Until {
    /// Year, four digits
    pub year: i16,
    /// Month, 1-12
    pub month: u8,
    /// Day of month, 1-31
    pub day: u8,
    /// Time of day, absent for a `DATE` value
    pub time: Option<UntilTime>,
}

impl Until {
    /// Date-only `UNTIL` value.
    #[must_use]
    pub const fn date(year: i16, month: u8, day: u8) -> Self {
        Self {
            year,
            month,
            day,
            time: None,
        }
    }
}

impl Display for Until {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}{:02}{:02}", self.year, self.month, self.day)?;
        if let Some(time) = self.time {
            write!(f, "T{:02}{:02}{:02}", time.hour, time.minute, time.second)?;
            if time.utc {
                write!(f, "Z")?;
            }
        }
        Ok(())
    }
}

/// Time part of an `UNTIL` date-time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UntilTime {
    /// Hour, 0-23
    pub hour: u8,
    /// Minute, 0-59
    pub minute: u8,
    /// Second, 0-60
    pub second: u8,
    /// Whether the time is in UTC
    pub utc: bool,
}
