// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use serde::de;
use sublime_rrule::WeekDay;

use crate::date::{DateBounds, DateError, DateValue, LeapYearRule};
use crate::pager::MonthPager;
use crate::recurrence::RecurrenceCodec;
use crate::session::SelectionSession;

/// The name of the application.
pub const APP_NAME: &str = "sublime";

/// Errors raised by an inconsistent [`Config`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The selectable dates are not a valid range.
    #[error("invalid selectable dates: {0}")]
    Bounds(#[from] DateError),
}

/// Picker configuration.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct Config {
    /// First column of every month page.
    #[serde(deserialize_with = "deserialize_weekday")]
    pub first_day_of_week: WeekDay,

    /// How leap years are determined.
    pub leap_year_rule: LeapYearRule,

    /// Earliest selectable date.
    pub min_date: DateValue,

    /// Latest selectable date.
    pub max_date: DateValue,

    /// If false, a drag selects the day it is released on.
    pub can_pick_date_range: bool,

    /// If true, encoded rules carry `WKST` set to the first day of week.
    pub emit_week_start: bool,
}

impl Default for Config {
    fn default() -> Self {
        let bounds = DateBounds::default();
        Self {
            first_day_of_week: WeekDay::Sunday,
            leap_year_rule: LeapYearRule::default(),
            min_date: bounds.min(),
            max_date: bounds.max(),
            can_pick_date_range: true,
            emit_week_start: false,
        }
    }
}

impl Config {
    /// Check that the settings fit together.
    ///
    /// ## Errors
    ///
    /// Fails when the minimum date is after the maximum date, or either
    /// date does not exist under the leap-year rule.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bounds().map(|_| ())
    }

    /// Selectable dates.
    ///
    /// ## Errors
    ///
    /// See [`Config::validate`].
    pub fn bounds(&self) -> Result<DateBounds, ConfigError> {
        for date in [self.min_date, self.max_date] {
            if !date.is_valid_under(self.leap_year_rule) {
                return Err(DateError::NotGregorian(date).into());
            }
        }
        Ok(DateBounds::new(self.min_date, self.max_date)?)
    }

    /// ## Errors
    ///
    /// See [`Config::validate`].
    pub fn pager(&self) -> Result<MonthPager, ConfigError> {
        Ok(MonthPager::new(
            self.bounds()?,
            self.first_day_of_week,
            self.leap_year_rule,
        ))
    }

    #[must_use]
    pub fn codec(&self) -> RecurrenceCodec {
        RecurrenceCodec::new(
            self.leap_year_rule,
            self.emit_week_start.then_some(self.first_day_of_week),
        )
    }

    /// ## Errors
    ///
    /// See [`Config::validate`].
    pub fn session(&self) -> Result<SelectionSession, ConfigError> {
        Ok(SelectionSession::new(self.pager()?, self.can_pick_date_range))
    }
}

/// Weekday from its two-letter code or an English name of at least three
/// letters, ignoring case.
#[must_use]
pub fn parse_weekday(s: &str) -> Option<WeekDay> {
    let lower = s.trim().to_ascii_lowercase();
    WeekDay::ALL.into_iter().find(|day| {
        let code = day.to_string().to_ascii_lowercase();
        let name = format!("{day:?}").to_ascii_lowercase();
        lower == code || (lower.len() >= 3 && name.starts_with(&lower))
    })
}

fn deserialize_weekday<'de, D>(deserializer: D) -> Result<WeekDay, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct WeekDayVisitor;

    impl de::Visitor<'_> for WeekDayVisitor {
        type Value = WeekDay;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str(r#"a weekday like "MO", "mon" or "monday""#)
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            parse_weekday(value)
                .ok_or_else(|| de::Error::invalid_value(de::Unexpected::Str(value), &self))
        }
    }

    deserializer.deserialize_str(WeekDayVisitor)
}
