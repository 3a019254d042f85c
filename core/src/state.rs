// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Flat records for saving picker state across restarts.
//!
//! Every field is a string, an integer or a boolean, so any host store can
//! keep them. Restoring validates each field instead of trusting the store.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sublime_rrule::WeekDay;

use crate::date::{DateError, DateRange, DateValue};
use crate::recurrence::{
    COUNT_RANGE, EndCondition, INTERVAL_RANGE, LAST_WEEK, MonthlyMode, RecurrenceModel,
    RecurrenceState, RepeatFrequency,
};

/// Errors raised while restoring saved state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("invalid value '{value}' for field {field}")]
    InvalidField { field: &'static str, value: String },

    #[error("invalid date in field {field}: {source}")]
    Date {
        field: &'static str,
        source: DateError,
    },

    #[error("failed to read saved state: {0}")]
    Json(#[from] serde_json::Error),
}

/// Saved [`RecurrenceModel`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedRecurrence {
    pub state: String,
    pub freq: String,
    pub interval: Option<u32>,
    pub end: String,
    pub end_date: Option<String>,
    pub end_count: Option<u32>,
    /// Seven `0`/`1` flags, Sunday first
    pub weekly_by_day: String,
    pub monthly_mode: String,
    pub monthly_by_month_day: Option<u8>,
    /// Two-letter weekday, e.g. `MO`
    pub monthly_by_weekday: String,
    pub monthly_by_nth_weekday: i8,
}

impl From<&RecurrenceModel> for SavedRecurrence {
    fn from(model: &RecurrenceModel) -> Self {
        Self {
            state: model.state.to_string(),
            freq: model.freq.to_string(),
            interval: model.interval,
            end: model.end.to_string(),
            end_date: model.end_date.map(|date| date.to_string()),
            end_count: model.end_count,
            weekly_by_day: model
                .weekly_by_day
                .iter()
                .map(|on| if *on { '1' } else { '0' })
                .collect(),
            monthly_mode: model.monthly_mode.to_string(),
            monthly_by_month_day: model.monthly_by_month_day,
            monthly_by_weekday: model.monthly_by_weekday.to_string(),
            monthly_by_nth_weekday: model.monthly_by_nth_weekday,
        }
    }
}

impl TryFrom<SavedRecurrence> for RecurrenceModel {
    type Error = StateError;

    fn try_from(saved: SavedRecurrence) -> Result<Self, Self::Error> {
        let interval = saved
            .interval
            .map(|n| in_range("interval", n, INTERVAL_RANGE))
            .transpose()?;
        let end_count = saved
            .end_count
            .map(|n| in_range("end_count", n, COUNT_RANGE))
            .transpose()?;
        let end_date = saved
            .end_date
            .as_deref()
            .map(|text| date_field("end_date", text))
            .transpose()?;

        let end: EndCondition = enum_field("end", &saved.end)?;
        if end == EndCondition::ByDate && end_date.is_none() {
            return Err(invalid("end_date", String::new()));
        }

        let monthly_by_month_day = match saved.monthly_by_month_day {
            Some(day) if !(1..=31).contains(&day) => {
                return Err(invalid("monthly_by_month_day", day.to_string()));
            }
            day => day,
        };

        let nth = saved.monthly_by_nth_weekday;
        if !(1..=5).contains(&nth) && nth != LAST_WEEK {
            return Err(invalid("monthly_by_nth_weekday", nth.to_string()));
        }

        Ok(Self {
            state: enum_field::<RecurrenceState>("state", &saved.state)?,
            freq: enum_field::<RepeatFrequency>("freq", &saved.freq)?,
            interval,
            end,
            end_date,
            end_count,
            weekly_by_day: weekday_flags(&saved.weekly_by_day)?,
            monthly_mode: enum_field::<MonthlyMode>("monthly_mode", &saved.monthly_mode)?,
            monthly_by_month_day,
            monthly_by_weekday: enum_field::<WeekDay>(
                "monthly_by_weekday",
                &saved.monthly_by_weekday,
            )?,
            monthly_by_nth_weekday: nth,
        })
    }
}

/// Saved [`DateRange`], in the order the dates were picked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedDateRange {
    pub first: String,
    pub second: String,
}

impl From<&DateRange> for SavedDateRange {
    fn from(range: &DateRange) -> Self {
        Self {
            first: range.first().to_string(),
            second: range.second().to_string(),
        }
    }
}

impl TryFrom<SavedDateRange> for DateRange {
    type Error = StateError;

    fn try_from(saved: SavedDateRange) -> Result<Self, Self::Error> {
        Ok(Self::new(
            date_field("first", &saved.first)?,
            date_field("second", &saved.second)?,
        ))
    }
}

/// Everything a picker needs to come back after a restart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedState {
    pub selection: Option<SavedDateRange>,
    pub recurrence: SavedRecurrence,
}

impl SavedState {
    #[must_use]
    pub fn new(selection: Option<&DateRange>, recurrence: &RecurrenceModel) -> Self {
        Self {
            selection: selection.map(SavedDateRange::from),
            recurrence: recurrence.into(),
        }
    }

    /// Validate and rebuild the selection and the recurrence model.
    ///
    /// ## Errors
    ///
    /// Fails on the first field that does not hold a legal value.
    pub fn restore(self) -> Result<(Option<DateRange>, RecurrenceModel), StateError> {
        let selection = self.selection.map(DateRange::try_from).transpose()?;
        let recurrence = RecurrenceModel::try_from(self.recurrence)?;
        Ok((selection, recurrence))
    }

    /// ## Errors
    ///
    /// Fails if serialization fails.
    pub fn to_json(&self) -> Result<String, StateError> {
        Ok(serde_json::to_string(self)?)
    }

    /// ## Errors
    ///
    /// Fails if the text is not a saved state; field values are checked by
    /// [`SavedState::restore`].
    pub fn from_json(text: &str) -> Result<Self, StateError> {
        Ok(serde_json::from_str(text)?)
    }
}

fn invalid(field: &'static str, value: String) -> StateError {
    StateError::InvalidField { field, value }
}

fn in_range(field: &'static str, value: u32, (min, max): (u32, u32)) -> Result<u32, StateError> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(invalid(field, value.to_string()))
    }
}

fn enum_field<T: FromStr>(field: &'static str, value: &str) -> Result<T, StateError> {
    value.parse().map_err(|_| invalid(field, value.to_string()))
}

fn date_field(field: &'static str, value: &str) -> Result<DateValue, StateError> {
    value
        .parse()
        .map_err(|source| StateError::Date { field, source })
}

fn weekday_flags(value: &str) -> Result<[bool; 7], StateError> {
    let mut flags = [false; 7];
    if value.len() != flags.len() {
        return Err(invalid("weekly_by_day", value.to_string()));
    }

    for (flag, ch) in flags.iter_mut().zip(value.chars()) {
        *flag = match ch {
            '0' => false,
            '1' => true,
            _ => return Err(invalid("weekly_by_day", value.to_string())),
        };
    }
    Ok(flags)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i16, month: u8, day: u8) -> DateValue {
        DateValue::new(year, month, day).unwrap()
    }

    fn edited_model() -> RecurrenceModel {
        let mut model = RecurrenceModel::new();
        model.set_frequency(RepeatFrequency::Weekly);
        model.toggle_weekday(WeekDay::Monday, true);
        model.toggle_weekday(WeekDay::Thursday, true);
        model.set_monthly_nth_weekday(WeekDay::Friday, LAST_WEEK);
        model.set_end_by_date(date(2024, 11, 31));
        model
    }

    #[test]
    fn flattens_model() {
        let saved = SavedRecurrence::from(&edited_model());
        assert_eq!(saved.state, "ACTIVE");
        assert_eq!(saved.freq, "WEEKLY");
        assert_eq!(saved.end, "BY_DATE");
        assert_eq!(saved.end_date.as_deref(), Some("2024-12-31"));
        assert_eq!(saved.weekly_by_day, "0100100");
        assert_eq!(saved.monthly_by_weekday, "FR");
        assert_eq!(saved.monthly_by_nth_weekday, -1);
    }

    #[test]
    fn restores_model_verbatim() {
        let model = edited_model();
        let restored = RecurrenceModel::try_from(SavedRecurrence::from(&model)).unwrap();
        assert_eq!(restored, model);

        let blank = {
            let mut model = RecurrenceModel::new();
            model.clear_interval();
            model.clear_end_count();
            model
        };
        let restored = RecurrenceModel::try_from(SavedRecurrence::from(&blank)).unwrap();
        assert_eq!(restored, blank);
    }

    #[test]
    fn rejects_tampered_fields() {
        let good = SavedRecurrence::from(&edited_model());

        let cases: [(&str, fn(&mut SavedRecurrence)); 7] = [
            ("state", |s| s.state = "MAYBE".into()),
            ("interval", |s| s.interval = Some(0)),
            ("end_count", |s| s.end_count = Some(731)),
            ("weekly_by_day", |s| s.weekly_by_day = "01001".into()),
            ("monthly_by_month_day", |s| s.monthly_by_month_day = Some(32)),
            ("monthly_by_nth_weekday", |s| s.monthly_by_nth_weekday = 6),
            ("end_date", |s| s.end_date = None),
        ];

        for (expected, tamper) in cases {
            let mut saved = good.clone();
            tamper(&mut saved);
            match RecurrenceModel::try_from(saved) {
                Err(StateError::InvalidField { field, .. }) => assert_eq!(field, expected),
                other => panic!("Expected {expected} to be rejected, got {other:?}"),
            }
        }

        let mut bad_date = good;
        bad_date.end_date = Some("2023-02-29".into());
        assert!(matches!(
            RecurrenceModel::try_from(bad_date),
            Err(StateError::Date { field: "end_date", .. })
        ));
    }

    #[test]
    fn keeps_range_pick_order() {
        let range = DateRange::new(date(2024, 2, 5), date(2024, 0, 20));
        let saved = SavedDateRange::from(&range);
        assert_eq!(saved.first, "2024-03-05");
        assert_eq!(saved.second, "2024-01-20");
        assert_eq!(DateRange::try_from(saved).unwrap(), range);
    }

    #[test]
    fn round_trips_through_json() {
        let range = DateRange::new(date(2024, 0, 20), date(2024, 2, 5));
        let model = edited_model();
        let json = SavedState::new(Some(&range), &model).to_json().unwrap();
        assert!(json.contains(r#""weekly_by_day":"0100100""#));

        let (selection, recurrence) = SavedState::from_json(&json).unwrap().restore().unwrap();
        assert_eq!(selection, Some(range));
        assert_eq!(recurrence, model);
    }

    #[test]
    fn reports_malformed_json() {
        assert!(matches!(
            SavedState::from_json("{"),
            Err(StateError::Json(_))
        ));
    }
}
