// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use sublime_rrule::WeekDay;

use crate::recurrence::model::{
    EndCondition, LAST_WEEK, MonthlyMode, RecurrenceModel, RecurrenceState, RepeatFrequency,
};

/// English one-line summary of a recurrence, e.g.
/// `Every 2 weeks on Mon, Fri; until 2024-03-05`.
#[must_use]
pub fn describe(model: &RecurrenceModel) -> String {
    Description(model).to_string()
}

/// Displays the summary written by [`describe`].
#[derive(Debug, Clone, Copy)]
pub struct Description<'a>(pub &'a RecurrenceModel);

impl fmt::Display for Description<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let model = self.0;
        if model.state() == RecurrenceState::None {
            return write!(f, "Does not repeat");
        }

        match (model.freq(), model.interval().unwrap_or(1)) {
            (RepeatFrequency::Daily, 1) => write!(f, "Daily")?,
            (RepeatFrequency::Weekly, 1) => write!(f, "Weekly")?,
            (RepeatFrequency::Monthly, 1) => write!(f, "Monthly")?,
            (RepeatFrequency::Yearly, 1) => write!(f, "Yearly")?,
            (RepeatFrequency::Daily, n) => write!(f, "Every {n} days")?,
            (RepeatFrequency::Weekly, n) => write!(f, "Every {n} weeks")?,
            (RepeatFrequency::Monthly, n) => write!(f, "Every {n} months")?,
            (RepeatFrequency::Yearly, n) => write!(f, "Every {n} years")?,
        }

        match model.freq() {
            RepeatFrequency::Weekly => {
                for (i, day) in model.checked_weekdays().enumerate() {
                    let sep = if i == 0 { " on " } else { ", " };
                    write!(f, "{sep}{}", short_name(day))?;
                }
            }
            RepeatFrequency::Monthly => match model.monthly_mode() {
                MonthlyMode::ByMonthDay => {
                    if let Some(day) = model.monthly_by_month_day() {
                        write!(f, " (on day {day})")?;
                    }
                }
                MonthlyMode::ByNthWeekday => write!(
                    f,
                    " (on every {} {})",
                    ordinal(model.monthly_by_nth_weekday()),
                    long_name(model.monthly_by_weekday())
                )?,
            },
            RepeatFrequency::Daily | RepeatFrequency::Yearly => {}
        }

        match (model.end(), model.end_date(), model.end_count()) {
            (EndCondition::ByDate, Some(date), _) => write!(f, "; until {date}"),
            (EndCondition::ByCount, _, Some(1)) => write!(f, "; once"),
            (EndCondition::ByCount, _, Some(count)) => write!(f, "; {count} times"),
            _ => Ok(()),
        }
    }
}

const fn short_name(day: WeekDay) -> &'static str {
    match day {
        WeekDay::Sunday => "Sun",
        WeekDay::Monday => "Mon",
        WeekDay::Tuesday => "Tue",
        WeekDay::Wednesday => "Wed",
        WeekDay::Thursday => "Thu",
        WeekDay::Friday => "Fri",
        WeekDay::Saturday => "Sat",
    }
}

const fn long_name(day: WeekDay) -> &'static str {
    match day {
        WeekDay::Sunday => "Sunday",
        WeekDay::Monday => "Monday",
        WeekDay::Tuesday => "Tuesday",
        WeekDay::Wednesday => "Wednesday",
        WeekDay::Thursday => "Thursday",
        WeekDay::Friday => "Friday",
        WeekDay::Saturday => "Saturday",
    }
}

const fn ordinal(nth: i8) -> &'static str {
    match nth {
        1 => "first",
        2 => "second",
        3 => "third",
        4 => "fourth",
        5 => "fifth",
        LAST_WEEK => "last",
        _ => "?",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::DateValue;

    #[test]
    fn describes_inactive_model() {
        assert_eq!(describe(&RecurrenceModel::new()), "Does not repeat");
    }

    #[test]
    fn describes_weekly_until_date() {
        let mut model = RecurrenceModel::new();
        model.set_frequency(RepeatFrequency::Weekly);
        model.set_interval(2);
        model.toggle_weekday(WeekDay::Friday, true);
        model.toggle_weekday(WeekDay::Monday, true);
        model.set_end_by_date(DateValue::new(2024, 2, 5).unwrap());
        assert_eq!(
            describe(&model),
            "Every 2 weeks on Mon, Fri; until 2024-03-05"
        );
    }

    #[test]
    fn describes_monthly_modes() {
        let mut model = RecurrenceModel::new();
        model.set_frequency(RepeatFrequency::Monthly);
        model.set_monthly_mode(MonthlyMode::ByNthWeekday);
        model.set_monthly_nth_weekday(WeekDay::Friday, LAST_WEEK);
        model.set_end_by_count(10);
        assert_eq!(
            describe(&model),
            "Monthly (on every last Friday); 10 times"
        );

        model.set_monthly_mode(MonthlyMode::ByMonthDay);
        model.set_monthly_month_day(15);
        model.set_end_by_count(1);
        assert_eq!(describe(&model), "Monthly (on day 15); once");
    }

    #[test]
    fn describes_plain_frequencies() {
        let mut model = RecurrenceModel::new();
        model.set_frequency(RepeatFrequency::Daily);
        assert_eq!(describe(&model), "Daily");
        model.set_frequency(RepeatFrequency::Yearly);
        model.set_interval(3);
        assert_eq!(describe(&model), "Every 3 years");
    }

    #[test]
    fn description_writes_through_formatter() {
        let mut model = RecurrenceModel::new();
        model.set_frequency(RepeatFrequency::Daily);
        model.set_end_by_date(DateValue::new(999, 0, 1).unwrap());
        let text = Description(&model).to_string();
        assert_eq!(text, "Daily; until 0999-01-01");
        assert_eq!(describe(&model), text);

        model.set_frequency(RepeatFrequency::Weekly);
        model.set_end_never();
        assert_eq!(format!("[{}]", Description(&model)), "[Weekly]");
    }
}
