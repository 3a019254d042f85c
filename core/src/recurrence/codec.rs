// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Translation between [`RecurrenceModel`] and `RRULE` text.
//!
//! The grammar accepts far more than the editor can show. Decoding
//! therefore runs a shape check that rejects every rule the model cannot
//! hold without loss, so a rule that decodes also re-encodes to the same
//! intent.

use sublime_rrule::{Frequency, ParseError, RecurrenceRule, Until, WeekDay, WeekDayNum};

use crate::date::{DateValue, LeapYearRule};
use crate::recurrence::model::{
    COUNT_RANGE, EndCondition, INTERVAL_RANGE, LAST_WEEK, MonthlyMode, RecurrenceModel,
    RecurrenceState, RepeatFrequency, is_until_date,
};

/// Errors raised by [`RecurrenceCodec`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// The text is not a recurrence rule at all.
    #[error(transparent)]
    Syntax(#[from] ParseError),

    /// The rule is valid but cannot be edited, callers keep it as an opaque
    /// custom value.
    #[error("unsupported rule shape: {0}")]
    UnsupportedRuleShape(#[from] Unsupported),

    /// The model breaks its own invariants, a caller bug.
    #[error("invalid recurrence model: {0}")]
    InvalidModelState(String),
}

/// Why a rule cannot be represented by [`RecurrenceModel`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Unsupported {
    #[error("frequency {0} cannot be edited")]
    Frequency(Frequency),

    #[error("COUNT and UNTIL are both set")]
    CountWithUntil,

    #[error("{0} is not supported")]
    Part(&'static str),

    #[error("{part} is not supported on a {freq} rule")]
    NotOnFrequency {
        part: &'static str,
        freq: RepeatFrequency,
    },

    #[error("INTERVAL={0} is larger than {max}", max = INTERVAL_RANGE.1)]
    Interval(u32),

    #[error("COUNT={0} is larger than {max}", max = COUNT_RANGE.1)]
    Count(u32),

    #[error("UNTIL={0} is not a valid date")]
    Until(Until),

    #[error("BYMONTHDAY={0} is outside 1..=31")]
    MonthDay(i16),

    #[error("more than one BYMONTHDAY value")]
    MultipleMonthDays,

    #[error("more than one nth weekday")]
    MultipleNthWeekdays,

    #[error("nth weekday {0} is not one of 1..=5 or -1")]
    NthWeekday(i8),

    #[error("BYMONTHDAY and BYDAY are mixed in a monthly rule")]
    MixedMonthly,
}

/// Converts between [`RecurrenceModel`] and rule text.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RecurrenceCodec {
    /// Rule used to validate `UNTIL` dates
    pub leap_year_rule: LeapYearRule,
    /// `WKST` written on encode, never read on decode
    pub week_start: Option<WeekDay>,
}

#[derive(Debug, Clone, Copy)]
enum End {
    Never,
    Until(DateValue),
    Count(u32),
}

#[derive(Debug, Clone, Copy)]
enum Monthly {
    MonthDay(u8),
    NthWeekday(WeekDay, i8),
}

/// The part of a rule the model can hold.
#[derive(Debug, Clone, Copy)]
struct Shape {
    freq: RepeatFrequency,
    interval: u32,
    end: End,
    weekdays: [bool; 7],
    monthly: Option<Monthly>,
}

impl RecurrenceCodec {
    #[must_use]
    pub const fn new(leap_year_rule: LeapYearRule, week_start: Option<WeekDay>) -> Self {
        Self {
            leap_year_rule,
            week_start,
        }
    }

    /// Parse rule text into an editable model.
    ///
    /// ## Errors
    ///
    /// Returns [`CodecError::Syntax`] for text that is not a rule, and
    /// [`CodecError::UnsupportedRuleShape`] for rules the editor cannot show.
    pub fn decode(&self, text: &str) -> Result<RecurrenceModel, CodecError> {
        let rule = sublime_rrule::parse(text)?;
        let shape = self.shape(&rule).inspect_err(|err| {
            tracing::warn!(%err, text, "recurrence rule cannot be edited");
        })?;
        Ok(shape.into_model())
    }

    /// Whether [`RecurrenceCodec::decode`] would succeed.
    #[must_use]
    pub fn is_representable(&self, text: &str) -> bool {
        sublime_rrule::parse(text).is_ok_and(|rule| self.shape(&rule).is_ok())
    }

    /// Like [`RecurrenceCodec::is_representable`], with the reason.
    ///
    /// ## Errors
    ///
    /// See [`RecurrenceCodec::decode`].
    pub fn check(&self, text: &str) -> Result<(), CodecError> {
        let rule = sublime_rrule::parse(text)?;
        self.shape(&rule)?;
        Ok(())
    }

    /// Write the model as rule text.
    ///
    /// An interval of one is left out, an end date is written as a plain
    /// date, weekly rules list every checked day and monthly rules hold a
    /// single month day or a single nth weekday.
    ///
    /// ## Errors
    ///
    /// Returns [`CodecError::InvalidModelState`] when the model is not
    /// active or misses a value its end condition or monthly mode needs.
    pub fn encode(&self, model: &RecurrenceModel) -> Result<String, CodecError> {
        let rule = self.to_rule(model)?;
        self.shape(&rule)
            .map_err(|err| CodecError::InvalidModelState(err.to_string()))?;
        Ok(rule.to_string())
    }

    /// Build the rule value of a model.
    ///
    /// ## Errors
    ///
    /// See [`RecurrenceCodec::encode`].
    pub fn to_rule(&self, model: &RecurrenceModel) -> Result<RecurrenceRule, CodecError> {
        let invalid = |reason: &str| CodecError::InvalidModelState(reason.to_string());
        if model.state == RecurrenceState::None {
            return Err(invalid("recurrence is not active"));
        }

        let mut rule = RecurrenceRule::new(model.freq.into());
        let interval = model
            .interval
            .ok_or_else(|| invalid("interval has not been entered"))?;
        if interval > 1 {
            rule.interval = Some(interval);
        }

        match model.end {
            EndCondition::Never => {}
            EndCondition::ByDate => {
                let date = model
                    .end_date
                    .ok_or_else(|| invalid("end date has not been chosen"))?;
                if !is_until_date(date) {
                    return Err(invalid("end date year is outside 0000..=9999"));
                }
                rule.until = Some(Until::date(date.year(), date.month() + 1, date.day()));
            }
            EndCondition::ByCount => {
                let count = model
                    .end_count
                    .filter(|count| *count > 0)
                    .ok_or_else(|| invalid("end count has not been entered"))?;
                rule.count = Some(count);
            }
        }

        rule.wkst = self.week_start;

        match model.freq {
            RepeatFrequency::Daily | RepeatFrequency::Yearly => {}
            RepeatFrequency::Weekly => {
                rule.by_day = model.checked_weekdays().map(WeekDayNum::every).collect();
            }
            RepeatFrequency::Monthly => match model.monthly_mode {
                MonthlyMode::ByMonthDay => {
                    if let Some(day) = model.monthly_by_month_day {
                        rule.by_month_day = vec![i16::from(day)];
                    }
                }
                MonthlyMode::ByNthWeekday => {
                    let nth = model.monthly_by_nth_weekday;
                    if !is_valid_nth(nth) {
                        return Err(invalid("nth weekday is not one of 1..=5 or -1"));
                    }
                    rule.by_day = vec![WeekDayNum::nth(model.monthly_by_weekday, nth)];
                }
            },
        }

        Ok(rule)
    }

    fn shape(&self, rule: &RecurrenceRule) -> Result<Shape, Unsupported> {
        let freq = RepeatFrequency::try_from(rule.freq).map_err(Unsupported::Frequency)?;

        if let Some(part) = rule.positional_parts().next() {
            return Err(Unsupported::Part(part));
        }

        let interval = rule.interval.unwrap_or(1);
        if interval > INTERVAL_RANGE.1 {
            return Err(Unsupported::Interval(interval));
        }

        let end = match (rule.until, rule.count) {
            (Some(_), Some(_)) => return Err(Unsupported::CountWithUntil),
            (Some(until), None) => End::Until(self.until_date(until)?),
            (None, Some(count)) if count > COUNT_RANGE.1 => return Err(Unsupported::Count(count)),
            (None, Some(count)) => End::Count(count),
            (None, None) => End::Never,
        };

        let mut weekdays = [false; 7];
        let mut nth_weekday = None;
        for day in &rule.by_day {
            match day.occurrence {
                None if freq == RepeatFrequency::Weekly => weekdays[day.day.index()] = true,
                None => return Err(Unsupported::NotOnFrequency { part: "BYDAY", freq }),
                Some(_) if freq != RepeatFrequency::Monthly => {
                    return Err(Unsupported::NotOnFrequency {
                        part: "nth BYDAY",
                        freq,
                    });
                }
                Some(nth) if !is_valid_nth(nth) => return Err(Unsupported::NthWeekday(nth)),
                Some(nth) => {
                    if nth_weekday.replace((day.day, nth)).is_some() {
                        return Err(Unsupported::MultipleNthWeekdays);
                    }
                }
            }
        }

        let month_day = match rule.by_month_day.as_slice() {
            [] => None,
            [_] if freq != RepeatFrequency::Monthly => {
                return Err(Unsupported::NotOnFrequency {
                    part: "BYMONTHDAY",
                    freq,
                });
            }
            [day] => match u8::try_from(*day) {
                Ok(value @ 1..=31) => Some(value),
                _ => return Err(Unsupported::MonthDay(*day)),
            },
            _ => return Err(Unsupported::MultipleMonthDays),
        };

        let monthly = match (month_day, nth_weekday) {
            (Some(_), Some(_)) => return Err(Unsupported::MixedMonthly),
            (Some(day), None) => Some(Monthly::MonthDay(day)),
            (None, Some((weekday, nth))) => Some(Monthly::NthWeekday(weekday, nth)),
            (None, None) => None,
        };

        Ok(Shape {
            freq,
            interval,
            end,
            weekdays,
            monthly,
        })
    }

    /// The time of a date-time `UNTIL` is dropped.
    fn until_date(&self, until: Until) -> Result<DateValue, Unsupported> {
        let month = until.month.checked_sub(1).ok_or(Unsupported::Until(until))?;
        DateValue::with_rule(until.year, month, until.day, self.leap_year_rule)
            .map_err(|_| Unsupported::Until(until))
    }
}

impl Shape {
    fn into_model(self) -> RecurrenceModel {
        let mut model = RecurrenceModel {
            state: RecurrenceState::Active,
            freq: self.freq,
            interval: Some(self.interval),
            weekly_by_day: self.weekdays,
            ..RecurrenceModel::default()
        };

        match self.end {
            End::Never => model.end = EndCondition::Never,
            End::Until(date) => {
                model.end = EndCondition::ByDate;
                model.end_date = Some(date);
            }
            End::Count(count) => {
                model.end = EndCondition::ByCount;
                model.end_count = Some(count);
            }
        }

        match self.monthly {
            Some(Monthly::MonthDay(day)) => {
                model.monthly_mode = MonthlyMode::ByMonthDay;
                model.monthly_by_month_day = Some(day);
            }
            Some(Monthly::NthWeekday(weekday, nth)) => {
                model.monthly_mode = MonthlyMode::ByNthWeekday;
                model.monthly_by_weekday = weekday;
                model.monthly_by_nth_weekday = nth;
            }
            None => {}
        }

        model
    }
}

const fn is_valid_nth(nth: i8) -> bool {
    matches!(nth, 1..=5 | LAST_WEEK)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> RecurrenceCodec {
        RecurrenceCodec::default()
    }

    fn date(year: i16, month: u8, day: u8) -> DateValue {
        DateValue::new(year, month, day).unwrap()
    }

    fn unsupported(text: &str) -> Unsupported {
        match codec().decode(text) {
            Err(CodecError::UnsupportedRuleShape(reason)) => reason,
            other => panic!("Expected unsupported shape for {text}, got {other:?}"),
        }
    }

    #[test]
    fn decodes_weekly_rule() {
        let model = codec()
            .decode("FREQ=WEEKLY;INTERVAL=2;BYDAY=MO,FR;COUNT=10")
            .unwrap();
        assert_eq!(model.state(), RecurrenceState::Active);
        assert_eq!(model.freq(), RepeatFrequency::Weekly);
        assert_eq!(model.interval(), Some(2));
        assert_eq!(model.end(), EndCondition::ByCount);
        assert_eq!(model.end_count(), Some(10));
        assert_eq!(
            model.checked_weekdays().collect::<Vec<_>>(),
            vec![WeekDay::Monday, WeekDay::Friday]
        );
    }

    #[test]
    fn decodes_monthly_rules() {
        let model = codec()
            .decode("FREQ=MONTHLY;BYMONTHDAY=15;UNTIL=20241231")
            .unwrap();
        assert_eq!(model.monthly_mode(), MonthlyMode::ByMonthDay);
        assert_eq!(model.monthly_by_month_day(), Some(15));
        assert_eq!(model.end(), EndCondition::ByDate);
        assert_eq!(model.end_date(), Some(date(2024, 11, 31)));

        let model = codec().decode("FREQ=MONTHLY;BYDAY=-1FR").unwrap();
        assert_eq!(model.monthly_mode(), MonthlyMode::ByNthWeekday);
        assert_eq!(model.monthly_by_weekday(), WeekDay::Friday);
        assert_eq!(model.monthly_by_nth_weekday(), -1);

        let model = codec().decode("FREQ=MONTHLY;BYDAY=5TU").unwrap();
        assert_eq!(model.monthly_by_nth_weekday(), 5);
    }

    #[test]
    fn drops_until_time_and_ignores_wkst() {
        let model = codec()
            .decode("FREQ=DAILY;UNTIL=20240305T235959Z;WKST=MO")
            .unwrap();
        assert_eq!(model.end_date(), Some(date(2024, 2, 5)));
        assert_eq!(model.interval(), Some(1));
    }

    #[test]
    fn rejects_shapes_the_editor_cannot_show() {
        assert_eq!(
            unsupported("FREQ=HOURLY"),
            Unsupported::Frequency(Frequency::Hourly)
        );
        assert_eq!(
            unsupported("FREQ=DAILY;COUNT=3;UNTIL=20240101"),
            Unsupported::CountWithUntil
        );
        assert_eq!(
            unsupported("FREQ=MONTHLY;BYMONTHDAY=1,15"),
            Unsupported::MultipleMonthDays
        );
        assert_eq!(
            unsupported("FREQ=MONTHLY;BYDAY=1MO,3MO"),
            Unsupported::MultipleNthWeekdays
        );
        assert_eq!(
            unsupported("FREQ=MONTHLY;BYDAY=2TU;BYMONTHDAY=9"),
            Unsupported::MixedMonthly
        );
        assert_eq!(
            unsupported("FREQ=MONTHLY;BYDAY=-2FR"),
            Unsupported::NthWeekday(-2)
        );
        assert_eq!(
            unsupported("FREQ=MONTHLY;BYDAY=6FR"),
            Unsupported::NthWeekday(6)
        );
        assert_eq!(
            unsupported("FREQ=YEARLY;BYMONTH=3"),
            Unsupported::Part("BYMONTH")
        );
        assert_eq!(
            unsupported("FREQ=MONTHLY;BYMONTHDAY=-1"),
            Unsupported::MonthDay(-1)
        );
        assert_eq!(
            unsupported("FREQ=WEEKLY;BYDAY=1MO"),
            Unsupported::NotOnFrequency {
                part: "nth BYDAY",
                freq: RepeatFrequency::Weekly
            }
        );
        assert_eq!(
            unsupported("FREQ=MONTHLY;BYDAY=MO"),
            Unsupported::NotOnFrequency {
                part: "BYDAY",
                freq: RepeatFrequency::Monthly
            }
        );
        assert_eq!(
            unsupported("FREQ=DAILY;BYMONTHDAY=3"),
            Unsupported::NotOnFrequency {
                part: "BYMONTHDAY",
                freq: RepeatFrequency::Daily
            }
        );
        assert_eq!(
            unsupported("FREQ=DAILY;INTERVAL=100"),
            Unsupported::Interval(100)
        );
        assert_eq!(unsupported("FREQ=DAILY;COUNT=731"), Unsupported::Count(731));
    }

    #[test]
    fn validates_until_under_leap_year_rule() {
        let simplified = RecurrenceCodec::default();
        assert!(simplified.is_representable("FREQ=DAILY;UNTIL=19000229"));

        let gregorian = RecurrenceCodec::new(LeapYearRule::Gregorian, None);
        assert!(!gregorian.is_representable("FREQ=DAILY;UNTIL=19000229"));
        assert!(matches!(
            gregorian.decode("FREQ=DAILY;UNTIL=19000229"),
            Err(CodecError::UnsupportedRuleShape(Unsupported::Until(_)))
        ));
        assert!(!simplified.is_representable("FREQ=DAILY;UNTIL=20240431"));
    }

    #[test]
    fn reports_syntax_errors_separately() {
        assert!(matches!(
            codec().decode("FREQ=FORTNIGHTLY"),
            Err(CodecError::Syntax(_))
        ));
        assert!(!codec().is_representable("not a rule"));
        assert!(codec().check("FREQ=YEARLY").is_ok());
    }

    #[test]
    fn encodes_weekly_rule() {
        let mut model = RecurrenceModel::new();
        model.set_frequency(RepeatFrequency::Weekly);
        model.set_interval(2);
        model.toggle_weekday(WeekDay::Friday, true);
        model.toggle_weekday(WeekDay::Monday, true);
        model.set_end_by_count(10);
        assert_eq!(
            codec().encode(&model).unwrap(),
            "FREQ=WEEKLY;COUNT=10;INTERVAL=2;BYDAY=MO,FR"
        );
    }

    #[test]
    fn omits_interval_of_one() {
        let mut model = RecurrenceModel::new();
        model.set_frequency(RepeatFrequency::Daily);
        model.set_interval(1);
        assert_eq!(codec().encode(&model).unwrap(), "FREQ=DAILY");
    }

    #[test]
    fn encodes_end_date_as_plain_date() {
        let mut model = RecurrenceModel::new();
        model.set_frequency(RepeatFrequency::Yearly);
        model.set_end_by_date(date(2030, 0, 5));
        assert_eq!(
            codec().encode(&model).unwrap(),
            "FREQ=YEARLY;UNTIL=20300105"
        );
    }

    #[test]
    fn end_date_year_must_have_four_digits() {
        let mut model = RecurrenceModel::new();
        model.set_frequency(RepeatFrequency::Daily);
        model.set_end_by_date(date(0, 0, 1));
        let rule = codec().encode(&model).unwrap();
        assert_eq!(rule, "FREQ=DAILY;UNTIL=00000101");
        let decoded = codec().decode(&rule).unwrap();
        assert_eq!(decoded.end_date(), Some(date(0, 0, 1)));

        model.set_end_by_date(date(-44, 2, 15));
        assert!(matches!(
            codec().encode(&model),
            Err(CodecError::InvalidModelState(_))
        ));
    }

    #[test]
    fn encodes_monthly_rules() {
        let mut model = RecurrenceModel::new();
        model.set_frequency(RepeatFrequency::Monthly);
        model.set_monthly_month_day(31);
        assert_eq!(
            codec().encode(&model).unwrap(),
            "FREQ=MONTHLY;BYMONTHDAY=31"
        );

        model.set_monthly_mode(MonthlyMode::ByNthWeekday);
        model.set_monthly_nth_weekday(WeekDay::Tuesday, 2);
        assert_eq!(codec().encode(&model).unwrap(), "FREQ=MONTHLY;BYDAY=2TU");
    }

    #[test]
    fn writes_configured_week_start() {
        let codec = RecurrenceCodec::new(LeapYearRule::Simplified, Some(WeekDay::Monday));
        let mut model = RecurrenceModel::new();
        model.set_frequency(RepeatFrequency::Weekly);
        model.toggle_weekday(WeekDay::Sunday, true);
        assert_eq!(
            codec.encode(&model).unwrap(),
            "FREQ=WEEKLY;WKST=MO;BYDAY=SU"
        );
    }

    #[test]
    fn refuses_inconsistent_models() {
        let inactive = RecurrenceModel::new();
        assert!(matches!(
            codec().encode(&inactive),
            Err(CodecError::InvalidModelState(_))
        ));

        let mut blank_count = RecurrenceModel::new();
        blank_count.set_end_by_count(3);
        blank_count.clear_end_count();
        assert!(matches!(
            codec().encode(&blank_count),
            Err(CodecError::InvalidModelState(_))
        ));

        let mut blank_interval = RecurrenceModel::new();
        blank_interval.clear_interval();
        assert!(matches!(
            codec().encode(&blank_interval),
            Err(CodecError::InvalidModelState(_))
        ));

        let mut missing_date = RecurrenceModel::new();
        missing_date.set_end_never();
        missing_date.end = EndCondition::ByDate;
        assert!(matches!(
            codec().encode(&missing_date),
            Err(CodecError::InvalidModelState(_))
        ));

        let mut bad_nth = RecurrenceModel::new();
        bad_nth.set_frequency(RepeatFrequency::Monthly);
        bad_nth.set_monthly_mode(MonthlyMode::ByNthWeekday);
        bad_nth.monthly_by_nth_weekday = 7;
        assert!(matches!(
            codec().encode(&bad_nth),
            Err(CodecError::InvalidModelState(_))
        ));
    }
}
