// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Parser for the `recur` value type (RFC 5545 Section 3.3.10).

use chumsky::extra::ParserExtra;
use chumsky::input::ValueInput;
use chumsky::label::LabelError;
use chumsky::prelude::*;
use chumsky::span::SimpleSpan;

use crate::error::{Expected, ParseError};
use crate::keyword::{
    KW_RRULE, KW_RRULE_BYDAY, KW_RRULE_BYHOUR, KW_RRULE_BYMINUTE, KW_RRULE_BYMONTH,
    KW_RRULE_BYMONTHDAY, KW_RRULE_BYSECOND, KW_RRULE_BYSETPOS, KW_RRULE_BYWEEKNO,
    KW_RRULE_BYYEARDAY, KW_RRULE_COUNT, KW_RRULE_FREQ, KW_RRULE_INTERVAL, KW_RRULE_UNTIL,
    KW_RRULE_WKST,
};
use crate::rule::{Frequency, RecurrenceRule, Until, UntilTime, WeekDay, WeekDayNum};

/// Parse a recurrence rule.
///
/// Keywords are matched case-insensitively and an optional `RRULE:` prefix
/// is accepted. A trailing `;` is tolerated.
///
/// ## Errors
///
/// Returns the first grammar violation found in the input.
///
/// ## Examples
///
/// ```
/// use sublime_rrule::{Frequency, parse};
///
/// let rule = parse("FREQ=WEEKLY;INTERVAL=2;BYDAY=MO,FR").unwrap();
/// assert_eq!(rule.freq, Frequency::Weekly);
/// assert_eq!(rule.interval, Some(2));
/// assert!(parse("INTERVAL=2").is_err());
/// ```
pub fn parse(src: &str) -> Result<RecurrenceRule, ParseError> {
    let normalized = src.trim().to_ascii_uppercase();
    recur::<'_, &str, extra::Err<Rich<'_, char>>>()
        .then_ignore(end())
        .parse(normalized.as_str())
        .into_result()
        .map_err(|errs| match errs.into_iter().next() {
            Some(err) => ParseError::from(err),
            None => ParseError {
                message: "unknown error".to_string(),
                span: 0..normalized.len(),
            },
        })
}

/// ```txt
/// recur           = recur-rule-part *( ";" recur-rule-part )
/// ```
///
/// The FREQ rule part is required and no rule part may occur more than once.
/// UNTIL together with COUNT is accepted here and left to the consumer.
pub(crate) fn recur<'src, I, E>() -> impl Parser<'src, I, RecurrenceRule, E>
where
    I: ValueInput<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
    E::Error: LabelError<'src, I, Expected>,
{
    just(KW_RRULE)
        .then(just(':'))
        .or_not()
        .ignore_then(
            rule_part()
                .separated_by(just(';'))
                .allow_trailing()
                .at_least(1)
                .collect::<Vec<_>>(),
        )
        .try_map(build_rule::<I, E::Error>)
}

#[derive(Debug, Clone)]
enum Part {
    Freq(Frequency),
    Until(Until),
    Count(u32),
    Interval(u32),
    BySecond(Vec<i16>),
    ByMinute(Vec<i16>),
    ByHour(Vec<i16>),
    ByDay(Vec<WeekDayNum>),
    ByMonthDay(Vec<i16>),
    ByYearDay(Vec<i16>),
    ByWeekNo(Vec<i16>),
    ByMonth(Vec<i16>),
    BySetPos(Vec<i16>),
    Wkst(WeekDay),
}

#[derive(Default)]
struct Slots {
    freq: Option<Frequency>,
    until: Option<Until>,
    count: Option<u32>,
    interval: Option<u32>,
    by_second: Option<Vec<i16>>,
    by_minute: Option<Vec<i16>>,
    by_hour: Option<Vec<i16>>,
    by_day: Option<Vec<WeekDayNum>>,
    by_month_day: Option<Vec<i16>>,
    by_year_day: Option<Vec<i16>>,
    by_week_no: Option<Vec<i16>>,
    by_month: Option<Vec<i16>>,
    by_set_pos: Option<Vec<i16>>,
    wkst: Option<WeekDay>,
}

impl Slots {
    /// Store a part, returns `false` if the slot was already taken.
    fn fill(&mut self, part: Part) -> bool {
        let taken = match part {
            Part::Freq(v) => self.freq.replace(v).is_some(),
            Part::Until(v) => self.until.replace(v).is_some(),
            Part::Count(v) => self.count.replace(v).is_some(),
            Part::Interval(v) => self.interval.replace(v).is_some(),
            Part::BySecond(v) => self.by_second.replace(v).is_some(),
            Part::ByMinute(v) => self.by_minute.replace(v).is_some(),
            Part::ByHour(v) => self.by_hour.replace(v).is_some(),
            Part::ByDay(v) => self.by_day.replace(v).is_some(),
            Part::ByMonthDay(v) => self.by_month_day.replace(v).is_some(),
            Part::ByYearDay(v) => self.by_year_day.replace(v).is_some(),
            Part::ByWeekNo(v) => self.by_week_no.replace(v).is_some(),
            Part::ByMonth(v) => self.by_month.replace(v).is_some(),
            Part::BySetPos(v) => self.by_set_pos.replace(v).is_some(),
            Part::Wkst(v) => self.wkst.replace(v).is_some(),
        };
        !taken
    }
}

fn build_rule<'src, I, Err>(parts: Vec<Part>, span: I::Span) -> Result<RecurrenceRule, Err>
where
    I: ValueInput<'src, Token = char, Span = SimpleSpan>,
    Err: LabelError<'src, I, Expected>,
{
    let mut slots = Slots::default();
    for part in parts {
        if !slots.fill(part) {
            return Err(Err::expected_found([Expected::DuplicatePart], None, span));
        }
    }

    let freq = slots
        .freq
        .ok_or_else(|| Err::expected_found([Expected::RequiredFreq], None, span))?;

    Ok(RecurrenceRule {
        freq,
        until: slots.until,
        count: slots.count,
        interval: slots.interval,
        by_second: slots.by_second.unwrap_or_default(),
        by_minute: slots.by_minute.unwrap_or_default(),
        by_hour: slots.by_hour.unwrap_or_default(),
        by_day: slots.by_day.unwrap_or_default(),
        by_month_day: slots.by_month_day.unwrap_or_default(),
        by_year_day: slots.by_year_day.unwrap_or_default(),
        by_week_no: slots.by_week_no.unwrap_or_default(),
        by_month: slots.by_month.unwrap_or_default(),
        by_set_pos: slots.by_set_pos.unwrap_or_default(),
        wkst: slots.wkst,
    })
}

/// ```txt
/// recur-rule-part = ( "FREQ" "=" freq )
///                 / ( "UNTIL" "=" enddate )
///                 / ( "COUNT" "=" 1*DIGIT )
///                 / ( "INTERVAL" "=" 1*DIGIT )
///                 / ( "BYSECOND" "=" byseclist )
///                 / ( "BYMINUTE" "=" byminlist )
///                 / ( "BYHOUR" "=" byhrlist )
///                 / ( "BYDAY" "=" bywdaylist )
///                 / ( "BYMONTHDAY" "=" bymodaylist )
///                 / ( "BYYEARDAY" "=" byyrdaylist )
///                 / ( "BYWEEKNO" "=" bywknolist )
///                 / ( "BYMONTH" "=" bymolist )
///                 / ( "BYSETPOS" "=" bysplist )
///                 / ( "WKST" "=" weekday )
/// ```
fn rule_part<'src, I, E>() -> impl Parser<'src, I, Part, E>
where
    I: ValueInput<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
    E::Error: LabelError<'src, I, Expected>,
{
    let kw = |kw| just(kw).ignore_then(just('='));

    choice((
        kw(KW_RRULE_FREQ).ignore_then(frequency()).map(Part::Freq),
        kw(KW_RRULE_UNTIL).ignore_then(enddate()).map(Part::Until),
        kw(KW_RRULE_COUNT)
            .ignore_then(positive_u32())
            .map(Part::Count),
        kw(KW_RRULE_INTERVAL)
            .ignore_then(positive_u32())
            .map(Part::Interval),
        kw(KW_RRULE_BYSECOND)
            .ignore_then(list(unsigned(0, 60)))
            .map(Part::BySecond),
        kw(KW_RRULE_BYMINUTE)
            .ignore_then(list(unsigned(0, 59)))
            .map(Part::ByMinute),
        kw(KW_RRULE_BYHOUR)
            .ignore_then(list(unsigned(0, 23)))
            .map(Part::ByHour),
        kw(KW_RRULE_BYDAY)
            .ignore_then(list(weekdaynum()))
            .map(Part::ByDay),
        kw(KW_RRULE_BYMONTHDAY)
            .ignore_then(list(signed_ordinal(31)))
            .map(Part::ByMonthDay),
        kw(KW_RRULE_BYYEARDAY)
            .ignore_then(list(signed_ordinal(366)))
            .map(Part::ByYearDay),
        kw(KW_RRULE_BYWEEKNO)
            .ignore_then(list(signed_ordinal(53)))
            .map(Part::ByWeekNo),
        kw(KW_RRULE_BYMONTH)
            .ignore_then(list(unsigned(1, 12)))
            .map(Part::ByMonth),
        kw(KW_RRULE_BYSETPOS)
            .ignore_then(list(signed_ordinal(366)))
            .map(Part::BySetPos),
        kw(KW_RRULE_WKST).ignore_then(weekday()).map(Part::Wkst),
    ))
}

/// ```txt
/// freq        = "SECONDLY" / "MINUTELY" / "HOURLY" / "DAILY"
///             / "WEEKLY" / "MONTHLY" / "YEARLY"
/// ```
fn frequency<'src, I, E>() -> impl Parser<'src, I, Frequency, E>
where
    I: ValueInput<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
    E::Error: LabelError<'src, I, Expected>,
{
    letters(1, 8).try_map(|word, span| {
        word.parse::<Frequency>()
            .map_err(|_| E::Error::expected_found([Expected::Frequency], None, span))
    })
}

/// ```txt
/// weekday     = "SU" / "MO" / "TU" / "WE" / "TH" / "FR" / "SA"
/// ```
fn weekday<'src, I, E>() -> impl Parser<'src, I, WeekDay, E>
where
    I: ValueInput<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
    E::Error: LabelError<'src, I, Expected>,
{
    letters(2, 2).try_map(|word, span| {
        word.parse::<WeekDay>()
            .map_err(|_| E::Error::expected_found([Expected::WeekDay], None, span))
    })
}

/// ```txt
/// weekdaynum  = [[plus / minus] ordwk] weekday
/// ordwk       = 1*2DIGIT       ;1 to 53
/// ```
fn weekdaynum<'src, I, E>() -> impl Parser<'src, I, WeekDayNum, E>
where
    I: ValueInput<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
    E::Error: LabelError<'src, I, Expected>,
{
    signed_ordinal(53)
        .try_map(|n, span| {
            i8::try_from(n).map_err(|_| E::Error::expected_found([Expected::OutOfRange], None, span))
        })
        .or_not()
        .then(weekday())
        .map(|(occurrence, day)| WeekDayNum { day, occurrence })
}

/// ```txt
/// enddate     = date / date-time
/// date-value  = date-fullyear date-month date-mday
/// time        = time-hour time-minute time-second [time-utc]
/// ```
fn enddate<'src, I, E>() -> impl Parser<'src, I, Until, E>
where
    I: ValueInput<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
    E::Error: LabelError<'src, I, Expected>,
{
    let time = just('T')
        .ignore_then(fixed_digits(2))
        .then(fixed_digits(2))
        .then(fixed_digits(2))
        .then(just('Z').or_not())
        .try_map(|(((hour, minute), second), utc), span| {
            if hour > 23 || minute > 59 || second > 60 {
                return Err(E::Error::expected_found(
                    [Expected::OutOfRange],
                    None,
                    span,
                ));
            }
            Ok(UntilTime {
                hour: narrow(hour),
                minute: narrow(minute),
                second: narrow(second),
                utc: utc.is_some(),
            })
        });

    fixed_digits(4)
        .then(fixed_digits(2))
        .then(fixed_digits(2))
        .try_map(|((year, month), day), span| {
            if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
                return Err(E::Error::expected_found(
                    [Expected::OutOfRange],
                    None,
                    span,
                ));
            }
            Ok(Until::date(year, narrow(month), narrow(day)))
        })
        .then(time.or_not())
        .map(|(date, time)| Until { time, ..date })
}

/// Comma separated list of at least one item.
fn list<'src, I, E, T>(item: impl Parser<'src, I, T, E>) -> impl Parser<'src, I, Vec<T>, E>
where
    I: ValueInput<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
{
    item.separated_by(just(',')).at_least(1).collect()
}

/// `[plus / minus] 1*3DIGIT` whose magnitude lies in `1..=max`.
fn signed_ordinal<'src, I, E>(max: i16) -> impl Parser<'src, I, i16, E>
where
    I: ValueInput<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
    E::Error: LabelError<'src, I, Expected>,
{
    one_of("+-")
        .or_not()
        .then(digits(3))
        .try_map(move |(sign, n), span| {
            if !(1..=max).contains(&n) {
                return Err(E::Error::expected_found(
                    [Expected::OutOfRange],
                    None,
                    span,
                ));
            }
            Ok(if sign == Some('-') { -n } else { n })
        })
}

/// `1*2DIGIT` within `min..=max`.
fn unsigned<'src, I, E>(min: i16, max: i16) -> impl Parser<'src, I, i16, E>
where
    I: ValueInput<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
    E::Error: LabelError<'src, I, Expected>,
{
    digits(2).try_map(move |n, span| {
        if (min..=max).contains(&n) {
            Ok(n)
        } else {
            Err(E::Error::expected_found(
                [Expected::OutOfRange],
                None,
                span,
            ))
        }
    })
}

/// Between one and `max_len` digits.
fn digits<'src, I, E>(max_len: usize) -> impl Parser<'src, I, i16, E>
where
    I: ValueInput<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
    E::Error: LabelError<'src, I, Expected>,
{
    select! { c @ '0'..='9' => c }
        .repeated()
        .at_least(1)
        .at_most(max_len)
        .collect::<String>()
        .try_map(|str, span| {
            lexical::parse::<i16, _>(&str)
                .map_err(|_| E::Error::expected_found([Expected::Number], None, span))
        })
}

/// Exactly `len` digits.
fn fixed_digits<'src, I, E>(len: usize) -> impl Parser<'src, I, i16, E>
where
    I: ValueInput<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
    E::Error: LabelError<'src, I, Expected>,
{
    select! { c @ '0'..='9' => c }
        .repeated()
        .exactly(len)
        .collect::<String>()
        .try_map(|str, span| {
            lexical::parse::<i16, _>(&str)
                .map_err(|_| E::Error::expected_found([Expected::Number], None, span))
        })
}

/// Parse u32 (1 or more digits), zero is rejected
fn positive_u32<'src, I, E>() -> impl Parser<'src, I, u32, E>
where
    I: ValueInput<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
    E::Error: LabelError<'src, I, Expected>,
{
    select! { c @ '0'..='9' => c }
        .repeated()
        .at_least(1)
        .at_most(10) // u32 max is 10 digits
        .collect::<String>()
        .try_map(|str, span| match lexical::parse::<u32, _>(&str) {
            Ok(0) => Err(E::Error::expected_found(
                [Expected::PositiveNumber],
                None,
                span,
            )),
            Ok(v) => Ok(v),
            Err(_) => Err(E::Error::expected_found([Expected::Number], None, span)),
        })
}

/// Upper-case ASCII word of `min..=max` letters.
fn letters<'src, I, E>(min: usize, max: usize) -> impl Parser<'src, I, String, E>
where
    I: ValueInput<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
{
    select! { c @ 'A'..='Z' => c }
        .repeated()
        .at_least(min)
        .at_most(max)
        .collect::<String>()
}

/// Range-checked digits always fit in a byte.
fn narrow(n: i16) -> u8 {
    u8::try_from(n).unwrap_or(u8::MAX)
}
