// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{borrow::Cow, error::Error};

use clap::{Arg, ArgMatches, Command, arg, value_parser};
use clap_num::number_range;
use colored::{Color, Colorize};
use sublime_core::{
    COUNT_RANGE, CodecError, Config, DateValue, Description, EndCondition, INTERVAL_RANGE,
    LAST_WEEK, MonthlyMode, RecurrenceChoice, RecurrenceModel, RepeatFrequency, SavedRecurrence,
    WeekDay, describe,
};

use crate::arg::{ArgOutputFormat, arg_rule, get_rule, parse_date, parse_weekday};
use crate::table::{PaddingDirection, Table, TableColumn};

/// Show how the recurrence editor would open a rule.
#[derive(Debug, Clone)]
pub struct CmdRruleDecode {
    pub rule: String,
    pub output_format: ArgOutputFormat,
}

impl CmdRruleDecode {
    pub const NAME: &str = "decode";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Decode a recurrence rule into editor fields")
            .arg(arg_rule())
            .arg(ArgOutputFormat::arg())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            rule: get_rule(matches),
            output_format: ArgOutputFormat::from(matches),
        }
    }

    pub fn run(self, config: &Config) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "decoding recurrence rule...");
        let model = config.codec().decode(&self.rule)?;

        match self.output_format {
            ArgOutputFormat::Json => {
                let saved = SavedRecurrence::from(&model);
                println!("{}", serde_json::to_string_pretty(&saved)?);
            }
            ArgOutputFormat::Table => {
                let choice = RecurrenceChoice::from_rule(Some(&self.rule));
                let fields = model_fields(&model, &choice);
                print!("{}", Table::new(&FieldColumn::ALL, &fields));
            }
        }
        Ok(())
    }
}

/// Build a rule from editor fields.
#[derive(Debug, Clone)]
pub struct CmdRruleEncode {
    pub freq: RepeatFrequency,
    pub interval: Option<u32>,
    pub count: Option<u32>,
    pub until: Option<DateValue>,
    pub weekdays: Vec<WeekDay>,
    pub month_day: Option<u8>,
    pub nth_weekday: Option<(i8, WeekDay)>,
    pub start: Option<DateValue>,
}

impl CmdRruleEncode {
    pub const NAME: &str = "encode";

    pub fn command() -> Command {
        fn interval(s: &str) -> Result<u32, String> {
            number_range(s, INTERVAL_RANGE.0, INTERVAL_RANGE.1)
        }

        fn count(s: &str) -> Result<u32, String> {
            number_range(s, COUNT_RANGE.0, COUNT_RANGE.1)
        }

        fn month_day(s: &str) -> Result<u8, String> {
            number_range(s, 1, 31)
        }

        Command::new(Self::NAME)
            .about("Encode editor fields into a recurrence rule")
            .arg(arg!(freq: <FREQ> "Repeat frequency").value_parser(value_parser!(RepeatFrequency)))
            .arg(arg!(-i --interval <N> "Repeat every N periods (1-99)").value_parser(interval))
            .arg(
                arg!(--count <N> "End after N occurrences (1-730)")
                    .value_parser(count)
                    .conflicts_with("until"),
            )
            .arg(arg!(--until <DATE> "End on this date, YYYY-MM-DD").value_parser(parse_date))
            .arg(
                arg!(--on <WEEKDAY> "Weekdays of a weekly rule, e.g. MO,FR")
                    .value_parser(parse_weekday)
                    .value_delimiter(',')
                    .num_args(1..),
            )
            .arg(
                arg!(--"month-day" <DAY> "Day of a monthly rule (1-31)")
                    .value_parser(month_day)
                    .conflicts_with("nth-weekday"),
            )
            .arg(arg_nth_weekday())
            .arg(
                arg!(--start <DATE> "Event start, fills the fields left out")
                    .value_parser(parse_date),
            )
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            freq: matches
                .get_one("freq")
                .copied()
                .unwrap_or(RepeatFrequency::Weekly),
            interval: matches.get_one("interval").copied(),
            count: matches.get_one("count").copied(),
            until: matches.get_one("until").copied(),
            weekdays: matches
                .get_many("on")
                .map(|days| days.copied().collect())
                .unwrap_or_default(),
            month_day: matches.get_one("month-day").copied(),
            nth_weekday: matches.get_one("nth-weekday").copied(),
            start: matches.get_one("start").copied(),
        }
    }

    pub fn run(self, config: &Config) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "encoding recurrence rule...");
        let model = self.model();
        if !model.can_confirm() {
            return Err("the recurrence is incomplete, a weekly rule needs at least one day".into());
        }

        println!("{}", config.codec().encode(&model)?);
        Ok(())
    }

    /// Apply the arguments the way the editor applies user input.
    pub fn model(&self) -> RecurrenceModel {
        let mut model = RecurrenceModel::new();
        if let Some(start) = self.start {
            model.seed_from_start(start);
        }

        model.set_frequency(self.freq);
        if let Some(interval) = self.interval {
            model.set_interval(interval);
        }

        match (self.count, self.until) {
            (Some(count), _) => model.set_end_by_count(count),
            (None, Some(until)) => model.set_end_by_date(until),
            (None, None) => model.set_end_never(),
        }

        if !self.weekdays.is_empty() {
            for day in WeekDay::ALL {
                model.toggle_weekday(day, self.weekdays.contains(&day));
            }
        }

        if let Some((nth, weekday)) = self.nth_weekday {
            model.set_monthly_mode(MonthlyMode::ByNthWeekday);
            model.set_monthly_nth_weekday(weekday, nth);
        } else if let Some(day) = self.month_day {
            model.set_monthly_mode(MonthlyMode::ByMonthDay);
            model.set_monthly_month_day(day);
        }
        model
    }
}

/// Tell apart rules the editor can open from opaque custom rules.
#[derive(Debug, Clone)]
pub struct CmdRruleCheck {
    pub rule: String,
}

impl CmdRruleCheck {
    pub const NAME: &str = "check";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Check whether the editor can represent a recurrence rule")
            .arg(arg_rule())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            rule: get_rule(matches),
        }
    }

    pub fn run(self, config: &Config) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "checking recurrence rule...");
        let codec = config.codec();
        match codec.check(&self.rule) {
            Ok(()) => {
                let model = codec.decode(&self.rule)?;
                println!("{} {}", "editable:".green(), Description(&model));
                Ok(())
            }
            Err(CodecError::UnsupportedRuleShape(reason)) => {
                println!("{} {reason}", "custom:".yellow());
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }
}

/// Print the summary line of a rule.
#[derive(Debug, Clone)]
pub struct CmdRruleDescribe {
    pub rule: String,
}

impl CmdRruleDescribe {
    pub const NAME: &str = "describe";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Describe a recurrence rule in English")
            .arg(arg_rule())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            rule: get_rule(matches),
        }
    }

    pub fn run(self, config: &Config) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "describing recurrence rule...");
        let model = config.codec().decode(&self.rule)?;
        println!("{}", Description(&model));
        Ok(())
    }
}

fn arg_nth_weekday() -> Arg {
    arg!(--"nth-weekday" <NTH_WEEKDAY> "Weekday of a monthly rule, e.g. 2TU or -1FR")
        .value_parser(parse_nth_weekday)
        .allow_hyphen_values(true)
}

/// `2TU`, `-1FR` or `5SU`. A fifth week is kept as given.
fn parse_nth_weekday(s: &str) -> Result<(i8, WeekDay), String> {
    let invalid = || format!("invalid nth weekday '{s}', expected e.g. 2TU or -1FR");
    let s = s.trim();
    let split = s
        .find(|c: char| c.is_ascii_alphabetic())
        .ok_or_else(invalid)?;
    let (nth, day) = s.split_at(split);
    let nth: i8 = nth.trim_start_matches('+').parse().map_err(|_| invalid())?;
    if nth != LAST_WEEK && !(1..=5).contains(&nth) {
        return Err(invalid());
    }
    let day = parse_weekday(day).map_err(|_| invalid())?;
    Ok((nth, day))
}

fn model_fields(model: &RecurrenceModel, choice: &RecurrenceChoice) -> Vec<(&'static str, String)> {
    let mut fields = vec![
        ("option", choice.option().to_string()),
        ("summary", describe(model)),
        ("freq", model.freq().to_string()),
        (
            "interval",
            model.interval().map(|i| i.to_string()).unwrap_or_default(),
        ),
        ("end", model.end().to_string()),
    ];

    match model.end() {
        EndCondition::Never => {}
        EndCondition::ByDate => fields.push((
            "until",
            model.end_date().map(|d| d.to_string()).unwrap_or_default(),
        )),
        EndCondition::ByCount => fields.push((
            "count",
            model.end_count().map(|c| c.to_string()).unwrap_or_default(),
        )),
    }

    match model.freq() {
        RepeatFrequency::Weekly => {
            let days: Vec<_> = model.checked_weekdays().map(|d| d.to_string()).collect();
            fields.push(("weekdays", days.join(",")));
        }
        RepeatFrequency::Monthly => match model.monthly_mode() {
            MonthlyMode::ByMonthDay => fields.push((
                "month day",
                model
                    .monthly_by_month_day()
                    .map(|d| d.to_string())
                    .unwrap_or_default(),
            )),
            MonthlyMode::ByNthWeekday => fields.push((
                "nth weekday",
                format!(
                    "{}{}",
                    model.monthly_by_nth_weekday(),
                    model.monthly_by_weekday()
                ),
            )),
        },
        RepeatFrequency::Daily | RepeatFrequency::Yearly => {}
    }
    fields
}

#[derive(Debug, Clone, Copy)]
enum FieldColumn {
    Name,
    Value,
}

impl FieldColumn {
    const ALL: [FieldColumn; 2] = [FieldColumn::Name, FieldColumn::Value];
}

impl TableColumn<(&'static str, String)> for FieldColumn {
    fn name(&self) -> Cow<'_, str> {
        match self {
            FieldColumn::Name => "field".into(),
            FieldColumn::Value => "value".into(),
        }
    }

    fn format<'a>(&self, data: &'a (&'static str, String)) -> Cow<'a, str> {
        match self {
            FieldColumn::Name => data.0.into(),
            FieldColumn::Value => data.1.as_str().into(),
        }
    }

    fn padding_direction(&self) -> PaddingDirection {
        match self {
            FieldColumn::Name => PaddingDirection::Right,
            FieldColumn::Value => PaddingDirection::Left,
        }
    }

    fn color(&self, _data: &(&'static str, String)) -> Option<Color> {
        match self {
            FieldColumn::Name => Some(Color::Cyan),
            FieldColumn::Value => None,
        }
    }
}
