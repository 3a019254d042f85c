// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use clap::{Arg, ArgMatches, arg, value_parser};
use sublime_core::{DateRange, DateValue, WeekDay};

/// The output format for commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ArgOutputFormat {
    Json,
    Table,
}

impl ArgOutputFormat {
    pub fn arg() -> Arg {
        arg!(--"output-format" <FORMAT> "Output format")
            .value_parser(value_parser!(ArgOutputFormat))
            .default_value("table")
    }

    pub fn from(matches: &ArgMatches) -> Self {
        matches
            .get_one("output-format")
            .copied()
            .unwrap_or(ArgOutputFormat::Table)
    }
}

pub fn arg_verbose() -> Arg {
    arg!(-v --verbose "Show more detailed information")
}

pub fn get_verbose(matches: &ArgMatches) -> bool {
    matches.get_flag("verbose")
}

pub fn arg_rule() -> Arg {
    arg!(rule: <RULE> "Recurrence rule, e.g. FREQ=WEEKLY;BYDAY=MO,FR")
}

pub fn get_rule(matches: &ArgMatches) -> String {
    matches.get_one::<String>("rule").cloned().unwrap_or_default()
}

/// `YYYY-MM-DD`
pub fn parse_date(s: &str) -> Result<DateValue, String> {
    s.parse().map_err(|e: sublime_core::DateError| e.to_string())
}

/// `DATE` or `FIRST..SECOND`
pub fn parse_range(s: &str) -> Result<DateRange, String> {
    s.parse().map_err(|e: sublime_core::DateError| e.to_string())
}

/// `YYYY-MM`, returned with a zero-based month.
pub fn parse_month(s: &str) -> Result<(i16, u8), String> {
    let invalid = || format!("invalid month '{s}', expected YYYY-MM");
    let (year, month) = s.rsplit_once('-').ok_or_else(invalid)?;
    let year: i16 = year.parse().map_err(|_| invalid())?;
    let month: u8 = month.parse().map_err(|_| invalid())?;
    match month {
        1..=12 => Ok((year, month - 1)),
        _ => Err(invalid()),
    }
}

/// Two-letter code or English name, in any case.
pub fn parse_weekday(s: &str) -> Result<WeekDay, String> {
    sublime_core::parse_weekday(s)
        .ok_or_else(|| format!("invalid weekday '{s}', expected e.g. MO or monday"))
}

/// A day the pointer touched: `PAGE:DAY` or a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Page { page: usize, day: u8 },
    Date(DateValue),
}

pub fn parse_hit(s: &str) -> Result<Hit, String> {
    match s.split_once(':') {
        Some((page, day)) => {
            let invalid = || format!("invalid hit '{s}', expected PAGE:DAY");
            Ok(Hit::Page {
                page: page.trim().parse().map_err(|_| invalid())?,
                day: day.trim().parse().map_err(|_| invalid())?,
            })
        }
        None => parse_date(s).map(Hit::Date),
    }
}
