// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;

use clap::{ArgMatches, Command, arg};
use colored::Colorize;
use sublime_core::{Config, DateRange};

use crate::arg::{arg_verbose, get_verbose, parse_month, parse_range};
use crate::month_formatter::MonthFormatter;

/// Print a month page with the selection highlighted.
#[derive(Debug, Clone)]
pub struct CmdMonth {
    /// Year and zero-based month
    pub month: (i16, u8),
    pub select: Option<DateRange>,
    pub verbose: bool,
}

impl CmdMonth {
    pub const NAME: &str = "month";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .alias("m")
            .about("Show a month page of the picker")
            .arg(arg!(month: <MONTH> "Month to show, YYYY-MM").value_parser(parse_month))
            .arg(
                arg!(-s --select <RANGE> "Selected day or range, e.g. 2024-03-05..2024-03-09")
                    .value_parser(parse_range),
            )
            .arg(arg_verbose())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            month: matches.get_one("month").copied().unwrap_or_default(),
            select: matches.get_one("select").copied(),
            verbose: get_verbose(matches),
        }
    }

    pub fn run(self, config: &Config) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "rendering month page...");
        let mut session = config.session()?;
        session.restore(self.select);
        if self.select.is_some() && session.selection().is_none() {
            println!("{}", "Selection is outside the selectable dates".yellow());
        }

        let (year, month) = self.month;
        let page = session
            .pager()
            .page_of(year, month)
            .ok_or_else(|| format!("{year:04}-{:02} is outside the selectable dates", month + 1))?;
        let grid = session
            .grid(page)
            .ok_or_else(|| format!("page {page} does not exist"))?;

        print!("{}", MonthFormatter::new(&grid));
        if self.verbose {
            let count = session.pager().page_count();
            println!("{}", format!("page {page} of {count}").dimmed());
        }
        Ok(())
    }
}
