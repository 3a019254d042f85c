// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use colored::Colorize;
use sublime_core::{CellShape, DayCell, MonthGrid, WeekDay};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const CELL_WIDTH: usize = 4;

/// Renders a month page as text, one cell per day.
///
/// The selection is drawn with brackets: `( 5)` for a single day, and
/// `( 5-`, `- 6-`, `- 7)` for the start, middle and end of a range.
#[derive(Debug)]
pub struct MonthFormatter<'a> {
    grid: &'a MonthGrid,
}

impl<'a> MonthFormatter<'a> {
    pub fn new(grid: &'a MonthGrid) -> Self {
        Self { grid }
    }

    fn title(&self) -> String {
        let page = self.grid.page();
        let name = MONTH_NAMES
            .get(usize::from(page.month()))
            .copied()
            .unwrap_or_default();
        format!("{name} {}", page.year())
    }

    fn weekdays(&self) -> impl Iterator<Item = WeekDay> {
        let first = self.grid.page().first_day_of_week().index();
        (0..7).filter_map(move |i| WeekDay::from_index((first + i) % 7))
    }
}

impl fmt::Display for MonthFormatter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = CELL_WIDTH * 7;
        writeln!(f, "{}", format!("{:^width$}", self.title()).trim_end().bold())?;

        let header: String = self.weekdays().map(|day| format!(" {} ", title_case(day))).collect();
        writeln!(f, "{}", header.trim_end())?;

        for week in self.grid.weeks() {
            let lead = week.first().map_or(0, |cell| usize::from(cell.column));
            let mut line = " ".repeat(lead * CELL_WIDTH);
            for (i, cell) in week.iter().enumerate() {
                let text = cell_text(cell);
                let text = if i + 1 == week.len() { text.trim_end() } else { &text };
                line.push_str(&style(cell, text));
            }
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

fn cell_text(cell: &DayCell) -> String {
    let (left, right) = match cell.shape {
        Some(CellShape::Circle) => ('(', ')'),
        Some(CellShape::RoundedLeft) => ('(', '-'),
        Some(CellShape::Plain) => ('-', '-'),
        Some(CellShape::RoundedRight) => ('-', ')'),
        None => (' ', ' '),
    };
    format!("{left}{:>2}{right}", cell.day)
}

fn style(cell: &DayCell, text: &str) -> String {
    if !cell.enabled {
        text.dimmed().to_string()
    } else if cell.selected {
        text.on_blue().to_string()
    } else if cell.in_range {
        text.blue().to_string()
    } else {
        text.to_string()
    }
}

fn title_case(day: WeekDay) -> String {
    let code = day.to_string();
    let mut chars = code.chars();
    match chars.next() {
        Some(first) => first.to_string() + &chars.as_str().to_ascii_lowercase(),
        None => code,
    }
}
