// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Projection of a selection onto month pages.

use sublime_rrule::WeekDay;

use crate::date::{DateBounds, DateError, DateRange, DateValue, LeapYearRule, RangeKind, month_key};

/// Layout constraints of one month page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthDescriptor {
    year: i16,
    month: u8,
    first_day_of_week: WeekDay,
    enabled_day_start: u8,
    enabled_day_end: u8,
    days_in_month: u8,
    day_offset: u8,
}

impl MonthDescriptor {
    /// Describe the page of a zero-based month, clipping `bounds` to it.
    ///
    /// ## Errors
    ///
    /// Fails when the month is invalid or lies entirely outside `bounds`.
    pub fn new(
        year: i16,
        month: u8,
        first_day_of_week: WeekDay,
        bounds: &DateBounds,
        rule: LeapYearRule,
    ) -> Result<Self, DateError> {
        let first = DateValue::with_rule(year, month, 1, rule)?;
        let key = first.month_key();
        let (min, max) = (bounds.min(), bounds.max());
        if key < min.month_key() || key > max.month_key() {
            return Err(DateError::PageOutsideBounds { year, month });
        }

        let days_in_month = rule.days_in_month(year, month);
        let enabled_day_start = if key == min.month_key() { min.day() } else { 1 };
        let enabled_day_end = if key == max.month_key() {
            max.day()
        } else {
            days_in_month
        };

        let start = first.weekday().index();
        let day_offset = (start + 7 - first_day_of_week.index()) % 7;

        Ok(Self {
            year,
            month,
            first_day_of_week,
            enabled_day_start,
            enabled_day_end,
            days_in_month,
            day_offset: u8::try_from(day_offset).unwrap_or_default(),
        })
    }

    #[must_use]
    pub const fn year(&self) -> i16 {
        self.year
    }

    /// Zero-based month.
    #[must_use]
    pub const fn month(&self) -> u8 {
        self.month
    }

    #[must_use]
    pub const fn first_day_of_week(&self) -> WeekDay {
        self.first_day_of_week
    }

    /// First selectable day of the page.
    #[must_use]
    pub const fn enabled_day_start(&self) -> u8 {
        self.enabled_day_start
    }

    /// Last selectable day of the page.
    #[must_use]
    pub const fn enabled_day_end(&self) -> u8 {
        self.enabled_day_end
    }

    #[must_use]
    pub const fn days_in_month(&self) -> u8 {
        self.days_in_month
    }

    /// Column of the first day of the month, zero being `first_day_of_week`.
    #[must_use]
    pub const fn day_offset(&self) -> u8 {
        self.day_offset
    }

    #[must_use]
    pub const fn is_enabled(&self, day: u8) -> bool {
        day >= self.enabled_day_start && day <= self.enabled_day_end
    }

    /// The date of `day` on this page, `None` past the end of the month.
    #[must_use]
    pub fn date(&self, day: u8) -> Option<DateValue> {
        if day == 0 || day > self.days_in_month {
            return None;
        }
        // the descriptor was validated under its leap-year rule, and
        // `days_in_month` already carries that rule
        DateValue::with_rule(self.year, self.month, day, LeapYearRule::Simplified).ok()
    }

    const fn key(&self) -> i32 {
        month_key(self.year, self.month)
    }
}

/// Selection state of a single page.
///
/// `days` holds the first and last highlighted day of the month, `None`
/// when the selection does not touch the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivatedRange {
    pub days: Option<(u8, u8)>,
    pub kind: RangeKind,
}

impl ActivatedRange {
    /// Nothing selected on the page.
    #[must_use]
    pub const fn inactive(kind: RangeKind) -> Self {
        Self { days: None, kind }
    }

    #[must_use]
    pub const fn new(starting_day: u8, ending_day: u8, kind: RangeKind) -> Self {
        Self {
            days: Some((starting_day, ending_day)),
            kind,
        }
    }

    #[must_use]
    pub const fn is_activated(&self) -> bool {
        self.days.is_some()
    }

    #[must_use]
    pub fn starting_day(&self) -> Option<u8> {
        self.days.map(|(start, _)| start)
    }

    #[must_use]
    pub fn ending_day(&self) -> Option<u8> {
        self.days.map(|(_, end)| end)
    }

    /// Whether `day` is highlighted.
    #[must_use]
    pub fn contains(&self, day: u8) -> bool {
        self.days
            .is_some_and(|(start, end)| (start..=end).contains(&day))
    }

    /// Highlight shape of `day`, `None` if the day is not highlighted.
    #[must_use]
    pub fn cell_shape(&self, day: u8, days_in_month: u8) -> Option<CellShape> {
        let (start, end) = self.days?;
        if !(start..=end).contains(&day) {
            return None;
        }

        if self.kind == RangeKind::Single {
            return Some(CellShape::Circle);
        }

        let left = day == start && start != 1;
        let right = day == end && end != days_in_month;
        Some(match (left, right) {
            (true, true) => CellShape::Circle,
            (true, false) => CellShape::RoundedLeft,
            (false, true) => CellShape::RoundedRight,
            (false, false) => CellShape::Plain,
        })
    }
}

/// Highlight treatment of a selected cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum CellShape {
    /// An isolated selected day
    Circle,
    /// Start of a range that does not begin on the first of the month
    RoundedLeft,
    /// End of a range that does not end on the last of the month
    RoundedRight,
    /// Any other day inside a range
    Plain,
}

/// Project the selection onto one page.
///
/// The function is pure, so it can be called for as many pages as are
/// visible after each selection change.
#[must_use]
pub fn project(selection: Option<&DateRange>, page: &MonthDescriptor) -> ActivatedRange {
    let Some(selection) = selection else {
        return ActivatedRange::inactive(RangeKind::Single);
    };

    let kind = selection.kind();
    let (start, end) = (selection.start(), selection.end());
    let key = page.key();
    if key < start.month_key() || key > end.month_key() {
        return ActivatedRange::inactive(kind);
    }

    let starting_day = if key == start.month_key() {
        start.day()
    } else {
        1
    };
    let ending_day = if key == end.month_key() {
        end.day()
    } else {
        page.days_in_month()
    };
    ActivatedRange::new(starting_day, ending_day, kind)
}

/// One day cell of a rendered page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCell {
    pub day: u8,
    /// Column, zero being the first day of the week
    pub column: u8,
    /// Week row, zero-based
    pub row: u8,
    pub enabled: bool,
    /// Start or end of the selection
    pub selected: bool,
    /// Between start and end, both inclusive
    pub in_range: bool,
    pub shape: Option<CellShape>,
}

/// A month page together with its projected selection.
#[derive(Debug, Clone, Copy)]
pub struct MonthGrid {
    page: MonthDescriptor,
    activated: ActivatedRange,
}

impl MonthGrid {
    /// Rows a page never exceeds.
    pub const MAX_WEEKS: u8 = 6;

    #[must_use]
    pub const fn new(page: MonthDescriptor, activated: ActivatedRange) -> Self {
        Self { page, activated }
    }

    /// Build the grid of `page` for the current selection.
    #[must_use]
    pub fn with_selection(page: MonthDescriptor, selection: Option<&DateRange>) -> Self {
        Self::new(page, project(selection, &page))
    }

    #[must_use]
    pub const fn page(&self) -> &MonthDescriptor {
        &self.page
    }

    #[must_use]
    pub const fn activated(&self) -> &ActivatedRange {
        &self.activated
    }

    /// All day cells in day order.
    #[must_use]
    pub fn cells(&self) -> Vec<DayCell> {
        let offset = self.page.day_offset();
        let days = self.page.days_in_month();
        (1..=days)
            .map(|day| {
                let position = offset + day - 1;
                let selected = self.activated.starting_day() == Some(day)
                    || self.activated.ending_day() == Some(day);
                DayCell {
                    day,
                    column: position % 7,
                    row: position / 7,
                    enabled: self.page.is_enabled(day),
                    selected,
                    in_range: self.activated.contains(day),
                    shape: self.activated.cell_shape(day, days),
                }
            })
            .collect()
    }

    /// Cells grouped by week row.
    #[must_use]
    pub fn weeks(&self) -> Vec<Vec<DayCell>> {
        let mut weeks: Vec<Vec<DayCell>> = Vec::with_capacity(usize::from(Self::MAX_WEEKS));
        for cell in self.cells() {
            match weeks.last_mut() {
                Some(week) if week.last().is_some_and(|last| last.row == cell.row) => {
                    week.push(cell);
                }
                _ => weeks.push(vec![cell]),
            }
        }
        weeks
    }
}
