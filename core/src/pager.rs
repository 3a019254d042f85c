// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use sublime_rrule::WeekDay;

use crate::date::{DateBounds, DateValue, LeapYearRule};
use crate::gesture::GestureError;
use crate::grid::MonthDescriptor;

/// Maps page indices of the scrollable month list to months.
///
/// Page zero is the month of the earliest selectable date, the last page
/// holds the latest one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthPager {
    bounds: DateBounds,
    first_day_of_week: WeekDay,
    leap_year_rule: LeapYearRule,
}

impl MonthPager {
    #[must_use]
    pub const fn new(
        bounds: DateBounds,
        first_day_of_week: WeekDay,
        leap_year_rule: LeapYearRule,
    ) -> Self {
        Self {
            bounds,
            first_day_of_week,
            leap_year_rule,
        }
    }

    #[must_use]
    pub const fn bounds(&self) -> &DateBounds {
        &self.bounds
    }

    #[must_use]
    pub const fn leap_year_rule(&self) -> LeapYearRule {
        self.leap_year_rule
    }

    #[must_use]
    pub fn page_count(&self) -> usize {
        let span = self.bounds.max().month_key() - self.bounds.min().month_key();
        usize::try_from(span).map_or(0, |span| span + 1)
    }

    /// Year and zero-based month of a page.
    #[must_use]
    pub fn month_at(&self, index: usize) -> Option<(i16, u8)> {
        if index >= self.page_count() {
            return None;
        }

        let key = self.bounds.min().month_key() + i32::try_from(index).ok()?;
        let year = i16::try_from(key.div_euclid(12)).ok()?;
        let month = u8::try_from(key.rem_euclid(12)).ok()?;
        Some((year, month))
    }

    /// Page holding a zero-based month.
    #[must_use]
    pub fn page_of(&self, year: i16, month: u8) -> Option<usize> {
        let key = crate::date::month_key(year, month);
        let index = usize::try_from(key - self.bounds.min().month_key()).ok()?;
        (index < self.page_count()).then_some(index)
    }

    /// Layout of a page.
    #[must_use]
    pub fn descriptor(&self, index: usize) -> Option<MonthDescriptor> {
        let (year, month) = self.month_at(index)?;
        MonthDescriptor::new(
            year,
            month,
            self.first_day_of_week,
            &self.bounds,
            self.leap_year_rule,
        )
        .ok()
    }

    /// Resolve a day hit on a page to a selectable date.
    ///
    /// ## Errors
    ///
    /// Fails when the page does not exist, or the day is past the end of the
    /// month or outside the selectable dates.
    pub fn date_at(&self, index: usize, day: u8) -> Result<DateValue, GestureError> {
        let page = self
            .descriptor(index)
            .ok_or(GestureError::PageOutOfRange(index))?;
        if !page.is_enabled(day) {
            return Err(GestureError::DayDisabled { page: index, day });
        }
        page.date(day)
            .ok_or(GestureError::DayDisabled { page: index, day })
    }
}

impl Default for MonthPager {
    fn default() -> Self {
        Self::new(
            DateBounds::default(),
            WeekDay::Sunday,
            LeapYearRule::default(),
        )
    }
}
