// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use crate::date::DateRange;
use crate::gesture::{GestureError, RangeGestureResolver, RangeSelectionListener};
use crate::grid::{ActivatedRange, MonthGrid, project};
use crate::pager::MonthPager;

/// Selection state of one visible calendar.
///
/// Taps select a single day. Drags go through a [`RangeGestureResolver`]
/// when range picking is enabled, otherwise a drag selects the day it is
/// released on.
#[derive(Debug)]
pub struct SelectionSession<L: RangeSelectionListener = ()> {
    resolver: RangeGestureResolver<L>,
    selection: Option<DateRange>,
    can_pick_range: bool,
}

impl SelectionSession {
    #[must_use]
    pub const fn new(pager: MonthPager, can_pick_range: bool) -> Self {
        Self::with_listener(pager, can_pick_range, ())
    }
}

impl<L: RangeSelectionListener> SelectionSession<L> {
    #[must_use]
    pub const fn with_listener(pager: MonthPager, can_pick_range: bool, listener: L) -> Self {
        Self {
            resolver: RangeGestureResolver::with_listener(pager, listener),
            selection: None,
            can_pick_range,
        }
    }

    #[must_use]
    pub const fn pager(&self) -> &MonthPager {
        self.resolver.pager()
    }

    #[must_use]
    pub const fn resolver(&self) -> &RangeGestureResolver<L> {
        &self.resolver
    }

    pub fn listener_mut(&mut self) -> &mut L {
        self.resolver.listener_mut()
    }

    #[must_use]
    pub const fn can_pick_range(&self) -> bool {
        self.can_pick_range
    }

    /// The committed selection.
    #[must_use]
    pub const fn selection(&self) -> Option<DateRange> {
        self.selection
    }

    /// What the pages show right now, the drag candidate while dragging.
    #[must_use]
    pub fn current(&self) -> Option<DateRange> {
        self.resolver.working_range().or(self.selection)
    }

    /// Select a single day.
    ///
    /// ## Errors
    ///
    /// Fails while a drag is running or if the day cannot be selected.
    pub fn tap(&mut self, page: usize, day: u8) -> Result<DateRange, GestureError> {
        if self.resolver.is_dragging() {
            return Err(GestureError::AlreadyDragging);
        }

        let date = self.pager().date_at(page, day)?;
        let range = DateRange::single(date);
        self.selection = Some(range);
        tracing::debug!(%range, "date tapped");
        Ok(range)
    }

    /// Press and hold on a day.
    ///
    /// ## Errors
    ///
    /// See [`RangeGestureResolver::begin`].
    pub fn drag_begin(&mut self, page: usize, day: u8) -> Result<DateRange, GestureError> {
        if self.can_pick_range {
            self.resolver.begin(page, day)
        } else {
            self.pager().date_at(page, day).map(DateRange::single)
        }
    }

    /// Move the held pointer.
    ///
    /// ## Errors
    ///
    /// See [`RangeGestureResolver::update`].
    pub fn drag_update(&mut self, page: usize, day: u8) -> Result<Option<DateRange>, GestureError> {
        if self.can_pick_range {
            self.resolver.update(page, day)
        } else {
            Ok(None)
        }
    }

    /// Release the pointer, committing the result.
    ///
    /// ## Errors
    ///
    /// See [`RangeGestureResolver::end`]; without range picking the release
    /// behaves like [`SelectionSession::tap`].
    pub fn drag_end(&mut self, page: usize, day: u8) -> Result<DateRange, GestureError> {
        if !self.can_pick_range {
            return self.tap(page, day);
        }

        let range = self.resolver.end(page, day)?;
        self.selection = Some(range);
        Ok(range)
    }

    /// Abandon a running drag, the committed selection is kept.
    pub fn drag_cancel(&mut self) -> Option<DateRange> {
        self.resolver.cancel()
    }

    /// Highlight of a page, `None` if the page does not exist.
    #[must_use]
    pub fn activated(&self, page: usize) -> Option<ActivatedRange> {
        let descriptor = self.pager().descriptor(page)?;
        Some(project(self.current().as_ref(), &descriptor))
    }

    /// Full cell layout of a page, `None` if the page does not exist.
    #[must_use]
    pub fn grid(&self, page: usize) -> Option<MonthGrid> {
        let descriptor = self.pager().descriptor(page)?;
        Some(MonthGrid::with_selection(descriptor, self.current().as_ref()))
    }

    /// Reinstate a saved selection, dropping any running drag.
    ///
    /// Dates outside the pager bounds are discarded.
    pub fn restore(&mut self, selection: Option<DateRange>) {
        self.resolver.cancel();
        let bounds = self.pager().bounds();
        self.selection = selection.filter(|range| {
            let inside = bounds.contains(range.first()) && bounds.contains(range.second());
            if !inside {
                tracing::warn!(%range, "restored selection is outside the selectable dates");
            }
            inside
        });
    }

    /// Drop the selection and any running drag.
    pub fn clear(&mut self) {
        self.resolver.cancel();
        self.selection = None;
    }
}
