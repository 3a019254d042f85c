// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Press-and-drag range selection.

use crate::date::DateRange;
use crate::pager::MonthPager;

/// Errors raised by range gestures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GestureError {
    /// `update` or `end` without a preceding `begin`.
    #[error("no range drag is in progress")]
    NotDragging,

    /// `begin` while a drag is still running.
    #[error("a range drag is already in progress")]
    AlreadyDragging,

    /// The page index is past the pager.
    #[error("page {0} does not exist")]
    PageOutOfRange(usize),

    /// The day cannot be selected on that page.
    #[error("day {day} of page {page} cannot be selected")]
    DayDisabled {
        /// Page index
        page: usize,
        /// Day of month
        day: u8,
    },
}

/// Receives range selection transitions.
///
/// A resolver has at most one listener, and every method has an empty
/// default so implementors only pick what they render.
pub trait RangeSelectionListener {
    /// A drag started, the range holds the anchor only.
    fn on_range_selection_started(&mut self, _range: DateRange) {}

    /// The candidate end moved.
    fn on_range_selection_updated(&mut self, _range: DateRange) {}

    /// The drag finished with the final range.
    fn on_range_selection_ended(&mut self, _range: DateRange) {}

    /// The drag was abandoned.
    fn on_range_selection_cancelled(&mut self) {}
}

impl RangeSelectionListener for () {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GestureState {
    Idle,
    Dragging(DateRange),
}

/// Turns begin / update / end calls into a [`DateRange`].
///
/// The anchor picked by `begin` stays the range's first date for the whole
/// drag; `update` and `end` only move the second one.
#[derive(Debug)]
pub struct RangeGestureResolver<L: RangeSelectionListener = ()> {
    pager: MonthPager,
    state: GestureState,
    listener: L,
}

impl RangeGestureResolver {
    #[must_use]
    pub const fn new(pager: MonthPager) -> Self {
        Self::with_listener(pager, ())
    }
}

impl<L: RangeSelectionListener> RangeGestureResolver<L> {
    #[must_use]
    pub const fn with_listener(pager: MonthPager, listener: L) -> Self {
        Self {
            pager,
            state: GestureState::Idle,
            listener,
        }
    }

    #[must_use]
    pub const fn pager(&self) -> &MonthPager {
        &self.pager
    }

    #[must_use]
    pub const fn listener(&self) -> &L {
        &self.listener
    }

    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        matches!(self.state, GestureState::Dragging(_))
    }

    /// The candidate range of the running drag.
    #[must_use]
    pub const fn working_range(&self) -> Option<DateRange> {
        match self.state {
            GestureState::Dragging(range) => Some(range),
            GestureState::Idle => None,
        }
    }

    /// Start a drag anchored at `day` of `page`.
    ///
    /// ## Errors
    ///
    /// Fails if a drag is already running or the day cannot be selected.
    pub fn begin(&mut self, page: usize, day: u8) -> Result<DateRange, GestureError> {
        if self.is_dragging() {
            return Err(GestureError::AlreadyDragging);
        }

        let anchor = self.pager.date_at(page, day)?;
        let range = DateRange::single(anchor);
        self.state = GestureState::Dragging(range);
        tracing::debug!(page, day, %anchor, "range drag started");
        self.listener.on_range_selection_started(range);
        Ok(range)
    }

    /// Move the candidate end to `day` of `page`.
    ///
    /// Returns `None` when the end did not change, so callers can skip a
    /// redraw. `page` is whichever page is current, which may differ from the
    /// anchor page after an auto-scroll.
    ///
    /// ## Errors
    ///
    /// Fails if no drag is running or the day cannot be selected; the drag
    /// itself keeps going.
    pub fn update(&mut self, page: usize, day: u8) -> Result<Option<DateRange>, GestureError> {
        let GestureState::Dragging(range) = self.state else {
            return Err(GestureError::NotDragging);
        };

        let second = self.pager.date_at(page, day)?;
        if second == range.second() {
            return Ok(None);
        }

        let range = range.with_second(second);
        self.state = GestureState::Dragging(range);
        tracing::trace!(page, day, %range, "range drag updated");
        self.listener.on_range_selection_updated(range);
        Ok(Some(range))
    }

    /// Finish the drag at `day` of `page`.
    ///
    /// A release over a day that cannot be selected keeps the last candidate.
    ///
    /// ## Errors
    ///
    /// Fails if no drag is running.
    pub fn end(&mut self, page: usize, day: u8) -> Result<DateRange, GestureError> {
        let GestureState::Dragging(range) = self.state else {
            return Err(GestureError::NotDragging);
        };

        let range = match self.pager.date_at(page, day) {
            Ok(second) => range.with_second(second),
            Err(err) => {
                tracing::debug!(%err, "released outside the selectable days");
                range
            }
        };

        self.state = GestureState::Idle;
        tracing::debug!(%range, "range drag ended");
        self.listener.on_range_selection_ended(range);
        Ok(range)
    }

    /// Abandon the running drag, returning the discarded candidate.
    pub fn cancel(&mut self) -> Option<DateRange> {
        let range = self.working_range()?;
        self.state = GestureState::Idle;
        tracing::debug!(%range, "range drag cancelled");
        self.listener.on_range_selection_cancelled();
        Some(range)
    }
}

#[cfg(test)]
mod tests {
    use sublime_rrule::WeekDay;

    use super::*;
    use crate::date::{DateBounds, DateValue, LeapYearRule, RangeKind};

    #[derive(Debug, Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl RangeSelectionListener for Recorder {
        fn on_range_selection_started(&mut self, range: DateRange) {
            self.events.push(format!("started {range}"));
        }

        fn on_range_selection_updated(&mut self, range: DateRange) {
            self.events.push(format!("updated {range}"));
        }

        fn on_range_selection_ended(&mut self, range: DateRange) {
            self.events.push(format!("ended {range}"));
        }

        fn on_range_selection_cancelled(&mut self) {
            self.events.push("cancelled".to_string());
        }
    }

    fn date(year: i16, month: u8, day: u8) -> DateValue {
        DateValue::new(year, month, day).unwrap()
    }

    /// Pages: 0 = 2024-01, 1 = 2024-02, 2 = 2024-03.
    fn pager() -> MonthPager {
        let bounds = DateBounds::new(date(2024, 0, 1), date(2024, 2, 31)).unwrap();
        MonthPager::new(bounds, WeekDay::Sunday, LeapYearRule::Simplified)
    }

    #[test]
    fn anchor_stays_while_end_moves() {
        let mut resolver = RangeGestureResolver::new(pager());
        let started = resolver.begin(0, 10).unwrap();
        assert_eq!(started.kind(), RangeKind::Single);

        let updated = resolver.update(0, 15).unwrap().unwrap();
        assert_eq!(updated.first(), date(2024, 0, 10));
        assert_eq!(updated.second(), date(2024, 0, 15));

        let ended = resolver.end(0, 20).unwrap();
        assert_eq!(ended.first(), date(2024, 0, 10));
        assert_eq!(ended.second(), date(2024, 0, 20));
        assert!(!resolver.is_dragging());
    }

    #[test]
    fn suppresses_unchanged_updates() {
        let mut resolver = RangeGestureResolver::new(pager());
        resolver.begin(0, 10).unwrap();
        assert_eq!(resolver.update(0, 10).unwrap(), None);
        assert!(resolver.update(0, 12).unwrap().is_some());
        assert_eq!(resolver.update(0, 12).unwrap(), None);
    }

    #[test]
    fn follows_drag_across_pages() {
        let mut resolver = RangeGestureResolver::new(pager());
        resolver.begin(0, 20).unwrap();
        resolver.update(1, 3).unwrap();
        let range = resolver.end(2, 5).unwrap();
        assert_eq!(range.start(), date(2024, 0, 20));
        assert_eq!(range.end(), date(2024, 2, 5));
    }

    #[test]
    fn backwards_drag_normalizes() {
        let mut resolver = RangeGestureResolver::new(pager());
        resolver.begin(1, 20).unwrap();
        let range = resolver.end(0, 5).unwrap();
        assert_eq!(range.first(), date(2024, 1, 20));
        assert_eq!(range.start(), date(2024, 0, 5));
        assert_eq!(range.end(), date(2024, 1, 20));
    }

    #[test]
    fn rejects_out_of_order_calls() {
        let mut resolver = RangeGestureResolver::new(pager());
        assert_eq!(resolver.update(0, 1), Err(GestureError::NotDragging));
        assert_eq!(resolver.end(0, 1), Err(GestureError::NotDragging));
        assert_eq!(resolver.cancel(), None);

        resolver.begin(0, 1).unwrap();
        assert_eq!(resolver.begin(0, 2), Err(GestureError::AlreadyDragging));
    }

    #[test]
    fn invalid_hits_keep_the_drag() {
        let mut resolver = RangeGestureResolver::new(pager());
        assert_eq!(resolver.begin(7, 1), Err(GestureError::PageOutOfRange(7)));
        assert!(!resolver.is_dragging());

        resolver.begin(0, 10).unwrap();
        resolver.update(0, 12).unwrap();
        assert_eq!(
            resolver.update(1, 30),
            Err(GestureError::DayDisabled { page: 1, day: 30 })
        );
        assert!(resolver.is_dragging());

        let range = resolver.end(5, 1).unwrap();
        assert_eq!(range.second(), date(2024, 0, 12));
    }

    #[test]
    fn notifies_single_listener() {
        let mut resolver = RangeGestureResolver::with_listener(pager(), Recorder::default());
        resolver.begin(0, 10).unwrap();
        resolver.update(0, 10).unwrap();
        resolver.update(0, 11).unwrap();
        resolver.end(0, 12).unwrap();
        resolver.begin(0, 1).unwrap();
        resolver.cancel();

        assert_eq!(
            resolver.listener().events,
            vec![
                "started 2024-01-10",
                "updated 2024-01-10..2024-01-11",
                "ended 2024-01-10..2024-01-12",
                "started 2024-01-01",
                "cancelled",
            ]
        );
    }
}
