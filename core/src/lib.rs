// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Date, date range and recurrence picking without the widgets.
//!
//! The crate holds the parts of a picker that are plain data: which cells a
//! month page highlights, how a drag turns into a range, and how the
//! recurrence editor maps to and from rule text.

mod config;
mod date;
mod gesture;
mod grid;
mod pager;
mod recurrence;
mod session;
mod state;

pub use sublime_rrule::{ParseError, WeekDay};

pub use crate::config::{APP_NAME, Config, ConfigError, parse_weekday};
pub use crate::date::{
    DateBounds, DateError, DateRange, DateValue, LeapYearRule, MAX_YEAR, MIN_YEAR, RangeKind,
};
pub use crate::gesture::{GestureError, RangeGestureResolver, RangeSelectionListener};
pub use crate::grid::{ActivatedRange, CellShape, DayCell, MonthDescriptor, MonthGrid, project};
pub use crate::pager::MonthPager;
pub use crate::recurrence::{
    COUNT_DEFAULT, COUNT_RANGE, CodecError, Description, EndCondition, INTERVAL_RANGE, LAST_WEEK,
    MonthlyMode, RecurrenceChoice, RecurrenceCodec, RecurrenceModel, RecurrenceOption,
    RecurrenceState, RepeatFrequency, UNTIL_YEAR_RANGE, Unsupported, describe,
};
pub use crate::session::SelectionSession;
pub use crate::state::{SavedDateRange, SavedRecurrence, SavedState, StateError};
