// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Parse and format recurrence rules in the iCalendar `RRULE` syntax.

#![warn(
    trivial_casts,
    trivial_numeric_casts,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications,
    clippy::dbg_macro,
    clippy::indexing_slicing,
    clippy::pedantic
)]
// Allow certain clippy lints that are too restrictive for this crate
#![allow(clippy::single_match_else, clippy::match_bool)]

mod error;
mod keyword;
mod parser;
mod rule;

pub use crate::error::ParseError;
pub use crate::parser::parse;
pub use crate::rule::{Frequency, RecurrenceRule, Until, UntilTime, WeekDay, WeekDayNum};
