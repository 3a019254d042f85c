// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::borrow::Cow;
use std::ops::Range;

use chumsky::error::{Rich, RichPattern};

/// Failure reasons reported by the grammar beyond plain token mismatches.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Expected {
    /// A rule part appeared more than once
    DuplicatePart,
    /// The FREQ rule part is missing
    RequiredFreq,
    /// Unknown frequency name
    Frequency,
    /// Unknown weekday name
    WeekDay,
    /// Number does not fit its rule part
    OutOfRange,
    /// COUNT and INTERVAL must be positive
    PositiveNumber,
    /// Digits do not form a number
    Number,
}

impl From<Expected> for RichPattern<'_, char> {
    fn from(expected: Expected) -> Self {
        let label = match expected {
            Expected::DuplicatePart => "rule parts must not occur more than once",
            Expected::RequiredFreq => "the FREQ rule part is required",
            Expected::Frequency => "a frequency (SECONDLY .. YEARLY)",
            Expected::WeekDay => "a weekday (SU, MO, TU, WE, TH, FR, SA)",
            Expected::OutOfRange => "a number within the range of the rule part",
            Expected::PositiveNumber => "a positive number",
            Expected::Number => "a number",
        };
        Self::Label(Cow::Borrowed(label))
    }
}

/// Error raised when a recurrence rule does not follow the grammar.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid recurrence rule: {message} (at {}..{})", .span.start, .span.end)]
pub struct ParseError {
    /// What went wrong
    pub message: String,
    /// Byte range of the offending input
    pub span: Range<usize>,
}

impl From<Rich<'_, char>> for ParseError {
    fn from(err: Rich<'_, char>) -> Self {
        Self {
            message: err.reason().to_string(),
            span: err.span().into_range(),
        }
    }
}
