// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

mod codec;
mod describe;
mod model;
mod option;

pub use crate::recurrence::codec::{CodecError, RecurrenceCodec, Unsupported};
pub use crate::recurrence::describe::{Description, describe};
pub use crate::recurrence::model::{
    COUNT_DEFAULT, COUNT_RANGE, EndCondition, INTERVAL_RANGE, LAST_WEEK, MonthlyMode,
    RecurrenceModel, RecurrenceState, RepeatFrequency, UNTIL_YEAR_RANGE,
};
pub use crate::recurrence::option::{RecurrenceChoice, RecurrenceOption};
