// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! The `sublime` command-line interface.

mod arg;
mod cli;
mod cmd_drag;
mod cmd_generate_completion;
mod cmd_month;
mod cmd_rrule;
mod config;
mod month_formatter;
mod table;

pub use crate::cli::{Cli, Commands, run};
