// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{borrow::Cow, fmt};

use colored::{Color, Colorize};
use unicode_width::UnicodeWidthStr;

use crate::arg::ArgOutputFormat;

pub struct Table<'a, T, C: TableColumn<T>> {
    columns: &'a [C],
    data: &'a [T],
    format: ArgOutputFormat,
    separator: &'static str,
}

impl<'a, T, C: TableColumn<T>> Table<'a, T, C> {
    pub fn new(columns: &'a [C], data: &'a [T]) -> Self {
        Self {
            columns,
            data,
            format: ArgOutputFormat::Table,
            separator: "  ",
        }
    }

    pub fn with_output_format(mut self, format: ArgOutputFormat) -> Self {
        self.format = format;
        self
    }

    fn cells(&self) -> Vec<Vec<Cow<'a, str>>> {
        self.data
            .iter()
            .map(|row| self.columns.iter().map(|col| col.format(row)).collect())
            .collect()
    }

    fn fmt_table(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells = self.cells();
        let widths = get_column_max_width(self.columns, &cells);

        for (row, data) in cells.iter().zip(self.data) {
            for (i, (col, cell)) in self.columns.iter().zip(row).enumerate() {
                let last = i + 1 == self.columns.len();
                let pad = widths[i].saturating_sub(cell.width());
                let cell = match col.color(data) {
                    Some(color) => cell.color(color).to_string(),
                    None => cell.to_string(),
                };

                match col.padding_direction() {
                    PaddingDirection::Left if last => write!(f, "{cell}")?,
                    PaddingDirection::Left => write!(f, "{cell}{:pad$}", "")?,
                    PaddingDirection::Right => write!(f, "{:pad$}{cell}", "")?,
                }

                if last {
                    writeln!(f)?;
                } else {
                    write!(f, "{}", self.separator)?;
                }
            }
        }
        Ok(())
    }

    fn fmt_json(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows: Vec<serde_json::Map<String, serde_json::Value>> = self
            .cells()
            .into_iter()
            .map(|row| {
                self.columns
                    .iter()
                    .zip(row)
                    .map(|(col, cell)| (col.name().into_owned(), cell.into_owned().into()))
                    .collect()
            })
            .collect();

        let json = serde_json::to_string_pretty(&rows).map_err(|_| fmt::Error)?;
        writeln!(f, "{json}")
    }
}

impl<T, C: TableColumn<T>> fmt::Display for Table<'_, T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.format {
            ArgOutputFormat::Json => self.fmt_json(f),
            ArgOutputFormat::Table => self.fmt_table(f),
        }
    }
}

pub trait TableColumn<T> {
    /// Key of the column in JSON output
    fn name(&self) -> Cow<'_, str>;

    fn format<'a>(&self, data: &'a T) -> Cow<'a, str>;

    fn padding_direction(&self) -> PaddingDirection {
        PaddingDirection::Left
    }

    fn color(&self, _data: &T) -> Option<Color> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaddingDirection {
    Left,
    Right,
}

fn get_column_max_width<T, C: TableColumn<T>>(columns: &[C], cells: &[Vec<Cow<'_, str>>]) -> Vec<usize> {
    let mut max_width = vec![0; columns.len()];
    for row in cells {
        for (i, cell) in row.iter().enumerate() {
            max_width[i] = max_width[i].max(cell.width());
        }
    }
    max_width
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Pair(&'static str, &'static str);

    enum PairColumn {
        Key,
        Value,
    }

    impl TableColumn<Pair> for PairColumn {
        fn name(&self) -> Cow<'_, str> {
            match self {
                PairColumn::Key => "key",
                PairColumn::Value => "value",
            }
            .into()
        }

        fn format<'a>(&self, data: &'a Pair) -> Cow<'a, str> {
            match self {
                PairColumn::Key => data.0.into(),
                PairColumn::Value => data.1.into(),
            }
        }

        fn padding_direction(&self) -> PaddingDirection {
            match self {
                PairColumn::Key => PaddingDirection::Right,
                PairColumn::Value => PaddingDirection::Left,
            }
        }
    }

    fn data() -> Vec<Pair> {
        vec![Pair("freq", "WEEKLY"), Pair("interval", "2"), Pair("星期", "一")]
    }

    #[test]
    fn pads_by_display_width() {
        let columns = [PairColumn::Key, PairColumn::Value];
        let data = data();
        let out = Table::new(&columns, &data).to_string();
        assert_eq!(out, "    freq  WEEKLY\ninterval  2\n    星期  一\n");
    }

    #[test]
    fn renders_json_objects() {
        let columns = [PairColumn::Key, PairColumn::Value];
        let data = data();
        let out = Table::new(&columns, &data)
            .with_output_format(ArgOutputFormat::Json)
            .to_string();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[1]["key"], "interval");
        assert_eq!(value[1]["value"], "2");
        assert_eq!(value.as_array().map(Vec::len), Some(3));
    }
}
