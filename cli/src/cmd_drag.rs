// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{borrow::Cow, error::Error};

use clap::{ArgMatches, Command, arg};
use colored::{Color, Colorize};
use sublime_core::{Config, DateRange, MonthPager, RangeSelectionListener, SelectionSession};

use crate::arg::{ArgOutputFormat, Hit, parse_hit};
use crate::table::{Table, TableColumn};

/// Replay a press, move and release over the month pages.
#[derive(Debug, Clone)]
pub struct CmdDrag {
    pub hits: Vec<Hit>,
    pub cancel: bool,
    pub output_format: ArgOutputFormat,
}

impl CmdDrag {
    pub const NAME: &str = "drag";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Simulate a drag across the month pages")
            .long_about(
                "\
Simulate a drag across the month pages. The first hit presses, the last one \
releases and every hit in between moves the pointer. A hit is either PAGE:DAY \
or a date. A single hit is a tap.",
            )
            .arg(
                arg!(hits: <HIT> ... "Days the pointer touches, PAGE:DAY or YYYY-MM-DD")
                    .value_parser(parse_hit),
            )
            .arg(arg!(--cancel "Abandon the drag instead of releasing it"))
            .arg(ArgOutputFormat::arg())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            hits: matches
                .get_many("hits")
                .map(|hits| hits.copied().collect())
                .unwrap_or_default(),
            cancel: matches.get_flag("cancel"),
            output_format: ArgOutputFormat::from(matches),
        }
    }

    pub fn run(self, config: &Config) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "replaying drag...");
        let (selection, events) = self.replay(config)?;

        print!(
            "{}",
            Table::new(&DragColumn::ALL, &events).with_output_format(self.output_format)
        );
        if self.output_format == ArgOutputFormat::Table {
            match selection {
                Some(range) => println!("{} {range}", "Selected:".green()),
                None => println!("{}", "Nothing selected".italic()),
            }
        }
        Ok(())
    }

    /// Feed the hits to a session, returning the committed selection and
    /// what the listener saw.
    pub fn replay(
        &self,
        config: &Config,
    ) -> Result<(Option<DateRange>, Vec<DragEvent>), Box<dyn Error>> {
        let mut session = SelectionSession::with_listener(
            config.pager()?,
            config.can_pick_date_range,
            Recorder::default(),
        );

        let (first, rest) = self.hits.split_first().ok_or("at least one hit is required")?;
        let (page, day) = locate(session.pager(), *first)?;

        if rest.is_empty() && !self.cancel {
            session.tap(page, day)?;
            let events = vec![DragEvent::new(DragEventKind::Tapped, session.selection())];
            return Ok((session.selection(), events));
        }

        session.drag_begin(page, day)?;
        let mut last = (page, day);
        let (moves, release) = match (self.cancel, rest.split_last()) {
            (false, Some((release, moves))) => (moves, Some(release)),
            _ => (rest, None),
        };

        for hit in moves {
            let moved = locate(session.pager(), *hit).and_then(|(page, day)| {
                session.drag_update(page, day)?;
                Ok((page, day))
            });
            match moved {
                Ok(hit) => last = hit,
                Err(err) => {
                    tracing::warn!(%err, ?hit, "pointer moved over a day that cannot be selected");
                    session.listener_mut().push(DragEvent::skipped(*hit));
                }
            }
        }

        match release {
            Some(hit) => {
                let (page, day) = locate(session.pager(), *hit).unwrap_or_else(|err| {
                    tracing::warn!(%err, ?hit, "released outside the pages");
                    last
                });
                session.drag_end(page, day)?;
            }
            None => {
                session.drag_cancel();
            }
        }

        let events = std::mem::take(&mut session.listener_mut().events);
        Ok((session.selection(), events))
    }
}

fn locate(pager: &MonthPager, hit: Hit) -> Result<(usize, u8), Box<dyn Error>> {
    match hit {
        Hit::Page { page, day } => Ok((page, day)),
        Hit::Date(date) => pager
            .page_of(date.year(), date.month())
            .map(|page| (page, date.day()))
            .ok_or_else(|| format!("{date} is outside the selectable dates").into()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragEventKind {
    Tapped,
    Started,
    Updated,
    Ended,
    Cancelled,
    Skipped,
}

impl DragEventKind {
    fn as_str(self) -> &'static str {
        match self {
            DragEventKind::Tapped => "tapped",
            DragEventKind::Started => "started",
            DragEventKind::Updated => "updated",
            DragEventKind::Ended => "ended",
            DragEventKind::Cancelled => "cancelled",
            DragEventKind::Skipped => "skipped",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragEvent {
    pub kind: DragEventKind,
    pub detail: String,
}

impl DragEvent {
    fn new(kind: DragEventKind, range: Option<DateRange>) -> Self {
        Self {
            kind,
            detail: range.map(|r| r.to_string()).unwrap_or_default(),
        }
    }

    fn skipped(hit: Hit) -> Self {
        let detail = match hit {
            Hit::Page { page, day } => format!("{page}:{day}"),
            Hit::Date(date) => date.to_string(),
        };
        Self {
            kind: DragEventKind::Skipped,
            detail,
        }
    }
}

#[derive(Debug, Default)]
pub struct Recorder {
    events: Vec<DragEvent>,
}

impl Recorder {
    fn push(&mut self, event: DragEvent) {
        self.events.push(event);
    }
}

impl RangeSelectionListener for Recorder {
    fn on_range_selection_started(&mut self, range: DateRange) {
        self.push(DragEvent::new(DragEventKind::Started, Some(range)));
    }

    fn on_range_selection_updated(&mut self, range: DateRange) {
        self.push(DragEvent::new(DragEventKind::Updated, Some(range)));
    }

    fn on_range_selection_ended(&mut self, range: DateRange) {
        self.push(DragEvent::new(DragEventKind::Ended, Some(range)));
    }

    fn on_range_selection_cancelled(&mut self) {
        self.push(DragEvent::new(DragEventKind::Cancelled, None));
    }
}

#[derive(Debug, Clone, Copy)]
enum DragColumn {
    Event,
    Range,
}

impl DragColumn {
    const ALL: [DragColumn; 2] = [DragColumn::Event, DragColumn::Range];
}

impl TableColumn<DragEvent> for DragColumn {
    fn name(&self) -> Cow<'_, str> {
        match self {
            DragColumn::Event => "event".into(),
            DragColumn::Range => "range".into(),
        }
    }

    fn format<'a>(&self, data: &'a DragEvent) -> Cow<'a, str> {
        match self {
            DragColumn::Event => data.kind.as_str().into(),
            DragColumn::Range => data.detail.as_str().into(),
        }
    }

    fn color(&self, data: &DragEvent) -> Option<Color> {
        match (self, data.kind) {
            (DragColumn::Event, DragEventKind::Skipped) => Some(Color::Yellow),
            (DragColumn::Event, DragEventKind::Cancelled) => Some(Color::Red),
            (DragColumn::Event, DragEventKind::Ended | DragEventKind::Tapped) => Some(Color::Green),
            _ => None,
        }
    }
}
