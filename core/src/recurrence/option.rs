// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use sublime_rrule::{Frequency, RecurrenceRule};

use crate::recurrence::codec::{CodecError, RecurrenceCodec};
use crate::recurrence::model::{RecurrenceModel, RecurrenceState};

/// Entries of the recurrence menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[strum(serialize_all = "kebab-case")]
pub enum RecurrenceOption {
    DoesNotRepeat,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Custom,
}

impl RecurrenceOption {
    /// Canonical rule of a preset, `None` for [`RecurrenceOption::DoesNotRepeat`]
    /// and [`RecurrenceOption::Custom`].
    #[must_use]
    pub fn rule(self) -> Option<RecurrenceRule> {
        let freq = match self {
            Self::Daily => Frequency::Daily,
            Self::Weekly => Frequency::Weekly,
            Self::Monthly => Frequency::Monthly,
            Self::Yearly => Frequency::Yearly,
            Self::DoesNotRepeat | Self::Custom => return None,
        };
        Some(RecurrenceRule::new(freq))
    }

    const fn from_frequency(freq: Frequency) -> Option<Self> {
        match freq {
            Frequency::Daily => Some(Self::Daily),
            Frequency::Weekly => Some(Self::Weekly),
            Frequency::Monthly => Some(Self::Monthly),
            Frequency::Yearly => Some(Self::Yearly),
            _ => None,
        }
    }
}

/// What the host application receives once the picker is confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecurrenceChoice {
    /// One of the fixed menu entries, never [`RecurrenceOption::Custom`]
    Preset(RecurrenceOption),
    /// Any other rule, as text
    Custom(String),
}

impl RecurrenceChoice {
    /// Classify a rule handed over by the host.
    ///
    /// Blank or absent text means no recurrence. A rule that is just a
    /// frequency folds back to its preset, `WKST` aside; anything else,
    /// including text that does not parse, stays a custom rule.
    #[must_use]
    pub fn from_rule(text: Option<&str>) -> Self {
        let Some(text) = text.map(str::trim).filter(|text| !text.is_empty()) else {
            return Self::Preset(RecurrenceOption::DoesNotRepeat);
        };

        let preset = sublime_rrule::parse(text).ok().and_then(|mut rule| {
            rule.wkst = None;
            (rule == RecurrenceRule::new(rule.freq))
                .then(|| RecurrenceOption::from_frequency(rule.freq))
                .flatten()
        });

        match preset {
            Some(option) => Self::Preset(option),
            None => Self::Custom(text.to_string()),
        }
    }

    /// Confirmed editor state as a choice.
    ///
    /// ## Errors
    ///
    /// Fails if an active model cannot be encoded.
    pub fn from_model(model: &RecurrenceModel, codec: &RecurrenceCodec) -> Result<Self, CodecError> {
        match model.state() {
            RecurrenceState::None => Ok(Self::Preset(RecurrenceOption::DoesNotRepeat)),
            RecurrenceState::Active => {
                let text = codec.encode(model)?;
                Ok(Self::from_rule(Some(&text)))
            }
        }
    }

    #[must_use]
    pub const fn option(&self) -> RecurrenceOption {
        match self {
            Self::Preset(option) => *option,
            Self::Custom(_) => RecurrenceOption::Custom,
        }
    }

    /// Rule text to store, `None` when the event does not repeat.
    #[must_use]
    pub fn to_rule(&self) -> Option<String> {
        match self {
            Self::Preset(option) => option.rule().map(|rule| rule.to_string()),
            Self::Custom(text) => Some(text.clone()),
        }
    }
}
