// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use sublime_rrule::{Frequency, WeekDay};

use crate::date::{DateValue, MAX_YEAR};

/// Smallest and largest repeat interval the editor accepts.
pub const INTERVAL_RANGE: (u32, u32) = (1, 99);

/// Smallest and largest occurrence count the editor accepts.
pub const COUNT_RANGE: (u32, u32) = (1, 730);

/// Occurrence count shown when the editor opens.
pub const COUNT_DEFAULT: u32 = 5;

/// Nth weekday value meaning "last in the month".
pub const LAST_WEEK: i8 = -1;

/// Years an end date may have, bounded by the four digits of `UNTIL`.
pub const UNTIL_YEAR_RANGE: (i16, i16) = (0, MAX_YEAR);

/// Whether the user turned recurrence on.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "UPPERCASE")]
pub enum RecurrenceState {
    /// Does not repeat
    #[default]
    None,
    /// Repeats according to the model
    Active,
}

/// Frequencies the editor can express.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[strum(serialize_all = "UPPERCASE")]
pub enum RepeatFrequency {
    /// Every day, or every `interval` days
    Daily,
    /// On the checked weekdays
    #[default]
    Weekly,
    /// On a month day or an nth weekday
    Monthly,
    /// On the start date's anniversary
    Yearly,
}

impl From<RepeatFrequency> for Frequency {
    fn from(freq: RepeatFrequency) -> Self {
        match freq {
            RepeatFrequency::Daily => Frequency::Daily,
            RepeatFrequency::Weekly => Frequency::Weekly,
            RepeatFrequency::Monthly => Frequency::Monthly,
            RepeatFrequency::Yearly => Frequency::Yearly,
        }
    }
}

impl TryFrom<Frequency> for RepeatFrequency {
    type Error = Frequency;

    fn try_from(freq: Frequency) -> Result<Self, Self::Error> {
        match freq {
            Frequency::Daily => Ok(Self::Daily),
            Frequency::Weekly => Ok(Self::Weekly),
            Frequency::Monthly => Ok(Self::Monthly),
            Frequency::Yearly => Ok(Self::Yearly),
            other => Err(other),
        }
    }
}

/// When the recurrence stops.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum EndCondition {
    /// Repeats forever
    #[default]
    Never,
    /// Repeats until `end_date`, inclusive
    ByDate,
    /// Repeats `end_count` times
    ByCount,
}

/// How a monthly recurrence picks its day.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum MonthlyMode {
    /// Same day number every month, e.g. the 15th
    #[default]
    ByMonthDay,
    /// Nth weekday of the month, e.g. the last Friday
    ByNthWeekday,
}

/// What the recurrence editor holds while the user edits it.
///
/// Every mutator activates the model. Fields of other frequencies are kept
/// when the frequency changes, so switching back restores them. `interval`
/// and `end_count` are `None` while the user has blanked the input field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceModel {
    pub(crate) state: RecurrenceState,
    pub(crate) freq: RepeatFrequency,
    pub(crate) interval: Option<u32>,
    pub(crate) end: EndCondition,
    pub(crate) end_date: Option<DateValue>,
    pub(crate) end_count: Option<u32>,
    pub(crate) weekly_by_day: [bool; 7],
    pub(crate) monthly_mode: MonthlyMode,
    pub(crate) monthly_by_month_day: Option<u8>,
    pub(crate) monthly_by_weekday: WeekDay,
    pub(crate) monthly_by_nth_weekday: i8,
}

impl Default for RecurrenceModel {
    fn default() -> Self {
        Self {
            state: RecurrenceState::None,
            freq: RepeatFrequency::Weekly,
            interval: Some(INTERVAL_RANGE.0),
            end: EndCondition::Never,
            end_date: None,
            end_count: Some(COUNT_DEFAULT),
            weekly_by_day: [false; 7],
            monthly_mode: MonthlyMode::ByMonthDay,
            monthly_by_month_day: None,
            monthly_by_weekday: WeekDay::Sunday,
            monthly_by_nth_weekday: 1,
        }
    }
}

impl RecurrenceModel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn state(&self) -> RecurrenceState {
        self.state
    }

    #[must_use]
    pub const fn freq(&self) -> RepeatFrequency {
        self.freq
    }

    #[must_use]
    pub const fn interval(&self) -> Option<u32> {
        self.interval
    }

    #[must_use]
    pub const fn end(&self) -> EndCondition {
        self.end
    }

    #[must_use]
    pub const fn end_date(&self) -> Option<DateValue> {
        self.end_date
    }

    #[must_use]
    pub const fn end_count(&self) -> Option<u32> {
        self.end_count
    }

    /// Checked weekdays, Sunday first.
    #[must_use]
    pub const fn weekly_by_day(&self) -> [bool; 7] {
        self.weekly_by_day
    }

    #[must_use]
    pub const fn is_weekday_checked(&self, day: WeekDay) -> bool {
        self.weekly_by_day[day.index()]
    }

    /// Checked weekdays in Sunday-first order.
    pub fn checked_weekdays(&self) -> impl Iterator<Item = WeekDay> + '_ {
        WeekDay::ALL
            .into_iter()
            .filter(|day| self.is_weekday_checked(*day))
    }

    #[must_use]
    pub const fn monthly_mode(&self) -> MonthlyMode {
        self.monthly_mode
    }

    #[must_use]
    pub const fn monthly_by_month_day(&self) -> Option<u8> {
        self.monthly_by_month_day
    }

    #[must_use]
    pub const fn monthly_by_weekday(&self) -> WeekDay {
        self.monthly_by_weekday
    }

    /// 1 to 5, or [`LAST_WEEK`].
    #[must_use]
    pub const fn monthly_by_nth_weekday(&self) -> i8 {
        self.monthly_by_nth_weekday
    }

    pub fn set_frequency(&mut self, freq: RepeatFrequency) {
        self.activate();
        self.freq = freq;
    }

    /// Set the interval, clamped to [`INTERVAL_RANGE`].
    pub fn set_interval(&mut self, interval: u32) {
        self.activate();
        self.interval = Some(interval.clamp(INTERVAL_RANGE.0, INTERVAL_RANGE.1));
    }

    /// The interval field was emptied.
    pub fn clear_interval(&mut self) {
        self.activate();
        self.interval = None;
    }

    pub fn set_end_never(&mut self) {
        self.activate();
        self.end = EndCondition::Never;
    }

    pub fn set_end_by_date(&mut self, date: DateValue) {
        self.activate();
        self.end = EndCondition::ByDate;
        self.end_date = Some(date);
    }

    /// End after `count` occurrences, clamped to [`COUNT_RANGE`].
    pub fn set_end_by_count(&mut self, count: u32) {
        self.activate();
        self.end = EndCondition::ByCount;
        self.end_count = Some(count.clamp(COUNT_RANGE.0, COUNT_RANGE.1));
    }

    /// The count field was emptied.
    pub fn clear_end_count(&mut self) {
        self.activate();
        self.end_count = None;
    }

    pub fn toggle_weekday(&mut self, day: WeekDay, on: bool) {
        self.activate();
        self.weekly_by_day[day.index()] = on;
    }

    pub fn set_monthly_mode(&mut self, mode: MonthlyMode) {
        self.activate();
        self.monthly_mode = mode;
    }

    /// Set the day of a by-month-day rule, clamped to 1..=31.
    pub fn set_monthly_month_day(&mut self, day: u8) {
        self.activate();
        self.monthly_by_month_day = Some(day.clamp(1, 31));
    }

    /// Set the weekday of a by-nth-weekday rule.
    ///
    /// Values above 5 and negative values are taken as the last week of
    /// the month, 0 as the first week.
    pub fn set_monthly_nth_weekday(&mut self, weekday: WeekDay, nth: i8) {
        self.activate();
        self.monthly_by_weekday = weekday;
        self.monthly_by_nth_weekday = match nth {
            1..=5 => nth,
            0 => 1,
            _ => LAST_WEEK,
        };
    }

    /// Turn recurrence off. Field values are kept for a later re-activation.
    pub fn clear(&mut self) {
        if self.state == RecurrenceState::Active {
            tracing::debug!("recurrence cleared");
        }
        self.state = RecurrenceState::None;
    }

    /// Fill the fields the user has not touched from the event start date.
    ///
    /// The weekly day becomes the start weekday if none is checked, the
    /// monthly day becomes the start day, and the nth weekday is the week of
    /// the month the start falls in. A fifth week is shown as the last one.
    /// Seeding does not activate the model.
    pub fn seed_from_start(&mut self, start: DateValue) {
        let weekday = start.weekday();
        if !self.weekly_by_day.contains(&true) {
            self.weekly_by_day[weekday.index()] = true;
        }

        if self.monthly_by_month_day.is_none() {
            self.monthly_by_month_day = Some(start.day());
        }

        if self.monthly_mode != MonthlyMode::ByNthWeekday {
            let nth = (start.day() + 6) / 7;
            self.monthly_by_weekday = weekday;
            #[allow(clippy::cast_possible_wrap)]
            let nth = nth as i8;
            self.monthly_by_nth_weekday = if nth >= 5 { LAST_WEEK } else { nth };
        }
    }

    /// Whether the editor may be confirmed in its current state.
    #[must_use]
    pub fn can_confirm(&self) -> bool {
        match self.state {
            RecurrenceState::None => true,
            RecurrenceState::Active => {
                self.interval.is_some()
                    && (self.freq != RepeatFrequency::Weekly || self.weekly_by_day.contains(&true))
                    && (self.end != EndCondition::ByCount || self.end_count.is_some())
                    && (self.end != EndCondition::ByDate
                        || self.end_date.is_some_and(is_until_date))
            }
        }
    }

    /// Compare only the fields that matter for the current frequency and
    /// end condition.
    #[must_use]
    pub fn is_equivalent(&self, other: &Self) -> bool {
        if self.state != other.state {
            return false;
        }
        if self.state == RecurrenceState::None {
            return true;
        }

        let end = match self.end {
            EndCondition::Never => true,
            EndCondition::ByDate => self.end_date == other.end_date,
            EndCondition::ByCount => self.end_count == other.end_count,
        };

        let by_freq = match self.freq {
            RepeatFrequency::Daily | RepeatFrequency::Yearly => true,
            RepeatFrequency::Weekly => self.weekly_by_day == other.weekly_by_day,
            RepeatFrequency::Monthly => {
                self.monthly_mode == other.monthly_mode
                    && match self.monthly_mode {
                        MonthlyMode::ByMonthDay => {
                            self.monthly_by_month_day == other.monthly_by_month_day
                        }
                        MonthlyMode::ByNthWeekday => {
                            self.monthly_by_weekday == other.monthly_by_weekday
                                && self.monthly_by_nth_weekday == other.monthly_by_nth_weekday
                        }
                    }
            }
        };

        self.freq == other.freq
            && self.interval == other.interval
            && self.end == other.end
            && end
            && by_freq
    }

    fn activate(&mut self) {
        if self.state == RecurrenceState::None {
            tracing::debug!("recurrence activated");
            self.state = RecurrenceState::Active;
        }
    }
}

/// Whether `date` fits the date form of `UNTIL`.
pub(crate) fn is_until_date(date: DateValue) -> bool {
    (UNTIL_YEAR_RANGE.0..=UNTIL_YEAR_RANGE.1).contains(&date.year())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i16, month: u8, day: u8) -> DateValue {
        DateValue::new(year, month, day).unwrap()
    }

    #[test]
    fn starts_inactive_and_confirmable() {
        let model = RecurrenceModel::new();
        assert_eq!(model.state(), RecurrenceState::None);
        assert!(model.can_confirm());
    }

    #[test]
    fn any_mutation_activates() {
        let mut model = RecurrenceModel::new();
        model.set_end_never();
        assert_eq!(model.state(), RecurrenceState::Active);

        model.clear();
        assert_eq!(model.state(), RecurrenceState::None);
        model.set_interval(3);
        assert_eq!(model.state(), RecurrenceState::Active);
    }

    #[test]
    fn clamps_interval_and_count() {
        let mut model = RecurrenceModel::new();
        model.set_interval(0);
        assert_eq!(model.interval(), Some(1));
        model.set_interval(150);
        assert_eq!(model.interval(), Some(99));

        model.set_end_by_count(0);
        assert_eq!(model.end_count(), Some(1));
        model.set_end_by_count(1000);
        assert_eq!(model.end_count(), Some(730));
        assert_eq!(model.end(), EndCondition::ByCount);
    }

    #[test]
    fn weekly_needs_a_weekday() {
        let mut model = RecurrenceModel::new();
        model.set_frequency(RepeatFrequency::Weekly);
        model.set_interval(2);
        model.set_end_by_count(10);
        assert!(!model.can_confirm());

        model.toggle_weekday(WeekDay::Wednesday, true);
        assert!(model.can_confirm());

        model.toggle_weekday(WeekDay::Wednesday, false);
        assert!(!model.can_confirm());
    }

    #[test]
    fn blank_fields_block_confirm() {
        let mut model = RecurrenceModel::new();
        model.set_frequency(RepeatFrequency::Daily);
        model.clear_interval();
        assert!(!model.can_confirm());
        model.set_interval(1);
        assert!(model.can_confirm());

        model.set_end_by_count(3);
        model.clear_end_count();
        assert!(!model.can_confirm());
        model.set_end_never();
        assert!(model.can_confirm());
    }

    #[test]
    fn keeps_fields_across_frequency_switches() {
        let mut model = RecurrenceModel::new();
        model.set_frequency(RepeatFrequency::Weekly);
        model.toggle_weekday(WeekDay::Monday, true);
        model.set_frequency(RepeatFrequency::Monthly);
        model.set_monthly_month_day(15);
        model.set_frequency(RepeatFrequency::Weekly);

        assert!(model.is_weekday_checked(WeekDay::Monday));
        assert_eq!(model.monthly_by_month_day(), Some(15));
    }

    #[test]
    fn collapses_nth_weekday_past_five() {
        let mut model = RecurrenceModel::new();
        model.set_monthly_nth_weekday(WeekDay::Friday, 5);
        assert_eq!(model.monthly_by_nth_weekday(), 5);
        model.set_monthly_nth_weekday(WeekDay::Friday, 6);
        assert_eq!(model.monthly_by_nth_weekday(), LAST_WEEK);
        model.set_monthly_nth_weekday(WeekDay::Friday, -1);
        assert_eq!(model.monthly_by_nth_weekday(), LAST_WEEK);
        model.set_monthly_nth_weekday(WeekDay::Friday, -3);
        assert_eq!(model.monthly_by_nth_weekday(), LAST_WEEK);
    }

    #[test]
    fn takes_nth_weekday_zero_as_first() {
        let mut model = RecurrenceModel::new();
        model.set_monthly_nth_weekday(WeekDay::Friday, 0);
        assert_eq!(model.monthly_by_nth_weekday(), 1);
    }

    #[test]
    fn end_date_must_fit_four_digit_year() {
        let mut model = RecurrenceModel::new();
        model.set_frequency(RepeatFrequency::Daily);
        for year in [0, 999, 9999] {
            model.set_end_by_date(date(year, 0, 1));
            assert!(model.can_confirm(), "year {year}");
        }
        for year in [-1, -44, -9999] {
            model.set_end_by_date(date(year, 2, 15));
            assert!(!model.can_confirm(), "year {year}");
        }
    }

    #[test]
    fn seeds_from_start_date() {
        // 2024-05-31 is a Friday in the fifth week
        let mut model = RecurrenceModel::new();
        model.seed_from_start(date(2024, 4, 31));
        assert_eq!(model.state(), RecurrenceState::None);
        assert_eq!(
            model.checked_weekdays().collect::<Vec<_>>(),
            vec![WeekDay::Friday]
        );
        assert_eq!(model.monthly_by_month_day(), Some(31));
        assert_eq!(model.monthly_by_weekday(), WeekDay::Friday);
        assert_eq!(model.monthly_by_nth_weekday(), LAST_WEEK);

        // 2024-01-09 is the second Tuesday
        let mut model = RecurrenceModel::new();
        model.toggle_weekday(WeekDay::Monday, true);
        model.seed_from_start(date(2024, 0, 9));
        assert_eq!(
            model.checked_weekdays().collect::<Vec<_>>(),
            vec![WeekDay::Monday]
        );
        assert_eq!(model.monthly_by_weekday(), WeekDay::Tuesday);
        assert_eq!(model.monthly_by_nth_weekday(), 2);
    }

    #[test]
    fn equivalence_ignores_unused_fields() {
        let mut a = RecurrenceModel::new();
        a.set_frequency(RepeatFrequency::Daily);
        let mut b = a.clone();
        b.toggle_weekday(WeekDay::Monday, true);
        b.set_monthly_month_day(3);
        assert!(a.is_equivalent(&b));

        b.set_interval(2);
        assert!(!a.is_equivalent(&b));
    }

    #[test]
    fn converts_frequencies() {
        assert_eq!(
            RepeatFrequency::try_from(Frequency::Monthly),
            Ok(RepeatFrequency::Monthly)
        );
        assert_eq!(
            RepeatFrequency::try_from(Frequency::Hourly),
            Err(Frequency::Hourly)
        );
        assert_eq!(Frequency::from(RepeatFrequency::Yearly), Frequency::Yearly);
        assert_eq!(RepeatFrequency::Weekly.to_string(), "WEEKLY");
        assert_eq!(EndCondition::ByCount.to_string(), "BY_COUNT");
        assert_eq!("BY_NTH_WEEKDAY".parse(), Ok(MonthlyMode::ByNthWeekday));
    }
}
