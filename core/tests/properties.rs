// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use sublime_core::{
    ActivatedRange, CodecError, DateBounds, DateRange, DateValue, EndCondition, LeapYearRule,
    MonthDescriptor, MonthPager, MonthlyMode, RangeGestureResolver, RangeKind, RecurrenceCodec,
    RecurrenceModel, RepeatFrequency, Unsupported, WeekDay, project,
};

fn date(year: i16, month: u8, day: u8) -> DateValue {
    DateValue::new(year, month, day).unwrap()
}

fn page(year: i16, month: u8) -> MonthDescriptor {
    MonthDescriptor::new(
        year,
        month,
        WeekDay::Sunday,
        &DateBounds::default(),
        LeapYearRule::Simplified,
    )
    .unwrap()
}

/// Models an editor session can produce and confirm.
fn edited_models() -> Vec<RecurrenceModel> {
    let mut models = Vec::new();

    let mut daily = RecurrenceModel::new();
    daily.set_frequency(RepeatFrequency::Daily);
    models.push(daily.clone());
    daily.set_interval(3);
    daily.set_end_by_count(730);
    models.push(daily);

    let mut weekly = RecurrenceModel::new();
    weekly.set_frequency(RepeatFrequency::Weekly);
    weekly.set_interval(2);
    for day in [WeekDay::Sunday, WeekDay::Wednesday, WeekDay::Saturday] {
        weekly.toggle_weekday(day, true);
    }
    weekly.set_end_by_date(date(2024, 1, 29));
    models.push(weekly);

    let mut by_day = RecurrenceModel::new();
    by_day.set_frequency(RepeatFrequency::Monthly);
    by_day.set_monthly_mode(MonthlyMode::ByMonthDay);
    by_day.set_monthly_month_day(31);
    by_day.set_end_by_count(1);
    models.push(by_day);

    for nth in [1, 2, 5, -1] {
        let mut by_nth = RecurrenceModel::new();
        by_nth.set_frequency(RepeatFrequency::Monthly);
        by_nth.set_monthly_mode(MonthlyMode::ByNthWeekday);
        by_nth.set_monthly_nth_weekday(WeekDay::Thursday, nth);
        by_nth.set_interval(99);
        models.push(by_nth);
    }

    let mut yearly = RecurrenceModel::new();
    yearly.set_frequency(RepeatFrequency::Yearly);
    yearly.set_end_by_date(date(2100, 11, 31));
    models.push(yearly);

    let mut seeded = RecurrenceModel::new();
    seeded.seed_from_start(date(2024, 4, 31));
    seeded.set_frequency(RepeatFrequency::Monthly);
    seeded.set_monthly_mode(MonthlyMode::ByNthWeekday);
    models.push(seeded);

    models
}

#[test]
fn decode_of_encode_keeps_the_intent() {
    let codec = RecurrenceCodec::default();
    for model in edited_models() {
        assert!(model.can_confirm(), "{model:?} is not confirmable");
        let text = codec.encode(&model).unwrap();
        assert!(codec.is_representable(&text), "{text} is not editable");

        let decoded = codec.decode(&text).unwrap();
        assert!(
            decoded.is_equivalent(&model),
            "{text} decoded to {decoded:?}, expected {model:?}"
        );
    }
}

#[test]
fn end_dates_at_year_limits_survive_the_codec() {
    let codec = RecurrenceCodec::default();
    for end in [date(0, 0, 1), date(999, 11, 31), date(9999, 11, 31)] {
        let mut model = RecurrenceModel::new();
        model.set_frequency(RepeatFrequency::Weekly);
        model.set_end_by_date(end);
        assert!(model.can_confirm(), "{end} is not confirmable");

        let text = codec.encode(&model).unwrap();
        assert!(codec.is_representable(&text), "{text} is not editable");
        let decoded = codec.decode(&text).unwrap();
        assert_eq!(decoded.end(), EndCondition::ByDate);
        assert_eq!(decoded.end_date(), Some(end));
        assert!(decoded.is_equivalent(&model), "{text} decoded to {decoded:?}");
    }

    let mut negative = RecurrenceModel::new();
    negative.set_frequency(RepeatFrequency::Weekly);
    negative.set_end_by_date(date(-1, 11, 31));
    assert!(!negative.can_confirm());
    assert!(matches!(
        codec.encode(&negative),
        Err(CodecError::InvalidModelState(_))
    ));
}

#[test]
fn range_is_normalized_in_either_order() {
    let dates = [date(2023, 11, 31), date(2024, 0, 1), date(2024, 1, 29)];
    for a in dates {
        for b in dates {
            let range = DateRange::new(a, b);
            assert_eq!(range.start(), a.min(b));
            assert_eq!(range.end(), a.max(b));
            assert_eq!(range.kind() == RangeKind::Single, a == b);
            assert_eq!(range.first(), a);
            assert_eq!(range.second(), b);
        }
    }
}

#[test]
fn range_projects_onto_every_covered_page() {
    let range = DateRange::new(date(2024, 0, 20), date(2024, 2, 5));

    assert_eq!(
        project(Some(&range), &page(2024, 0)),
        ActivatedRange::new(20, 31, RangeKind::Range)
    );
    assert_eq!(
        project(Some(&range), &page(2024, 1)),
        ActivatedRange::new(1, 29, RangeKind::Range)
    );
    assert_eq!(
        project(Some(&range), &page(2024, 2)),
        ActivatedRange::new(1, 5, RangeKind::Range)
    );
    assert_eq!(
        project(Some(&range), &page(2024, 3)),
        ActivatedRange::inactive(RangeKind::Range)
    );
    assert!(!project(Some(&range), &page(2023, 11)).is_activated());
}

#[test]
fn reversed_range_projects_the_same() {
    let forward = DateRange::new(date(2023, 10, 28), date(2024, 1, 2));
    let backward = DateRange::new(date(2024, 1, 2), date(2023, 10, 28));
    for (year, month) in [(2023, 9), (2023, 10), (2023, 11), (2024, 0), (2024, 1), (2024, 2)] {
        let page = page(year, month);
        assert_eq!(project(Some(&forward), &page), project(Some(&backward), &page));
    }
}

#[test]
fn drag_keeps_anchor_and_takes_last_end() {
    let bounds = DateBounds::new(date(2024, 0, 1), date(2024, 11, 31)).unwrap();
    let pager = MonthPager::new(bounds, WeekDay::Monday, LeapYearRule::Simplified);
    let mut resolver = RangeGestureResolver::new(pager);

    resolver.begin(3, 10).unwrap();
    resolver.update(3, 15).unwrap();
    let range = resolver.end(3, 20).unwrap();

    assert_eq!(range.first(), date(2024, 3, 10));
    assert_eq!(range.second(), date(2024, 3, 20));
    assert_eq!(range.kind(), RangeKind::Range);
}

#[test]
fn rejects_count_with_until_and_two_month_days() {
    let codec = RecurrenceCodec::default();
    for (text, reason) in [
        (
            "FREQ=DAILY;COUNT=5;UNTIL=20241231",
            Unsupported::CountWithUntil,
        ),
        (
            "FREQ=MONTHLY;BYMONTHDAY=1,15",
            Unsupported::MultipleMonthDays,
        ),
    ] {
        assert_eq!(
            codec.decode(text),
            Err(CodecError::UnsupportedRuleShape(reason))
        );
        assert!(!codec.is_representable(text));
    }
}

#[test]
fn weekly_without_weekday_is_never_confirmable() {
    let mut model = RecurrenceModel::new();
    model.set_frequency(RepeatFrequency::Weekly);
    for end in [EndCondition::Never, EndCondition::ByCount, EndCondition::ByDate] {
        match end {
            EndCondition::Never => model.set_end_never(),
            EndCondition::ByCount => model.set_end_by_count(4),
            EndCondition::ByDate => model.set_end_by_date(date(2025, 5, 1)),
        }
        for interval in [1, 7, 99] {
            model.set_interval(interval);
            assert!(!model.can_confirm());
        }
    }

    for day in WeekDay::ALL {
        let mut model = model.clone();
        model.toggle_weekday(day, true);
        assert!(model.can_confirm());
    }
}
