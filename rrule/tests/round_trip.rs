// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use sublime_rrule::{Frequency, RecurrenceRule, WeekDay, WeekDayNum, parse};

#[test]
fn canonical_text_is_stable() {
    let cases = [
        "FREQ=DAILY",
        "FREQ=WEEKLY;INTERVAL=2;BYDAY=MO,WE,FR",
        "FREQ=MONTHLY;COUNT=5;BYDAY=-1FR",
        "FREQ=MONTHLY;UNTIL=20241231;BYMONTHDAY=15",
        "FREQ=YEARLY;UNTIL=19971224T000000Z;WKST=SU;BYMONTH=1,2",
        "FREQ=HOURLY;BYSECOND=0;BYMINUTE=15;BYHOUR=9",
        "FREQ=YEARLY;BYYEARDAY=1,-1;BYWEEKNO=20;BYSETPOS=-1",
    ];

    for src in cases {
        let rule = parse(src).unwrap();
        assert_eq!(rule.to_string(), src, "Canonical form changed for {src}");
    }
}

#[test]
fn parts_are_reordered_canonically() {
    let rule = parse("rrule:byday=tu;interval=3;freq=weekly;count=4").unwrap();
    assert_eq!(rule.to_string(), "FREQ=WEEKLY;COUNT=4;INTERVAL=3;BYDAY=TU");
}

#[test]
fn built_rule_parses_back() {
    let mut rule = RecurrenceRule::new(Frequency::Monthly);
    rule.interval = Some(6);
    rule.by_day = vec![WeekDayNum::nth(WeekDay::Thursday, 3)];

    let text = rule.to_string();
    assert_eq!(text, "FREQ=MONTHLY;INTERVAL=6;BYDAY=3TH");
    assert_eq!(text.parse::<RecurrenceRule>().unwrap(), rule);
}

#[test]
fn error_message_is_readable() {
    let err = parse("INTERVAL=2;COUNT=3").unwrap_err();
    assert!(
        err.to_string().contains("invalid recurrence rule"),
        "unexpected message: {err}"
    );
}
