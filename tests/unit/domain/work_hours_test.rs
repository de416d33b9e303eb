// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike, Weekday};
use watchdogs::domain::work_hours::evaluate;

/// 2020-03-09 (Monday) .. 2020-03-15, every 30 minutes
fn week() -> impl Iterator<Item = NaiveDateTime> {
    let start = NaiveDate::from_ymd_opt(2020, 3, 9)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    (0..7 * 48).map(move |step| start + Duration::minutes(30 * step))
}

#[test]
fn test_full_day_is_always_work_time() {
    assert!(week().all(|t| evaluate("0, 24", t).unwrap()));
}

#[test]
fn test_hour_list_membership() {
    for t in week() {
        let expected = [1, 2, 15].contains(&t.hour());
        assert_eq!(evaluate("[1,2,15]", t).unwrap(), expected, "at {}", t);
    }
}

#[test]
fn test_friday_evening() {
    for t in week() {
        let expected = t.weekday() == Weekday::Fri && t.hour() >= 20;
        assert_eq!(evaluate("%w==5;20, 24", t).unwrap(), expected, "at {}", t);
    }
}

#[test]
fn test_friday_or_tuesday() {
    for t in week() {
        let expected = matches!(t.weekday(), Weekday::Fri | Weekday::Tue);
        assert_eq!(evaluate("%w==5|%w==2", t).unwrap(), expected, "at {}", t);
    }
}

#[test]
fn test_weekdays_only() {
    for t in week() {
        let expected = !matches!(t.weekday(), Weekday::Sat | Weekday::Sun);
        assert_eq!(evaluate("%w!=6&%w!=0", t).unwrap(), expected, "at {}", t);
    }
}

#[test]
fn test_malformed_rules_are_errors() {
    let t = week().next().unwrap();
    for rule in ["", "24", "0, 25", "[24]", "%Q==1", "0, 24;", "0, 24#soon"] {
        assert!(evaluate(rule, t).is_err(), "rule {:?} should be rejected", rule);
    }
}
