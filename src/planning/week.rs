// Copyright 2023 Remi Bernotavicius

use chrono::{Days, NaiveDate, NaiveDateTime, Weekday};
use std::ops::RangeInclusive;

/// Weeks start on Monday here, not on the Sunday most calendars default to.
pub const WEEK_START: Weekday = Weekday::Mon;

pub fn start_of_week(now: NaiveDateTime) -> NaiveDate {
    week_of(now.date())
}

pub fn week_of(date: NaiveDate) -> NaiveDate {
    date.week(WEEK_START).first_day()
}

pub fn this_week() -> NaiveDate {
    start_of_week(chrono::Local::now().naive_local())
}

pub fn week_dates(start: NaiveDate) -> [NaiveDate; 7] {
    std::array::from_fn(|i| start + Days::new(i as u64))
}

pub fn week_end(start: NaiveDate) -> NaiveDate {
    start + Days::new(6)
}

/// The closed seven day span `[start, start + 6 days]`.
pub fn week_span(start: NaiveDate) -> RangeInclusive<NaiveDate> {
    start..=week_end(start)
}

pub fn is_within_window(window_start: NaiveDate, date: NaiveDate) -> bool {
    week_span(window_start).contains(&date)
}

pub fn next_week(start: NaiveDate) -> NaiveDate {
    week_of(start + Days::new(7))
}

pub fn previous_week(start: NaiveDate) -> NaiveDate {
    week_of(start - Days::new(7))
}

pub fn full_day_name(day: Weekday) -> &'static str {
    use chrono::Weekday::*;

    match day {
        Mon => "Monday",
        Tue => "Tuesday",
        Wed => "Wednesday",
        Thu => "Thursday",
        Fri => "Friday",
        Sat => "Saturday",
        Sun => "Sunday",
    }
}

#[cfg(test)]
fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn start_of_week_is_the_monday_before() {
    use chrono::Datelike as _;

    let mut day = date(2023, 12, 20);
    while day < date(2025, 3, 1) {
        for (h, m) in [(0, 0), (12, 30), (23, 59)] {
            let now = day.and_hms_opt(h, m, 59).unwrap();
            let start = start_of_week(now);
            assert_eq!(start.weekday(), Weekday::Mon, "{now}");
            assert!(start <= now.date(), "{now}");
            assert!(now.date() < start + Days::new(7), "{now}");
        }
        day = day.succ_opt().unwrap();
    }
}

#[test]
fn start_of_week_examples() {
    let at = |d: NaiveDate| d.and_hms_opt(8, 15, 0).unwrap();

    // Monday itself
    assert_eq!(start_of_week(at(date(2024, 6, 3))), date(2024, 6, 3));
    // Sunday belongs to the week that started six days earlier
    assert_eq!(start_of_week(at(date(2024, 6, 9))), date(2024, 6, 3));
    assert_eq!(start_of_week(at(date(2024, 6, 5))), date(2024, 6, 3));
    // across a year boundary
    assert_eq!(start_of_week(at(date(2025, 1, 1))), date(2024, 12, 30));
}

#[test]
fn week_dates_are_consecutive() {
    let start = date(2024, 2, 26);
    let dates = week_dates(start);
    assert_eq!(dates[0], start);
    for pair in dates.windows(2) {
        assert_eq!(pair[0].succ_opt().unwrap(), pair[1]);
    }
    // leap day included
    assert_eq!(dates[3], date(2024, 2, 29));
    assert_eq!(dates[6], date(2024, 3, 3));
    assert_eq!(dates[6], week_end(start));
}

#[test]
fn window_is_closed_seven_days() {
    let start = date(2024, 6, 3);
    assert!(!is_within_window(start, date(2024, 6, 2)));
    assert!(is_within_window(start, start));
    assert!(is_within_window(start, date(2024, 6, 9)));
    assert!(!is_within_window(start, date(2024, 6, 10)));

    for d in week_dates(start) {
        assert!(is_within_window(start, d));
    }
}

#[test]
fn stepping_weeks() {
    let start = date(2024, 12, 30);
    assert_eq!(next_week(start), date(2025, 1, 6));
    assert_eq!(previous_week(start), date(2024, 12, 23));
    assert_eq!(previous_week(next_week(start)), start);
}
