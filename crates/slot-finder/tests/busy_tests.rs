//! Tests for exception period resolution.

use chrono::{DateTime, Utc};
use chrono_tz::Europe::Paris;
use chrono_tz::Tz;
use slot_finder::busy::{merge_busy_sources, resolve_exception_periods};
use slot_finder::{BusyInterval, ExceptionPeriod, PeriodMoment, SlotError};

fn at(s: &str) -> DateTime<Utc> {
    s.parse().unwrap()
}

fn resolve_one(period: ExceptionPeriod, now: &str) -> BusyInterval {
    let resolved = resolve_exception_periods(&[period], &Paris, at(now)).unwrap();
    assert_eq!(resolved.len(), 1);
    resolved[0]
}

#[test]
fn recurring_period_is_anchored_to_the_current_year() {
    let interval = resolve_one(
        ExceptionPeriod::new(
            PeriodMoment::recurring(10, 16, 12, 30),
            PeriodMoment::recurring(10, 16, 14, 0),
        ),
        "2020-03-01T00:00:00Z",
    );
    assert_eq!(interval.start_at, at("2020-10-16T12:30:00+02:00"));
    assert_eq!(interval.end_at, at("2020-10-16T14:00:00+02:00"));
}

#[test]
fn current_year_is_read_in_the_configured_timezone() {
    // 23:30 UTC on Dec 31 is already Jan 1 in Paris.
    let interval = resolve_one(
        ExceptionPeriod::new(PeriodMoment::day(7, 14), PeriodMoment::day(7, 14)),
        "2020-12-31T23:30:00Z",
    );
    assert_eq!(interval.start_at, at("2021-07-14T00:00:00+02:00"));
}

#[test]
fn whole_day_bounds_cover_start_to_following_midnight() {
    let interval = resolve_one(
        ExceptionPeriod::new(PeriodMoment::day(10, 16), PeriodMoment::day(10, 17)),
        "2020-10-14T15:00:00Z",
    );
    assert_eq!(interval.start_at, at("2020-10-16T00:00:00+02:00"));
    assert_eq!(interval.end_at, at("2020-10-18T00:00:00+02:00"));
}

#[test]
fn recurring_period_wraps_the_new_year() {
    let interval = resolve_one(
        ExceptionPeriod::new(PeriodMoment::day(12, 24), PeriodMoment::day(1, 1)),
        "2020-06-01T00:00:00Z",
    );
    assert_eq!(interval.start_at, at("2020-12-24T00:00:00+01:00"));
    assert_eq!(interval.end_at, at("2021-01-02T00:00:00+01:00"));
}

#[test]
fn hour_without_minute_means_minute_zero() {
    let interval = resolve_one(
        ExceptionPeriod::new(
            PeriodMoment::recurring(10, 16, 12, 30),
            PeriodMoment {
                year: None,
                month: 10,
                day: 16,
                hour: Some(14),
                minute: None,
            },
        ),
        "2020-01-01T00:00:00Z",
    );
    assert_eq!(interval.end_at, at("2020-10-16T14:00:00+02:00"));
}

#[test]
fn dated_period_ignores_the_current_year() {
    let interval = resolve_one(
        ExceptionPeriod::new(
            PeriodMoment::dated(2019, 10, 16, 12, 30),
            PeriodMoment::dated(2019, 10, 16, 14, 0),
        ),
        "2020-10-14T15:00:00Z",
    );
    assert_eq!(interval.start_at, at("2019-10-16T12:30:00+02:00"));
    assert_eq!(interval.end_at, at("2019-10-16T14:00:00+02:00"));
}

#[test]
fn recurring_leap_day_falls_back_outside_leap_years() {
    let interval = resolve_one(
        ExceptionPeriod::new(PeriodMoment::day(2, 29), PeriodMoment::day(2, 29)),
        "2021-01-10T00:00:00Z",
    );
    assert_eq!(interval.start_at, at("2021-02-28T00:00:00+01:00"));
    assert_eq!(interval.end_at, at("2021-03-01T00:00:00+01:00"));

    let interval = resolve_one(
        ExceptionPeriod::new(PeriodMoment::day(2, 29), PeriodMoment::day(2, 29)),
        "2024-01-10T00:00:00Z",
    );
    assert_eq!(interval.start_at, at("2024-02-29T00:00:00+01:00"));
}

#[test]
fn bound_inside_a_dst_gap_moves_forward() {
    // Paris skips 02:00-03:00 on 2021-03-28.
    let interval = resolve_one(
        ExceptionPeriod::new(
            PeriodMoment::dated(2021, 3, 28, 2, 30),
            PeriodMoment::dated(2021, 3, 28, 5, 0),
        ),
        "2021-01-01T00:00:00Z",
    );
    assert_eq!(interval.start_at, at("2021-03-28T03:30:00+02:00"));
    assert_eq!(interval.end_at, at("2021-03-28T05:00:00+02:00"));
}

#[test]
fn resolved_intervals_carry_the_configured_timezone() {
    let interval = resolve_one(
        ExceptionPeriod::new(PeriodMoment::day(5, 1), PeriodMoment::day(5, 1)),
        "2022-01-01T00:00:00Z",
    );
    assert_eq!(interval.start_at.timezone(), Tz::Europe__Paris);
}

#[test]
fn impossible_calendar_date_is_an_error() {
    let err = resolve_exception_periods(
        &[ExceptionPeriod::new(
            PeriodMoment::day(4, 31),
            PeriodMoment::day(5, 1),
        )],
        &Paris,
        at("2022-01-01T00:00:00Z"),
    )
    .unwrap_err();
    assert!(matches!(err, SlotError::InvalidConfiguration(_)));
}

#[test]
fn no_periods_resolve_to_nothing() {
    let resolved = resolve_exception_periods(&[], &Paris, at("2022-01-01T00:00:00Z")).unwrap();
    assert!(resolved.is_empty());
}

#[test]
fn busy_sources_are_concatenated_in_order() {
    let resolved = resolve_exception_periods(
        &[ExceptionPeriod::new(PeriodMoment::day(1, 1), PeriodMoment::day(1, 1))],
        &Paris,
        at("2022-06-01T00:00:00Z"),
    )
    .unwrap();
    let external = vec![
        BusyInterval::new(
            at("2022-06-02T08:00:00Z").with_timezone(&Paris),
            at("2022-06-02T09:00:00Z").with_timezone(&Paris),
        ),
        BusyInterval::new(
            at("2022-06-01T08:00:00Z").with_timezone(&Paris),
            at("2022-06-01T09:00:00Z").with_timezone(&Paris),
        ),
    ];

    let merged = merge_busy_sources(resolved.clone(), &external);

    assert_eq!(merged.len(), 3);
    assert_eq!(merged[0], resolved[0]);
    assert_eq!(&merged[1..], external.as_slice());
}
