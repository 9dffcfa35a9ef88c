//! Slot search throughput over a long window with a dense busy calendar.

use std::hint::black_box;

use chrono::{Duration, TimeZone, Utc};
use chrono_tz::Tz;
use criterion::{criterion_group, criterion_main, Criterion};
use slot_finder::{find_slots, AvailabilityTemplate, BusyInterval, SlotConfiguration, WeeklyShift};

fn weekday_config() -> SlotConfiguration {
    let mut config = SlotConfiguration::new(30, "Europe/Paris");
    config.buffer_before_minutes = 5;
    config.buffer_after_minutes = 10;
    config.available_periods = (1..=5)
        .map(|day| {
            AvailabilityTemplate::new(
                day,
                vec![
                    WeeklyShift::parse("08:00", "12:00").unwrap(),
                    WeeklyShift::parse("13:30", "19:00").unwrap(),
                ],
            )
        })
        .collect();
    config
}

/// One 45-minute busy interval every 3 hours, staggered by 7 minutes.
fn dense_busy(count: i64) -> Vec<BusyInterval> {
    let tz: Tz = "Europe/Paris".parse().unwrap();
    let origin = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    (0..count)
        .map(|i| {
            let start = origin + Duration::minutes(i * 187);
            BusyInterval::new(
                start.with_timezone(&tz),
                (start + Duration::minutes(45)).with_timezone(&tz),
            )
        })
        .collect()
}

fn bench_search(c: &mut Criterion) {
    let config = weekday_config();
    let from = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let now = from - Duration::days(1);

    let busy = dense_busy(2_000);
    c.bench_function("find_slots_90_days_dense", |b| {
        b.iter(|| {
            find_slots(
                black_box(&config),
                black_box(&busy),
                from,
                from + Duration::days(90),
                now,
            )
        })
    });

    c.bench_function("find_slots_365_days_free", |b| {
        b.iter(|| find_slots(black_box(&config), &[], from, from + Duration::days(365), now))
    });
}

criterion_group!(benches, bench_search);
criterion_main!(benches);
