//! Tests for shift normalization.

use slot_finder::shifts::{merge_overlapping_shifts, normalize_templates};
use slot_finder::{AvailabilityTemplate, WeeklyShift};

fn shift(start: &str, end: &str) -> WeeklyShift {
    WeeklyShift::parse(start, end).unwrap()
}

fn render(shifts: &[WeeklyShift]) -> Vec<String> {
    shifts
        .iter()
        .map(|s| format!("{}-{}", s.start_time, s.end_time))
        .collect()
}

#[test]
fn partially_overlapping_shifts_are_merged() {
    let merged = merge_overlapping_shifts(&[shift("08:00", "12:00"), shift("10:00", "18:00")]);
    assert_eq!(render(&merged), vec!["08:00-18:00"]);
}

#[test]
fn contained_shift_is_absorbed() {
    let merged = merge_overlapping_shifts(&[shift("08:00", "12:00"), shift("10:00", "11:00")]);
    assert_eq!(render(&merged), vec!["08:00-12:00"]);
}

#[test]
fn touching_shifts_are_merged() {
    let merged = merge_overlapping_shifts(&[shift("14:00", "16:00"), shift("12:00", "14:00")]);
    assert_eq!(render(&merged), vec!["12:00-16:00"]);
}

#[test]
fn disjoint_shifts_are_sorted_and_kept() {
    let merged = merge_overlapping_shifts(&[shift("15:00", "16:00"), shift("12:00", "13:00")]);
    assert_eq!(render(&merged), vec!["12:00-13:00", "15:00-16:00"]);
}

#[test]
fn chain_of_overlaps_collapses_into_minimal_set() {
    let shifts = [
        shift("13:30", "16:00"),
        shift("08:00", "10:00"),
        shift("09:00", "11:00"),
        shift("15:00", "18:00"),
        shift("10:30", "12:00"),
        shift("14:00", "15:30"),
    ];

    let merged = merge_overlapping_shifts(&shifts);

    assert_eq!(render(&merged), vec!["08:00-12:00", "13:30-18:00"]);
}

#[test]
fn widened_shift_keeps_absorbing_neighbours() {
    // 08:00-20:00 swallows every later shift even though 09:00-10:00 ends first.
    let shifts = [
        shift("08:00", "20:00"),
        shift("09:00", "10:00"),
        shift("11:00", "12:00"),
        shift("19:00", "21:00"),
    ];
    assert_eq!(render(&merge_overlapping_shifts(&shifts)), vec!["08:00-21:00"]);
}

#[test]
fn empty_and_single_inputs_are_unchanged() {
    assert!(merge_overlapping_shifts(&[]).is_empty());
    let single = [shift("09:00", "17:00")];
    assert_eq!(merge_overlapping_shifts(&single), single.to_vec());
}

#[test]
fn merging_is_idempotent() {
    let shifts = [
        shift("10:00", "11:00"),
        shift("08:00", "09:30"),
        shift("09:00", "10:00"),
        shift("16:00", "17:00"),
    ];
    let once = merge_overlapping_shifts(&shifts);
    let twice = merge_overlapping_shifts(&once);
    assert_eq!(once, twice);
}

#[test]
fn input_is_not_mutated() {
    let shifts = vec![shift("10:00", "18:00"), shift("08:00", "12:00")];
    let snapshot = shifts.clone();
    let _ = merge_overlapping_shifts(&shifts);
    assert_eq!(shifts, snapshot);
}

#[test]
fn templates_are_normalized_independently() {
    let templates = vec![
        AvailabilityTemplate::new(1, vec![shift("08:00", "12:00"), shift("11:00", "13:00")]),
        AvailabilityTemplate::new(3, vec![shift("14:00", "15:00"), shift("09:00", "10:00")]),
        AvailabilityTemplate::new(5, vec![]),
    ];

    let normalized = normalize_templates(&templates);

    assert_eq!(normalized.len(), 3);
    assert_eq!(normalized[0].iso_weekday, 1);
    assert_eq!(render(&normalized[0].shifts), vec!["08:00-13:00"]);
    assert_eq!(normalized[1].iso_weekday, 3);
    assert_eq!(render(&normalized[1].shifts), vec!["09:00-10:00", "14:00-15:00"]);
    assert!(normalized[2].shifts.is_empty());
    assert_eq!(templates[0].shifts.len(), 2, "source templates stay untouched");
}
