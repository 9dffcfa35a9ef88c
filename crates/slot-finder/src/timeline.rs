//! Prepare busy intervals for the slot sweep.
//!
//! Filters busy intervals to the search window, sorts them by start, and drops
//! every interval fully encompassed by another. Once encompassed intervals are
//! gone the remaining ends are non-decreasing, so the sweep can move a single
//! index forward and locate its starting point by binary search.

use chrono::DateTime;
use chrono_tz::Tz;

use crate::types::BusyInterval;

/// A sorted, boundary-filtered, encompassment-free list of busy intervals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Timeline {
    intervals: Vec<BusyInterval>,
}

impl Timeline {
    /// Build the timeline for the half-open window `[window_start, window_end)`.
    ///
    /// Intervals are converted to the window's timezone. An interval `B` is
    /// dropped when another interval `A` satisfies `A.start <= B.start` and
    /// `A.end > B.end`; identical intervals are both kept.
    pub fn prepare(
        intervals: &[BusyInterval],
        window_start: DateTime<Tz>,
        window_end: DateTime<Tz>,
    ) -> Self {
        let tz = window_start.timezone();

        let mut kept: Vec<BusyInterval> = intervals
            .iter()
            .filter(|interval| interval.intersects(window_start, window_end))
            .map(|interval| interval.with_timezone(&tz))
            .collect();

        // Among equal starts the longest comes first, so an encompassing
        // interval is always seen before the intervals it covers.
        kept.sort_by(|a, b| {
            a.start_at
                .cmp(&b.start_at)
                .then_with(|| b.end_at.cmp(&a.end_at))
        });

        // The interval reaching furthest so far starts no later than the
        // current one, so it is the only candidate that can encompass it.
        let mut furthest: Option<BusyInterval> = None;
        kept.retain(|interval| {
            if furthest.is_some_and(|outer| outer.encompasses(interval)) {
                return false;
            }
            if furthest.is_none_or(|outer| interval.end_at > outer.end_at) {
                furthest = Some(*interval);
            }
            true
        });

        Self { intervals: kept }
    }

    pub fn intervals(&self) -> &[BusyInterval] {
        &self.intervals
    }

    pub fn get(&self, index: usize) -> Option<&BusyInterval> {
        self.intervals.get(index)
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Index of the first interval ending strictly after `moment`
    /// (`len()` when there is none).
    pub fn first_ending_after(&self, moment: DateTime<Tz>) -> usize {
        self.intervals
            .partition_point(|interval| interval.end_at <= moment)
    }
}
