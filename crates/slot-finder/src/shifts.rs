//! Collapse overlapping or touching shifts into a minimal ordered set.
//!
//! The same merge doubles as a validity check: a template whose merge changes
//! the number of shifts contains overlaps (see [`crate::config`]).

use crate::types::{AvailabilityTemplate, WeeklyShift};

/// Merge overlapping or adjacent shifts, returning a new list sorted by start.
///
/// Shifts that touch (`a.end == b.start`) are merged as well. The input is
/// never mutated.
pub fn merge_overlapping_shifts(shifts: &[WeeklyShift]) -> Vec<WeeklyShift> {
    let mut merged = shifts.to_vec();
    if merged.len() < 2 {
        return merged;
    }

    merged.sort_by_key(|shift| shift.start_time);

    let mut i = 0;
    while i + 1 < merged.len() {
        if merged[i].end_time >= merged[i + 1].start_time {
            merged[i].end_time = merged[i].end_time.max(merged[i + 1].end_time);
            merged.remove(i + 1);
            // Stay on `i`: the widened shift may now reach its new neighbour.
            continue;
        }
        i += 1;
    }

    merged
}

/// Apply [`merge_overlapping_shifts`] to every template.
pub fn normalize_templates(templates: &[AvailabilityTemplate]) -> Vec<AvailabilityTemplate> {
    templates
        .iter()
        .map(|template| AvailabilityTemplate {
            iso_weekday: template.iso_weekday,
            shifts: merge_overlapping_shifts(&template.shifts),
        })
        .collect()
}
