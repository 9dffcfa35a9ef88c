//! The slot sweep engine.
//!
//! Walks one shift occurrence with a single cursor. The cursor marks where a
//! candidate slot's before-buffer would begin; the slot itself starts
//! `buffer_before` later. At each step the cursor is snapped to the alignment
//! grid, then either:
//!
//! - an obstruction starts before the candidate's free-time limit
//!   (`cursor + before + duration + after`): the cursor jumps to the end of
//!   that obstruction, or
//! - the position is free: a slot is emitted and the cursor moves to the slot
//!   end plus whatever part of the after-buffer the next slot's before-buffer
//!   does not already cover.
//!
//! The timeline index only ever moves forward, so a sweep is linear in the
//! number of slots plus the number of busy intervals it touches.

use chrono::{DateTime, Duration, Timelike};
use chrono_tz::Tz;

use crate::timeline::Timeline;
use crate::types::{SlotConfiguration, TimeSlot};

/// Durations and alignment that shape every slot of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotRules {
    pub duration: Duration,
    pub buffer_before: Duration,
    pub buffer_after: Duration,
    /// Slot starts fall on multiples of this many minutes past the hour.
    pub step_minutes: u32,
}

impl SlotRules {
    pub fn from_config(config: &SlotConfiguration) -> Self {
        Self {
            duration: config.slot_duration(),
            buffer_before: config.buffer_before(),
            buffer_after: config.buffer_after(),
            step_minutes: config.slot_start_step(),
        }
    }

    /// Total time a slot occupies once both buffers are included.
    fn footprint(&self) -> Duration {
        self.buffer_before + self.duration + self.buffer_after
    }

    /// Cursor advance after a slot's end. The next slot's before-buffer
    /// overlaps this slot's after-buffer, so only the excess is skipped.
    fn gap_after_slot(&self) -> Duration {
        (self.buffer_after - self.buffer_before).max(Duration::zero())
    }
}

/// Emit every slot fitting in `[from, to)` around the busy `timeline`.
///
/// Slots are chronological and never overlap. A slot always ends at or before
/// `to`; its after-buffer is only checked against the timeline.
pub fn sweep_segment(
    rules: &SlotRules,
    timeline: &Timeline,
    from: DateTime<Tz>,
    to: DateTime<Tz>,
) -> Vec<TimeSlot> {
    let mut slots = Vec::new();

    let (Some(mut cursor), Some(last_cursor)) = (
        from.checked_sub_signed(rules.buffer_before),
        to.checked_sub_signed(rules.duration + rules.buffer_before),
    ) else {
        return slots;
    };
    let mut index = timeline.first_ending_after(cursor);

    while cursor <= last_cursor {
        cursor = match align_cursor(cursor, rules) {
            Some(aligned) if aligned <= last_cursor => aligned,
            _ => break,
        };

        // Intervals over by the time the cursor is reached cannot obstruct it.
        while timeline
            .get(index)
            .is_some_and(|busy| busy.end_at <= cursor)
        {
            index += 1;
        }

        // A limit past the representable range is later than any obstruction.
        let free_time_limit = cursor.checked_add_signed(rules.footprint());
        match timeline.get(index) {
            Some(busy) if free_time_limit.is_none_or(|limit| busy.start_at < limit) => {
                cursor = busy.end_at;
                index += 1;
            }
            _ => {
                // Bounded by `to` since the cursor is at most `last_cursor`.
                let start_at = cursor + rules.buffer_before;
                let end_at = start_at + rules.duration;
                slots.push(TimeSlot::new(start_at, end_at));
                cursor = match end_at.checked_add_signed(rules.gap_after_slot()) {
                    Some(next) => next,
                    None => break,
                };
            }
        }
    }

    slots
}

/// Snap the cursor to the next position whose slot start is aligned.
///
/// Sub-minute residue rounds up to the next whole minute; the slot start
/// (`cursor + buffer_before`) then rounds up to a multiple of the step in the
/// local minute-of-hour. `None` when the snapped position is not representable.
pub(crate) fn align_cursor(cursor: DateTime<Tz>, rules: &SlotRules) -> Option<DateTime<Tz>> {
    let cursor = ceil_to_minute(cursor)?;
    let step = rules.step_minutes.max(1);
    let misalignment = cursor.checked_add_signed(rules.buffer_before)?.minute() % step;
    let padding = (step - misalignment) % step;
    cursor.checked_add_signed(Duration::minutes(i64::from(padding)))
}

fn ceil_to_minute(moment: DateTime<Tz>) -> Option<DateTime<Tz>> {
    let seconds = moment.timestamp().rem_euclid(60);
    let nanos = moment.timestamp_subsec_nanos();
    if seconds == 0 && nanos == 0 {
        return Some(moment);
    }
    moment
        .checked_sub_signed(Duration::seconds(seconds) + Duration::nanoseconds(i64::from(nanos)))?
        .checked_add_signed(Duration::minutes(1))
}
