//! DST transition policies for local wall-clock times.
//!
//! Shift bounds, exception bounds and the horizon midnight are all expressed
//! as local wall times and must be pinned to an instant in the configured
//! timezone. Twice a year that mapping is not one-to-one.

use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, Offset, TimeZone};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Policy for handling wall times that fall in a DST gap.
///
/// Ambiguous wall times (fall back) always resolve to their first occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DstPolicy {
    /// Drop shift occurrences with a bound in the DST gap (e.g., 2:30 AM during spring forward)
    Skip,
    /// Move the wall time forward by the length of the gap
    #[default]
    ShiftForward,
}

/// Pin a local wall time to an instant in `tz` according to `policy`.
///
/// Returns `None` only for a wall time inside a DST gap under [`DstPolicy::Skip`].
pub fn resolve_local(tz: &Tz, local: NaiveDateTime, policy: DstPolicy) -> Option<DateTime<Tz>> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => match policy {
            DstPolicy::Skip => None,
            DstPolicy::ShiftForward => Some(shift_past_gap(tz, local)),
        },
    }
}

/// Like [`resolve_local`] with [`DstPolicy::ShiftForward`], which always succeeds.
pub fn resolve_local_forward(tz: &Tz, local: NaiveDateTime) -> DateTime<Tz> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => shift_past_gap(tz, local),
    }
}

/// Interpret `local` with the UTC offset in force before the transition.
///
/// 02:30 in a 02:00 → 03:00 gap becomes 03:30 on the new offset.
fn shift_past_gap(tz: &Tz, local: NaiveDateTime) -> DateTime<Tz> {
    let before_gap = local - Duration::days(1);
    let offset = tz.offset_from_utc_datetime(&before_gap).fix();
    let utc = local - Duration::seconds(i64::from(offset.local_minus_utc()));
    tz.from_utc_datetime(&utc)
}
