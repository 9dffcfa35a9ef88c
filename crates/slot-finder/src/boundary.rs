//! Derive the effective search window.

use chrono::{DateTime, Days, NaiveTime, Utc};
use chrono_tz::Tz;

use crate::dst::resolve_local_forward;
use crate::error::{Result, SlotError};
use crate::types::SlotConfiguration;

/// The actual `[first_from, last_to)` window searched, in the configured timezone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchWindow {
    pub first_from: DateTime<Tz>,
    pub last_to: DateTime<Tz>,
}

impl SearchWindow {
    /// True when no slot can fit (lead time or horizon closed the window).
    pub fn is_empty(&self) -> bool {
        self.first_from >= self.last_to
    }
}

/// Reject a reversed caller window.
///
/// # Errors
/// Returns `SlotError::InvalidBoundaries` when `from > to`. Equal bounds are
/// accepted and simply yield no slots.
pub fn check_search_parameters(from: DateTime<Utc>, to: DateTime<Utc>) -> Result<()> {
    if from > to {
        return Err(SlotError::InvalidBoundaries { from, to });
    }
    Ok(())
}

/// Compute the search window from the caller's bounds and the configuration.
///
/// - `first_from` is the later of `from` and `now` advanced by the lead time
///   plus the before-slot buffer, so a buffer never reaches into the past.
/// - `last_to` is the earlier of `to` and, when a horizon is configured, the
///   end of the local day `max_days_before_last_slot` days after `now`
///   (expressed as the following local midnight).
pub fn compute_boundaries(
    from: DateTime<Utc>,
    to: DateTime<Utc>,
    config: &SlotConfiguration,
    tz: &Tz,
    now: DateTime<Utc>,
) -> Result<SearchWindow> {
    check_search_parameters(from, to)?;

    let now_local = now.with_timezone(tz);
    let requested_to = to.with_timezone(tz);

    // An earliest start past the representable range closes the window.
    let earliest_start =
        now_local.checked_add_signed(config.lead_time() + config.buffer_before());
    let first_from = match earliest_start {
        Some(earliest_start) => from.with_timezone(tz).max(earliest_start),
        None => requested_to,
    };

    let last_to = match config
        .max_days_before_last_slot
        .and_then(|days| horizon_end(now_local, days, tz))
    {
        Some(limit) => requested_to.min(limit),
        None => requested_to,
    };

    Ok(SearchWindow {
        first_from,
        last_to,
    })
}

fn horizon_end(now_local: DateTime<Tz>, days: u32, tz: &Tz) -> Option<DateTime<Tz>> {
    let following_day = now_local
        .date_naive()
        .checked_add_days(Days::new(u64::from(days) + 1))?;
    Some(resolve_local_forward(tz, following_day.and_time(NaiveTime::MIN)))
}
