//! Resolve exception periods into absolute busy intervals.
//!
//! Exception periods are written in local calendar terms (month, day, optional
//! year and time). Resolution pins them to instants in the configured
//! timezone so they can share one timeline with imported calendar events.

use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;

use crate::dst::resolve_local_forward;
use crate::error::{Result, SlotError};
use crate::types::{BusyInterval, ExceptionPeriod, PeriodMoment};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bound {
    Start,
    End,
}

/// Resolve configured exception periods to busy intervals in `tz`.
///
/// - Recurring periods (no year) are anchored to the current year of `now` in
///   `tz`. When the end then precedes the start, the end moves one year ahead
///   ("Dec 24 to Jan 1" wraps the new year).
/// - Dated periods are taken literally.
/// - A bound without a time covers the whole day: a start bound begins at
///   local midnight, an end bound stops at the following midnight.
///
/// # Errors
/// Returns `SlotError::InvalidConfiguration` when a bound is not a real
/// calendar date or time.
pub fn resolve_exception_periods(
    periods: &[ExceptionPeriod],
    tz: &Tz,
    now: DateTime<Utc>,
) -> Result<Vec<BusyInterval>> {
    let current_year = now.with_timezone(tz).year();

    periods
        .iter()
        .map(|period| resolve_period(period, tz, current_year))
        .collect()
}

/// Concatenate resolved exception periods with externally supplied intervals.
///
/// External intervals are taken as-is; ordering is left to the timeline.
pub fn merge_busy_sources(
    mut resolved: Vec<BusyInterval>,
    external: &[BusyInterval],
) -> Vec<BusyInterval> {
    resolved.extend_from_slice(external);
    resolved
}

fn resolve_period(period: &ExceptionPeriod, tz: &Tz, current_year: i32) -> Result<BusyInterval> {
    let (start, end) = local_bounds(period, current_year)?;
    Ok(BusyInterval::new(
        resolve_local_forward(tz, start),
        resolve_local_forward(tz, end),
    ))
}

/// Wall-clock bounds of a period, with the new-year rollover applied.
pub(crate) fn local_bounds(
    period: &ExceptionPeriod,
    current_year: i32,
) -> Result<(NaiveDateTime, NaiveDateTime)> {
    let start = local_bound(&period.start_at, current_year, Bound::Start)?;
    let mut end = local_bound(&period.end_at, current_year, Bound::End)?;

    if period.is_recurring() && end < start {
        end = end
            .checked_add_months(Months::new(12))
            .ok_or_else(|| invalid_bound(&period.end_at))?;
    }

    Ok((start, end))
}

fn local_bound(moment: &PeriodMoment, current_year: i32, bound: Bound) -> Result<NaiveDateTime> {
    let year = moment.year.unwrap_or(current_year);
    let date = calendar_date(moment, year).ok_or_else(|| invalid_bound(moment))?;

    match moment.hour {
        Some(hour) => date
            .and_hms_opt(hour, moment.minute.unwrap_or(0), 0)
            .ok_or_else(|| invalid_bound(moment)),
        None => match bound {
            Bound::Start => Ok(date.and_time(NaiveTime::MIN)),
            Bound::End => date
                .succ_opt()
                .map(|next| next.and_time(NaiveTime::MIN))
                .ok_or_else(|| invalid_bound(moment)),
        },
    }
}

/// Recurring Feb 29 falls back to Feb 28 outside leap years.
fn calendar_date(moment: &PeriodMoment, year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, moment.month, moment.day).or_else(|| {
        if !moment.has_year() && moment.month == 2 && moment.day == 29 {
            NaiveDate::from_ymd_opt(year, 2, 28)
        } else {
            None
        }
    })
}

fn invalid_bound(moment: &PeriodMoment) -> SlotError {
    SlotError::InvalidConfiguration(format!("exception period bound {:?} is not a valid date", moment))
}
