//! Slot search orchestration.
//!
//! [`find_slots`] is the core entry point: it takes already-resolved busy
//! intervals. [`find_available_slots`] runs the whole pipeline, resolving the
//! configured exception periods and optional calendar data first.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::{debug, trace};

use crate::boundary::{check_search_parameters, compute_boundaries};
use crate::busy::{merge_busy_sources, resolve_exception_periods};
use crate::config::validate_configuration;
use crate::dst::{resolve_local, DstPolicy};
use crate::error::Result;
use crate::ical::{extract_busy_intervals, CalendarFormat};
use crate::shifts::normalize_templates;
use crate::sweep::{sweep_segment, SlotRules};
use crate::timeline::Timeline;
use crate::types::{BusyInterval, SlotConfiguration, TimeSlot, WeeklyShift};

/// Everything needed for a full search.
#[derive(Debug, Clone, Copy)]
pub struct SearchRequest<'a> {
    /// Rules used to find availabilities.
    pub configuration: &'a SlotConfiguration,
    /// Raw calendar data whose events block time, if any.
    pub calendar_data: Option<&'a str>,
    /// Format of `calendar_data`.
    pub calendar_format: CalendarFormat,
    /// Start of the searched range.
    pub from: DateTime<Utc>,
    /// End of the searched range.
    pub to: DateTime<Utc>,
}

impl<'a> SearchRequest<'a> {
    pub fn new(configuration: &'a SlotConfiguration, from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self {
            configuration,
            calendar_data: None,
            calendar_format: CalendarFormat::default(),
            from,
            to,
        }
    }

    pub fn with_calendar(mut self, data: &'a str, format: CalendarFormat) -> Self {
        self.calendar_data = Some(data);
        self.calendar_format = format;
        self
    }
}

/// Search bookable slots between `from` and `to`.
///
/// `busy_intervals` holds every blocked interval (resolved exception periods
/// and imported events), in any order and any timezone. `now` drives the lead
/// time and horizon rules.
///
/// Shifts are re-normalized before the search, and the normalized
/// configuration is validated, so overlapping shifts are merged rather than
/// rejected here.
///
/// # Errors
/// Returns `SlotError::InvalidBoundaries` when `from > to`, and the
/// validator's error when the configuration is invalid. No partial result is
/// ever returned.
pub fn find_slots(
    config: &SlotConfiguration,
    busy_intervals: &[BusyInterval],
    from: DateTime<Utc>,
    to: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<Vec<TimeSlot>> {
    check_search_parameters(from, to)?;
    let config = normalized_configuration(config)?;
    let tz = config.timezone()?;
    search(&config, &tz, busy_intervals, from, to, now)
}

/// Run the full pipeline: validate, resolve exception periods, extract
/// calendar events, then search.
///
/// # Errors
/// Same as [`find_slots`].
pub fn find_available_slots(request: &SearchRequest<'_>, now: DateTime<Utc>) -> Result<Vec<TimeSlot>> {
    check_search_parameters(request.from, request.to)?;
    let config = normalized_configuration(request.configuration)?;
    let tz = config.timezone()?;

    let busy = collect_for(&config, &tz, request.calendar_data, request.calendar_format, now)?;
    search(&config, &tz, &busy, request.from, request.to, now)
}

/// Resolve exception periods and calendar events into one busy list.
///
/// # Errors
/// Returns the validator's error when the configuration is invalid.
pub fn collect_busy_intervals(
    config: &SlotConfiguration,
    calendar_data: Option<&str>,
    calendar_format: CalendarFormat,
    now: DateTime<Utc>,
) -> Result<Vec<BusyInterval>> {
    let config = normalized_configuration(config)?;
    let tz = config.timezone()?;
    collect_for(&config, &tz, calendar_data, calendar_format, now)
}

fn collect_for(
    config: &SlotConfiguration,
    tz: &Tz,
    calendar_data: Option<&str>,
    calendar_format: CalendarFormat,
    now: DateTime<Utc>,
) -> Result<Vec<BusyInterval>> {
    let resolved = resolve_exception_periods(&config.unavailable_periods, tz, now)?;
    let imported = extract_busy_intervals(calendar_format, calendar_data, tz);
    debug!(
        exception_periods = resolved.len(),
        calendar_events = imported.len(),
        "collected busy intervals"
    );
    Ok(merge_busy_sources(resolved, &imported))
}

/// Copy the configuration with merged shifts and validate the result.
fn normalized_configuration(config: &SlotConfiguration) -> Result<SlotConfiguration> {
    let normalized = SlotConfiguration {
        available_periods: normalize_templates(&config.available_periods),
        ..config.clone()
    };
    validate_configuration(&normalized)?;
    Ok(normalized)
}

fn search(
    config: &SlotConfiguration,
    tz: &Tz,
    busy_intervals: &[BusyInterval],
    from: DateTime<Utc>,
    to: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<Vec<TimeSlot>> {
    let window = compute_boundaries(from, to, config, tz, now)?;
    debug!(
        first_from = %window.first_from,
        last_to = %window.last_to,
        "computed search window"
    );
    if window.is_empty() {
        return Ok(Vec::new());
    }

    // Buffers may reach past the window edges, so the timeline does too.
    let timeline_start = window
        .first_from
        .checked_sub_signed(config.buffer_before())
        .unwrap_or_else(|| tz.from_utc_datetime(&NaiveDateTime::MIN));
    let timeline_end = window
        .last_to
        .checked_add_signed(config.buffer_after())
        .unwrap_or_else(|| tz.from_utc_datetime(&NaiveDateTime::MAX));
    let timeline = Timeline::prepare(busy_intervals, timeline_start, timeline_end);
    debug!(
        supplied = busy_intervals.len(),
        kept = timeline.len(),
        "prepared busy timeline"
    );

    let rules = SlotRules::from_config(config);
    let mut slots = Vec::new();

    let mut day = window.first_from.date_naive();
    let last_day = window.last_to.date_naive();
    while day <= last_day {
        if let Some(template) = config.template_for(&day) {
            for shift in &template.shifts {
                let Some((shift_start, shift_end)) = shift_on_day(shift, day, tz, config.dst_policy)
                else {
                    trace!(%day, start = %shift.start_time, "shift bound skipped by DST policy");
                    continue;
                };

                let partial_from = shift_start.max(window.first_from);
                let partial_to = shift_end.min(window.last_to);
                if partial_from >= partial_to {
                    continue;
                }

                let found = sweep_segment(&rules, &timeline, partial_from, partial_to);
                trace!(%day, start = %shift.start_time, slots = found.len(), "swept shift");
                slots.extend(found);
            }
        }

        day = match day.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }

    debug!(slots = slots.len(), "slot search finished");
    Ok(slots)
}

/// The concrete instants of a shift on a local calendar day.
fn shift_on_day(
    shift: &WeeklyShift,
    day: NaiveDate,
    tz: &Tz,
    policy: DstPolicy,
) -> Option<(DateTime<Tz>, DateTime<Tz>)> {
    let start = resolve_local(tz, day.and_time(shift.start_time.to_naive_time()), policy)?;
    let end = resolve_local(tz, day.and_time(shift.end_time.to_naive_time()), policy)?;
    Some((start, end))
}
