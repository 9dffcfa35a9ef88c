//! Configuration validation.
//!
//! [`validate_configuration`] checks every precondition the search relies on
//! and reports the first violation as `SlotError::InvalidConfiguration` (or
//! `SlotError::InvalidTimezone`).

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::busy::local_bounds;
use crate::error::{Result, SlotError};
use crate::shifts::merge_overlapping_shifts;
use crate::types::{AvailabilityTemplate, ExceptionPeriod, PeriodMoment, SlotConfiguration};

const MINUTES_PER_DAY: u64 = 24 * 60;

/// Leap year used to check recurring month/day pairs, so Feb 29 is accepted.
const REFERENCE_LEAP_YEAR: i32 = 2000;

/// Check a configuration, failing on the first invalid field.
///
/// # Errors
/// Returns `SlotError::InvalidConfiguration` describing the violated rule, or
/// `SlotError::InvalidTimezone` when the timezone is unknown.
pub fn validate_configuration(config: &SlotConfiguration) -> Result<()> {
    check_primitive_values(config)?;

    let mut seen_weekdays = HashSet::new();
    for (index, template) in config.available_periods.iter().enumerate() {
        check_available_period(template, index)?;
        if !seen_weekdays.insert(template.iso_weekday) {
            return Err(invalid(format!(
                "ISO weekday {} is configured more than once (available period #{})",
                template.iso_weekday,
                index + 1
            )));
        }
    }

    for (index, period) in config.unavailable_periods.iter().enumerate() {
        if !is_exception_period_valid(period) {
            return Err(invalid(format!("Unavailable period #{} is invalid", index + 1)));
        }
    }

    Ok(())
}

/// Whether an exception period is well formed.
///
/// Both bounds must agree on having a year and be real calendar moments. A
/// dated period must end after it starts; a recurring one may wrap the new
/// year.
pub fn is_exception_period_valid(period: &ExceptionPeriod) -> bool {
    if period.start_at.has_year() != period.end_at.has_year() {
        return false;
    }
    if !is_period_moment_valid(&period.start_at) || !is_period_moment_valid(&period.end_at) {
        return false;
    }
    if period.is_recurring() {
        return true;
    }
    match local_bounds(period, REFERENCE_LEAP_YEAR) {
        Ok((start, end)) => start < end,
        Err(_) => false,
    }
}

fn check_primitive_values(config: &SlotConfiguration) -> Result<()> {
    if config.slot_duration_minutes < 1 {
        return Err(invalid("Slot duration must be at least 1 minute"));
    }
    if let Some(step) = config.slot_start_minute_step {
        if !(1..=30).contains(&step) {
            return Err(invalid("Slot start minute step must be contained between 1 and 30"));
        }
    }
    if config.max_days_before_last_slot == Some(0) {
        return Err(invalid("The number of days before latest slot must be at least 1"));
    }
    config.timezone()?;

    if let Some(max_days) = config.max_days_before_last_slot {
        let lead = u64::from(config.min_time_before_first_slot_minutes);
        if lead > u64::from(max_days) * MINUTES_PER_DAY {
            return Err(invalid(
                "The first possible slot will always be after the last possible one \
                 (see min_time_before_first_slot_minutes and max_days_before_last_slot)",
            ));
        }
    }
    Ok(())
}

fn check_available_period(template: &AvailabilityTemplate, index: usize) -> Result<()> {
    if !(1..=7).contains(&template.iso_weekday) {
        return Err(invalid(format!(
            "ISO weekday must be contained between 1 (Monday) and 7 (Sunday) for available period #{}",
            index + 1
        )));
    }
    for shift in &template.shifts {
        if shift.end_time <= shift.start_time {
            return Err(invalid(format!(
                "Daily shift {} - {} for available period #{} is invalid",
                shift.start_time,
                shift.end_time,
                index + 1
            )));
        }
    }
    if merge_overlapping_shifts(&template.shifts).len() != template.shifts.len() {
        return Err(invalid(format!(
            "Some shifts are overlapping for available period #{}",
            index + 1
        )));
    }
    Ok(())
}

fn is_period_moment_valid(moment: &PeriodMoment) -> bool {
    if moment.hour.is_none() && moment.minute.is_some() {
        return false;
    }
    if moment.year.is_some_and(|year| year <= 0) {
        return false;
    }
    let year = moment.year.unwrap_or(REFERENCE_LEAP_YEAR);
    NaiveDate::from_ymd_opt(year, moment.month, moment.day).is_some()
        && moment.hour.is_none_or(|hour| hour <= 23)
        && moment.minute.is_none_or(|minute| minute <= 59)
}

fn invalid(message: impl Into<String>) -> SlotError {
    SlotError::InvalidConfiguration(message.into())
}
