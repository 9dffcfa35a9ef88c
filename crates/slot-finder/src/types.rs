//! Data model shared by every stage of the slot search.
//!
//! Configuration types (`SlotConfiguration` and everything it owns) deserialize
//! from JSON. Resolved types (`BusyInterval`, `TimeSlot`) carry absolute,
//! timezone-anchored instants and only serialize.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, NaiveTime, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::dst::DstPolicy;
use crate::error::{Result, SlotError};

/// Slot start alignment used when the configuration leaves it unset.
pub const DEFAULT_SLOT_START_MINUTE_STEP: u32 = 5;

/// A wall-clock time of day with minute resolution (00:00 to 23:59).
///
/// Serialized as an `HH:MM` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay {
    minutes: u16,
}

impl TimeOfDay {
    /// Build a time of day, or `None` when hour/minute are out of range.
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        if hour > 23 || minute > 59 {
            return None;
        }
        Some(Self {
            minutes: (hour * 60 + minute) as u16,
        })
    }

    pub fn hour(&self) -> u32 {
        u32::from(self.minutes) / 60
    }

    pub fn minute(&self) -> u32 {
        u32::from(self.minutes) % 60
    }

    /// Minutes elapsed since midnight.
    pub fn minutes_from_midnight(&self) -> u32 {
        u32::from(self.minutes)
    }

    pub fn to_naive_time(self) -> NaiveTime {
        // Range is enforced by the constructor.
        NaiveTime::from_hms_opt(self.hour(), self.minute(), 0).unwrap_or(NaiveTime::MIN)
    }
}

impl FromStr for TimeOfDay {
    type Err = SlotError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || {
            SlotError::InvalidConfiguration(format!("invalid time of day '{}': expected HH:MM", s))
        };

        let (hour, minute) = s.split_once(':').ok_or_else(invalid)?;
        let two_digits = |part: &str| part.len() == 2 && part.bytes().all(|b| b.is_ascii_digit());
        if !two_digits(hour) || !two_digits(minute) {
            return Err(invalid());
        }
        let hour: u32 = hour.parse().map_err(|_| invalid())?;
        let minute: u32 = minute.parse().map_err(|_| invalid())?;
        Self::new(hour, minute).ok_or_else(invalid)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = SlotError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// A recurring time-of-day interval within a weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeeklyShift {
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
}

impl WeeklyShift {
    pub fn new(start_time: TimeOfDay, end_time: TimeOfDay) -> Self {
        Self {
            start_time,
            end_time,
        }
    }

    /// Parse a shift from two `HH:MM` strings.
    pub fn parse(start_time: &str, end_time: &str) -> Result<Self> {
        Ok(Self::new(start_time.parse()?, end_time.parse()?))
    }
}

/// The shifts available on one ISO weekday (1 = Monday to 7 = Sunday).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityTemplate {
    pub iso_weekday: u32,
    #[serde(default)]
    pub shifts: Vec<WeeklyShift>,
}

impl AvailabilityTemplate {
    pub fn new(iso_weekday: u32, shifts: Vec<WeeklyShift>) -> Self {
        Self {
            iso_weekday,
            shifts,
        }
    }

    pub fn matches(&self, weekday: Weekday) -> bool {
        weekday.number_from_monday() == self.iso_weekday
    }
}

/// One bound of an exception period.
///
/// Months are 1-based. Without `year` the bound recurs every year. Without
/// `hour` the bound covers the whole day; a missing `minute` with an `hour`
/// present means minute 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodMoment {
    #[serde(default)]
    pub year: Option<i32>,
    pub month: u32,
    pub day: u32,
    #[serde(default)]
    pub hour: Option<u32>,
    #[serde(default)]
    pub minute: Option<u32>,
}

impl PeriodMoment {
    /// A recurring whole-day bound.
    pub fn day(month: u32, day: u32) -> Self {
        Self {
            year: None,
            month,
            day,
            hour: None,
            minute: None,
        }
    }

    /// A recurring bound at a given time.
    pub fn recurring(month: u32, day: u32, hour: u32, minute: u32) -> Self {
        Self {
            year: None,
            month,
            day,
            hour: Some(hour),
            minute: Some(minute),
        }
    }

    /// A bound pinned to a calendar year.
    pub fn dated(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> Self {
        Self {
            year: Some(year),
            month,
            day,
            hour: Some(hour),
            minute: Some(minute),
        }
    }

    pub fn has_year(&self) -> bool {
        self.year.is_some()
    }
}

/// A configured interval during which booking is disallowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExceptionPeriod {
    pub start_at: PeriodMoment,
    pub end_at: PeriodMoment,
}

impl ExceptionPeriod {
    pub fn new(start_at: PeriodMoment, end_at: PeriodMoment) -> Self {
        Self { start_at, end_at }
    }

    /// Recurring periods repeat every year and may wrap the new year.
    pub fn is_recurring(&self) -> bool {
        !self.start_at.has_year()
    }
}

/// A resolved, half-open `[start_at, end_at)` blocked interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BusyInterval {
    pub start_at: DateTime<Tz>,
    pub end_at: DateTime<Tz>,
}

impl BusyInterval {
    pub fn new(start_at: DateTime<Tz>, end_at: DateTime<Tz>) -> Self {
        Self { start_at, end_at }
    }

    /// The same instants expressed in another timezone.
    pub fn with_timezone(&self, tz: &Tz) -> Self {
        Self {
            start_at: self.start_at.with_timezone(tz),
            end_at: self.end_at.with_timezone(tz),
        }
    }

    pub fn intersects(&self, window_start: DateTime<Tz>, window_end: DateTime<Tz>) -> bool {
        self.start_at < window_end && self.end_at > window_start
    }

    /// True when `other` lies inside this interval and ends strictly earlier.
    pub fn encompasses(&self, other: &BusyInterval) -> bool {
        self.start_at <= other.start_at && self.end_at > other.end_at
    }
}

/// The rules used to search for slots.
///
/// Owned by the caller and read-only to the search. Minute values are
/// unsigned, so buffers, lead time and horizon can never be negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotConfiguration {
    /// Duration of an appointment in minutes.
    pub slot_duration_minutes: u32,
    /// IANA timezone used throughout the configuration (e.g. "Europe/Paris").
    pub time_zone: String,
    /// Weekly availability. Weekdays without a template have no slots.
    #[serde(default)]
    pub available_periods: Vec<AvailabilityTemplate>,
    /// Periods where booking is impossible. Take precedence over shifts.
    #[serde(default)]
    pub unavailable_periods: Vec<ExceptionPeriod>,
    /// Minimum free minutes required right before a slot.
    #[serde(default)]
    pub buffer_before_minutes: u32,
    /// Minimum free minutes required right after a slot.
    #[serde(default)]
    pub buffer_after_minutes: u32,
    /// Slot starts align to multiples of this many minutes past the hour.
    #[serde(default)]
    pub slot_start_minute_step: Option<u32>,
    /// Minimum minutes between "now" and the first bookable slot.
    #[serde(default)]
    pub min_time_before_first_slot_minutes: u32,
    /// Maximum days ahead of "now" a slot may be offered.
    #[serde(default)]
    pub max_days_before_last_slot: Option<u32>,
    /// How shift bounds falling on a DST transition are resolved.
    #[serde(default)]
    pub dst_policy: DstPolicy,
}

impl SlotConfiguration {
    /// A configuration with no availability, no exceptions and no buffers.
    pub fn new(slot_duration_minutes: u32, time_zone: impl Into<String>) -> Self {
        Self {
            slot_duration_minutes,
            time_zone: time_zone.into(),
            available_periods: Vec::new(),
            unavailable_periods: Vec::new(),
            buffer_before_minutes: 0,
            buffer_after_minutes: 0,
            slot_start_minute_step: None,
            min_time_before_first_slot_minutes: 0,
            max_days_before_last_slot: None,
            dst_policy: DstPolicy::default(),
        }
    }

    /// Parse a configuration from a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| SlotError::InvalidConfiguration(e.to_string()))
    }

    /// Resolve the configured IANA timezone.
    pub fn timezone(&self) -> Result<Tz> {
        self.time_zone
            .parse()
            .map_err(|_| SlotError::InvalidTimezone(self.time_zone.clone()))
    }

    pub fn slot_duration(&self) -> Duration {
        Duration::minutes(i64::from(self.slot_duration_minutes))
    }

    pub fn buffer_before(&self) -> Duration {
        Duration::minutes(i64::from(self.buffer_before_minutes))
    }

    pub fn buffer_after(&self) -> Duration {
        Duration::minutes(i64::from(self.buffer_after_minutes))
    }

    pub fn lead_time(&self) -> Duration {
        Duration::minutes(i64::from(self.min_time_before_first_slot_minutes))
    }

    pub fn slot_start_step(&self) -> u32 {
        self.slot_start_minute_step
            .unwrap_or(DEFAULT_SLOT_START_MINUTE_STEP)
    }

    /// The template configured for the weekday of `date`, if any.
    pub fn template_for<D: Datelike>(&self, date: &D) -> Option<&AvailabilityTemplate> {
        let weekday = date.weekday();
        self.available_periods.iter().find(|p| p.matches(weekday))
    }
}

/// A bookable slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeSlot {
    pub start_at: DateTime<Tz>,
    pub end_at: DateTime<Tz>,
    pub duration_minutes: i64,
}

impl TimeSlot {
    pub fn new(start_at: DateTime<Tz>, end_at: DateTime<Tz>) -> Self {
        Self {
            start_at,
            end_at,
            duration_minutes: (end_at - start_at).num_minutes(),
        }
    }
}
