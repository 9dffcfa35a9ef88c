//! # slot-finder
//!
//! Bookable time-slot search over a weekly availability template.
//!
//! Given recurring weekday shifts, configured exception periods and busy
//! intervals imported from a calendar feed, the slot finder computes every
//! fixed-duration slot that satisfies the buffer, alignment, lead-time and
//! horizon rules, with timezone-correct arithmetic via `chrono-tz`.
//!
//! ## Modules
//!
//! - [`shifts`]: Merge overlapping shifts of a weekday template
//! - [`busy`]: Resolve exception periods into absolute busy intervals
//! - [`timeline`]: Filter, sort and de-encompass busy intervals
//! - [`boundary`]: Effective search window from lead time and horizon
//! - [`sweep`]: Single-cursor slot sweep over one shift occurrence
//! - [`finder`]: Search entry points (`find_slots`, `find_available_slots`)
//! - [`config`]: Configuration validation
//! - [`ical`]: iCalendar busy-event provider
//! - [`dst`]: DST policies for local wall times
//! - [`types`]: Configuration and result types
//! - [`error`]: Error types

pub mod boundary;
pub mod busy;
pub mod config;
pub mod dst;
pub mod error;
pub mod finder;
pub mod ical;
pub mod shifts;
pub mod sweep;
pub mod timeline;
pub mod types;

pub use config::validate_configuration;
pub use error::SlotError;
pub use finder::{collect_busy_intervals, find_available_slots, find_slots, SearchRequest};
pub use ical::CalendarFormat;
pub use types::{
    AvailabilityTemplate, BusyInterval, ExceptionPeriod, PeriodMoment, SlotConfiguration,
    TimeOfDay, TimeSlot, WeeklyShift,
};
