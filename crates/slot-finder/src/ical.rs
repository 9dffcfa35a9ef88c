//! Busy-event provider for iCalendar (RFC 5545) data.
//!
//! Extracts `VEVENT` start/end pairs and converts them to the target timezone.
//! Events whose start or end cannot be resolved are dropped silently (logged at
//! debug level); they never reach the search.

use std::fmt;
use std::io::BufReader;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use ical::parser::ical::component::IcalEvent;
use ical::parser::ical::IcalParser;
use ical::property::Property;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::dst::resolve_local_forward;
use crate::error::{Result, SlotError};
use crate::types::BusyInterval;

/// Supported calendar data formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarFormat {
    #[default]
    ICal,
}

impl FromStr for CalendarFormat {
    type Err = SlotError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "ical" | "ics" | "icalendar" => Ok(CalendarFormat::ICal),
            _ => Err(SlotError::UnsupportedCalendarFormat(s.to_string())),
        }
    }
}

impl fmt::Display for CalendarFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalendarFormat::ICal => f.write_str("ical"),
        }
    }
}

/// Extract busy intervals from raw calendar data in the given format.
///
/// Absent or blank data yields an empty list.
pub fn extract_busy_intervals(
    format: CalendarFormat,
    data: Option<&str>,
    tz: &Tz,
) -> Vec<BusyInterval> {
    let Some(data) = data.filter(|d| !d.trim().is_empty()) else {
        return Vec::new();
    };
    match format {
        CalendarFormat::ICal => extract_events_from_ical(data, tz),
    }
}

/// Extract every `VEVENT` of an iCalendar document as a busy interval in `tz`.
///
/// Local times are read in the event's `TZID`, falling back to the calendar's
/// `X-WR-TIMEZONE` and then to `tz`. Values with a `Z` suffix are UTC; bare
/// dates are local midnight.
pub fn extract_events_from_ical(data: &str, tz: &Tz) -> Vec<BusyInterval> {
    let parser = IcalParser::new(BufReader::new(data.as_bytes()));
    let mut intervals = Vec::new();

    for calendar in parser {
        let calendar = match calendar {
            Ok(calendar) => calendar,
            Err(err) => {
                warn!("stopping iCal extraction on malformed data: {}", err);
                break;
            }
        };

        let calendar_tz = property_value(&calendar.properties, "X-WR-TIMEZONE")
            .and_then(|name| name.parse::<Tz>().ok());

        for event in &calendar.events {
            match event_interval(event, calendar_tz, tz) {
                Some(interval) => intervals.push(interval),
                None => debug!(
                    uid = property_value(&event.properties, "UID").unwrap_or("<none>"),
                    "skipping event without resolvable start/end"
                ),
            }
        }
    }

    debug!(count = intervals.len(), "extracted iCal busy intervals");
    intervals
}

fn event_interval(event: &IcalEvent, calendar_tz: Option<Tz>, tz: &Tz) -> Option<BusyInterval> {
    let start_prop = find_property(&event.properties, "DTSTART")?;
    let end_prop = find_property(&event.properties, "DTEND")?;

    let start_zone = property_zone(start_prop).or(calendar_tz).unwrap_or(*tz);
    let end_zone = property_zone(end_prop).unwrap_or(start_zone);

    let start = parse_ical_datetime(start_prop.value.as_deref()?, &start_zone)?;
    let end = parse_ical_datetime(end_prop.value.as_deref()?, &end_zone)?;
    if end <= start {
        return None;
    }

    Some(BusyInterval::new(start.with_timezone(tz), end.with_timezone(tz)))
}

/// Parse an iCalendar DATE or DATE-TIME value.
fn parse_ical_datetime(value: &str, zone: &Tz) -> Option<DateTime<Tz>> {
    let value = value.trim();

    if let Some(utc) = value.strip_suffix('Z') {
        let naive = NaiveDateTime::parse_from_str(utc, "%Y%m%dT%H%M%S").ok()?;
        return Some(Utc.from_utc_datetime(&naive).with_timezone(zone));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y%m%dT%H%M%S") {
        return Some(resolve_local_forward(zone, naive));
    }
    let date = NaiveDate::parse_from_str(value, "%Y%m%d").ok()?;
    Some(resolve_local_forward(zone, date.and_time(NaiveTime::MIN)))
}

fn find_property<'a>(properties: &'a [Property], name: &str) -> Option<&'a Property> {
    properties
        .iter()
        .find(|prop| prop.name.eq_ignore_ascii_case(name))
}

fn property_value<'a>(properties: &'a [Property], name: &str) -> Option<&'a str> {
    find_property(properties, name).and_then(|prop| prop.value.as_deref())
}

/// The timezone named by a property's `TZID` parameter, when known.
fn property_zone(prop: &Property) -> Option<Tz> {
    let tzid = prop
        .params
        .as_ref()?
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case("TZID"))
        .and_then(|(_, values)| values.first())?;

    match tzid.trim_matches('"').parse::<Tz>() {
        Ok(zone) => Some(zone),
        Err(_) => {
            debug!(tzid = tzid.as_str(), "unknown TZID, falling back to calendar timezone");
            None
        }
    }
}
