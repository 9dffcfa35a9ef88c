//! Error types for slot-finder operations.

use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SlotError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// The search window is reversed (`from` is after `to`).
    #[error("Invalid boundaries for the search: {from} is after {to}")]
    InvalidBoundaries {
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    },

    #[error("Unsupported calendar format: {0}")]
    UnsupportedCalendarFormat(String),
}

pub type Result<T> = std::result::Result<T, SlotError>;
