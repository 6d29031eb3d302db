//! Wall-clock helpers
//!
//! Reservation slots are restaurant-local wall-clock values at minute
//! resolution (`NaiveDateTime`). Parsing helpers log and return `None`
//! on malformed input instead of failing the caller.

use chrono::{Local, NaiveDate, NaiveDateTime};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    match NaiveDate::parse_from_str(value, DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(e) => {
            tracing::warn!(input = value, error = %e, "invalid date");
            None
        }
    }
}

/// Parse a `YYYY-MM-DD HH:MM` timestamp (minute resolution, no seconds).
pub fn parse_date_time(value: &str) -> Option<NaiveDateTime> {
    match NaiveDateTime::parse_from_str(value, DATE_TIME_FORMAT) {
        Ok(at) => Some(at),
        Err(e) => {
            tracing::warn!(input = value, error = %e, "invalid timestamp");
            None
        }
    }
}

/// Time source for every lifecycle decision: "has the slot passed",
/// walk-in grace, duplicate-reservation checks, the current service
/// window. `System` reads the local wall clock; `Fixed` pins it so tests
/// and replays are deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    System,
    Fixed(NaiveDateTime),
}

impl Clock {
    pub fn now(&self) -> NaiveDateTime {
        match self {
            Clock::System => Local::now().naive_local(),
            Clock::Fixed(at) => *at,
        }
    }
}
