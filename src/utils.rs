// ABOUTME: Event-time helpers shared by the resolver, the store, and the renderer
// ABOUTME: Handles the `YYYY-MM-DD HH:MM:SS[.ffffff]` wire format

use chrono::{NaiveDateTime, Timelike};

use crate::error::PollError;

pub const EVENT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const EVENT_TIME_FORMAT_MICROS: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Parse an event time in either the second or sub-second form.
///
/// Surrounding whitespace is ignored.
///
/// # Examples
///
/// ```
/// # use mysql_log_tail::utils::parse_event_time;
/// assert!(parse_event_time("2024-01-01 10:00:00").is_ok());
/// assert!(parse_event_time("2024-01-01 10:00:00.123456").is_ok());
/// assert!(parse_event_time("yesterday-ish").is_err());
/// ```
pub fn parse_event_time(raw: &str) -> Result<NaiveDateTime, PollError> {
    let trimmed = raw.trim();
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f")
        .map_err(|e| PollError::Config(format!("invalid event time {:?}: {}", trimmed, e)))
}

/// Format an event time, carrying microseconds only when the value has
/// sub-second precision.
pub fn format_event_time(ts: NaiveDateTime) -> String {
    if ts.nanosecond() == 0 {
        ts.format(EVENT_TIME_FORMAT).to_string()
    } else {
        ts.format(EVENT_TIME_FORMAT_MICROS).to_string()
    }
}
