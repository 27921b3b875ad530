//! Timestamp helpers for the provider's and XMLTV's conventions
//!
//! The provider speaks fractional-second UTC timestamps
//! (`2024-04-18T19:00:00.000Z`); XMLTV wants `YYYYMMDDHHMMSS +0000`. EPG
//! windows always start at the top of an hour.

use chrono::{DateTime, Timelike, Utc};

/// Truncate a timestamp to the top of its hour
pub fn truncate_to_hour(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.with_minute(0)
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(ts)
}

/// Format a window start time the way the timeline endpoint expects
pub fn format_window_start(ts: DateTime<Utc>) -> String {
    truncate_to_hour(ts)
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
}

/// Format a timestamp for XMLTV start/stop attributes
pub fn xmltv_timestamp(ts: DateTime<Utc>) -> String {
    ts.format("%Y%m%d%H%M%S %z").to_string()
}

/// Format a release date for the `original-air-date` episode-num system
pub fn air_date_timestamp(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Format a release date for the XMLTV `date` element
pub fn xmltv_date(ts: DateTime<Utc>) -> String {
    ts.format("%Y%m%d").to_string()
}
