//! Time utilities for Netskel
//!
//! Registry fields hold decimal epoch seconds; these helpers produce them and
//! render them for people.

use chrono::{DateTime, Local, TimeZone, Utc};
use std::time::{SystemTime, UNIX_EPOCH};

/// Format used by `netskelctl` for epoch fields
///
/// chrono has no zone abbreviations, so the zone is always a numeric offset.
const HUMAN_FORMAT: &str = "%a %b %-d %Y @ %H:%M:%S %z";

/// ctime-style stamp written to the trusted-access file
const CTIME_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

/// Stamp written in generated file headers
const HEADER_FORMAT: &str = "%a, %-d %b %Y %H:%M:%S UTC";

/// Get the current Unix timestamp in seconds.
///
/// # Panics
/// Panics if the system time is before the Unix epoch.
pub fn current_time_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX epoch")
        .as_secs() as i64
}

/// Seconds elapsed since `since`, zero if it lies in the future
pub fn elapsed_secs(since: i64, now: i64) -> i64 {
    now.saturating_sub(since).max(0)
}

/// Render epoch seconds as local time, e.g. `Mon Jan 2 2006 @ 15:04:05 -0700`
pub fn format_epoch(secs: i64) -> Option<String> {
    Local
        .timestamp_opt(secs, 0)
        .single()
        .map(|t| t.format(HUMAN_FORMAT).to_string())
}

/// Render a stored epoch field, falling back to the raw value
pub fn format_epoch_field(value: &str) -> String {
    value
        .trim()
        .parse::<i64>()
        .ok()
        .and_then(format_epoch)
        .unwrap_or_else(|| value.to_string())
}

/// ctime-style local time, e.g. `Mon Jan  2 15:04:05 2006`
pub fn format_ctime(time: &DateTime<Local>) -> String {
    time.format(CTIME_FORMAT).to_string()
}

/// UTC stamp for generated headers, e.g. `Mon, 2 Jan 2006 15:04:05 UTC`
pub fn format_header_time(time: &DateTime<Utc>) -> String {
    time.format(HEADER_FORMAT).to_string()
}
