//! Display-side timestamp conversion for the render boundary.
//!
//! The historian reports `recvTime` in UTC ("2024-01-01T00:00:00.000Z", the
//! millisecond part sometimes missing). The core keeps those raw strings
//! authoritative; this module only re-renders them at a configured offset for
//! the `/series/display` endpoint.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};

const FORMAT_MILLIS: &str = "%Y-%m-%dT%H:%M:%S%.fZ";
const FORMAT_SECS: &str = "%Y-%m-%dT%H:%M:%SZ";

pub fn parse_recv_time(raw: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw, FORMAT_MILLIS)
        .or_else(|_| NaiveDateTime::parse_from_str(raw, FORMAT_SECS))
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Re-render a raw historian timestamp at `offset`, RFC 3339. Unparseable
/// input passes through unchanged; display formatting must never drop points.
pub fn to_display(raw: &str, offset: FixedOffset) -> String {
    match parse_recv_time(raw) {
        Some(dt) => dt.with_timezone(&offset).to_rfc3339(),
        None => raw.to_string(),
    }
}
