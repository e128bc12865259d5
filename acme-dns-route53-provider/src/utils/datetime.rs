//! Timestamp parsing for provider responses

use chrono::{DateTime, NaiveDateTime, Utc};

/// Parse an ISO 8601 timestamp as returned by AWS APIs.
///
/// Accepts RFC 3339 (`2017-03-10T01:36:41.958Z`) and the offset-less form
/// some endpoints emit (`2017-03-10T01:36:41`), which is read as UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// `X-Amz-Date` header value (`20150830T123600Z`).
pub fn amz_date(now: DateTime<Utc>) -> String {
    now.format("%Y%m%dT%H%M%SZ").to_string()
}
