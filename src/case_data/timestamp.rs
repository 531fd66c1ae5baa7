// Feed-level "last updated" stamps, e.g. "2020-03-29T00:50:02.918Z"

use chrono::{DateTime, NaiveDateTime, Utc};

const FEED_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";
const DISPLAY_FORMAT: &str = "%d-%b-%Y %H:%M:%S";

/// Shown when a feed omits its timestamp.
pub const NO_DATE: &str = "Date is nil";

pub fn parse_last_updated(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, FEED_FORMAT).map(|naive| naive.and_utc()))
        .ok()
}

/// Render a feed timestamp as `29-Mar-2020 00:50:02` (UTC).
///
/// Returns `None` when the stamp is present but unreadable.
pub fn format_last_updated(raw: &str) -> Option<String> {
    if raw.trim().is_empty() {
        return Some(NO_DATE.to_string());
    }
    parse_last_updated(raw).map(|dt| dt.format(DISPLAY_FORMAT).to_string())
}
