use chrono::{DateTime, NaiveDateTime, Utc};

/// Formats a backend timestamp for display, e.g. `Aug 13, 2025, 1:07 AM UTC`.
///
/// Accepts RFC 3339 (any fractional precision, microseconds included) and
/// naive ISO timestamps, which the backend emits in UTC.
pub fn format_utc(iso: &str) -> Option<String> {
    parse_utc(iso).map(|dt| dt.format("%b %d, %Y, %-I:%M %p UTC").to_string())
}

pub fn parse_utc(iso: &str) -> Option<DateTime<Utc>> {
    let iso = iso.trim();
    if iso.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(iso) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(iso, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(iso, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}
