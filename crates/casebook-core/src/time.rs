//! UTC timestamp helpers.
//!
//! Timestamps are stored as `%Y-%m-%dT%H:%M:%SZ` text so they sort
//! lexicographically in `SQLite`.

use chrono::{DateTime, Utc};

/// Storage format for all timestamps.
pub const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Current UTC time as an ISO 8601 string.
#[must_use]
pub fn now_iso() -> String {
    format_iso(Utc::now())
}

/// Format a UTC instant in the storage format.
#[must_use]
pub fn format_iso(at: DateTime<Utc>) -> String {
    at.format(ISO_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn formats_without_fraction() {
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 5).unwrap();
        assert_eq!(format_iso(at), "2026-03-01T09:30:05Z");
    }

    #[test]
    fn now_is_parseable() {
        let now = now_iso();
        assert!(DateTime::parse_from_rfc3339(&now).is_ok());
    }
}
