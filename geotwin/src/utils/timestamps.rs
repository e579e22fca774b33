//! Timestamp helpers for event payloads.

use chrono::{SecondsFormat, Utc};

/// Returns the current time as an ISO-8601 / RFC 3339 string in UTC.
#[must_use]
pub fn iso_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    #[test]
    fn test_iso_timestamp_round_trips() {
        let stamp = iso_timestamp();
        assert!(DateTime::parse_from_rfc3339(&stamp).is_ok());
        assert!(stamp.ends_with('Z'));
    }
}
