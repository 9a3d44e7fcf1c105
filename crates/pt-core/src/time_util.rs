//! Time utilities.
//!
//! Millisecond epoch timestamps are the canonical time unit; these helpers
//! render them as ISO-8601 UTC strings for records and request signing.

use chrono::{DateTime, SecondsFormat, Utc};

/// Render an epoch-millisecond timestamp as ISO-8601 UTC
/// (`2024-01-02T03:04:05.678Z`).
///
/// Returns an empty string for `0`, negative, or out-of-range input.
pub fn iso_from_ms(ts_ms: i64) -> String {
    if ts_ms <= 0 {
        return String::new();
    }
    DateTime::<Utc>::from_timestamp_millis(ts_ms)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_default()
}

/// Current UTC time in the ISO-8601 millisecond form used by request
/// signatures.
#[inline]
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iso_rendering() {
        assert_eq!(iso_from_ms(1_700_000_000_123), "2023-11-14T22:13:20.123Z");
        assert_eq!(iso_from_ms(1), "1970-01-01T00:00:00.001Z");
    }

    #[test]
    fn zero_and_negative_render_empty() {
        assert_eq!(iso_from_ms(0), "");
        assert_eq!(iso_from_ms(-5), "");
        assert_eq!(iso_from_ms(i64::MAX), "");
    }

    #[test]
    fn now_iso_has_millis_and_zulu() {
        let s = now_iso();
        assert!(s.ends_with('Z'));
        assert_eq!(s.len(), "2024-01-01T00:00:00.000Z".len());
    }
}
