//! ISO-8601 date-time validation.
//!
//! A string counts as a delivery timestamp only if it has the shape of an
//! ISO-8601 date-time *and* names a real calendar instant: `2025-02-30T..`
//! passes the shape check but is rejected here.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use regex::Regex;
use std::sync::OnceLock;

fn iso_shape() -> &'static Regex {
    static SHAPE: OnceLock<Regex> = OnceLock::new();
    SHAPE.get_or_init(|| {
        Regex::new(
            r"^(\d{4}-\d{2}-\d{2}T\d{2}:\d{2}(?::\d{2}(?:\.\d{1,9})?)?)(Z|[+-]\d{2}:?\d{2})?$",
        )
        .expect("static ISO-8601 pattern is valid")
    })
}

/// Parse an ISO-8601 date-time into UTC.
///
/// Accepts `Z`, `±HH:MM` and `±HHMM` offsets; a missing offset is read as UTC.
/// Returns `None` for anything that is not a real date-time.
pub fn parse_iso8601(candidate: &str) -> Option<DateTime<Utc>> {
    let caps = iso_shape().captures(candidate.trim())?;
    let local = caps.get(1)?.as_str();

    let format = if local.matches(':').count() == 2 {
        "%Y-%m-%dT%H:%M:%S%.f"
    } else {
        "%Y-%m-%dT%H:%M"
    };
    let naive = NaiveDateTime::parse_from_str(local, format).ok()?;

    match caps.get(2).map(|m| m.as_str()) {
        None | Some("Z") => Some(Utc.from_utc_datetime(&naive)),
        Some(offset) => {
            let offset = parse_offset(offset)?;
            let local = offset.from_local_datetime(&naive).single()?;
            Some(local.with_timezone(&Utc))
        }
    }
}

/// Whether `candidate` is a valid ISO-8601 date-time.
pub fn is_iso8601(candidate: &str) -> bool {
    parse_iso8601(candidate).is_some()
}

fn parse_offset(offset: &str) -> Option<FixedOffset> {
    let sign = if offset.starts_with('-') { -1 } else { 1 };
    let digits: String = offset[1..].chars().filter(|c| *c != ':').collect();
    let hours: i32 = digits.get(0..2)?.parse().ok()?;
    let minutes: i32 = digits.get(2..4)?.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn accepts_rfc3339_utc() {
        let dt = parse_iso8601("2025-04-28T08:01:00Z").unwrap();
        assert_eq!(dt.hour(), 8);
        assert_eq!(dt.minute(), 1);
    }

    #[test]
    fn accepts_fractional_seconds() {
        assert!(is_iso8601("2025-04-28T08:01:00.123456Z"));
    }

    #[test]
    fn applies_offsets() {
        let with_colon = parse_iso8601("2025-04-28T10:01:00+02:00").unwrap();
        let without_colon = parse_iso8601("2025-04-28T10:01:00+0200").unwrap();
        let utc = parse_iso8601("2025-04-28T08:01:00Z").unwrap();
        assert_eq!(with_colon, utc);
        assert_eq!(without_colon, utc);
    }

    #[test]
    fn missing_offset_is_utc() {
        let naive = parse_iso8601("2025-04-28T08:01:00").unwrap();
        let utc = parse_iso8601("2025-04-28T08:01:00Z").unwrap();
        assert_eq!(naive, utc);
    }

    #[test]
    fn accepts_minutes_precision() {
        assert!(is_iso8601("2025-04-28T08:01Z"));
    }

    #[test]
    fn rejects_impossible_dates() {
        assert!(!is_iso8601("2025-02-30T00:00:00Z"));
        assert!(!is_iso8601("2025-13-01T00:00:00Z"));
        assert!(!is_iso8601("2025-04-28T25:00:00Z"));
        assert!(!is_iso8601("2025-04-28T08:01:00+24:00"));
    }

    #[test]
    fn rejects_non_datetimes() {
        assert!(!is_iso8601(""));
        assert!(!is_iso8601("2025-04-28"));
        assert!(!is_iso8601("by Monday"));
        assert!(!is_iso8601("1714291260"));
        assert!(!is_iso8601("2025-04-28 08:01:00"));
    }
}
