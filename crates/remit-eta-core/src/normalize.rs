//! Turn a candidate timestamp (or its absence) into a [`DeliveryEstimate`].

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::domain::{BaselineTable, DeliveryEstimate, SourceKind};
use crate::timestamp::parse_iso8601;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Render an arrival instant as `"Monday, Apr 28 at 08:01"` (UTC, 24-hour).
pub fn format_arrival(at: DateTime<Utc>) -> String {
    at.format("%A, %b %-d at %H:%M").to_string()
}

/// Human-readable duration for a whole number of hours.
///
/// Under a day: `"less than a day (N hours)"`; otherwise
/// `"D day(s)"` with `" and H hour(s)"` when there is a remainder.
pub fn describe_hours(hours: i64) -> String {
    if hours < 24 {
        return format!("less than a day ({} {})", hours, plural(hours, "hour"));
    }

    let days = hours / 24;
    let rest = hours % 24;
    if rest == 0 {
        format!("{} {}", days, plural(days, "day"))
    } else {
        format!(
            "{} {} and {} {}",
            days,
            plural(days, "day"),
            rest,
            plural(rest, "hour")
        )
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        unit.to_string()
    } else {
        format!("{}s", unit)
    }
}

/// Rounded hours from `now` until `at`, clamped to zero for past instants.
pub fn hours_until(at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let millis = (at - now).num_milliseconds();
    if millis < 0 {
        return 0;
    }
    (millis as f64 / MILLIS_PER_HOUR).round() as i64
}

/// Normalize a delivery candidate against `now`.
///
/// Resolution:
/// - valid timestamp: hours from now (0 if already past), `ApiProvided`;
/// - otherwise an exact `pair_key` baseline match: `BaselineFallback`;
/// - otherwise `Unavailable`.
pub fn normalize(
    candidate: Option<&str>,
    pair_key: &str,
    baseline: &BaselineTable,
    now: DateTime<Utc>,
) -> DeliveryEstimate {
    if let Some((raw, at)) = candidate.and_then(|raw| parse_iso8601(raw).map(|at| (raw, at))) {
        if at < now {
            warn!(
                pair = pair_key,
                timestamp = raw,
                "Delivery estimate is in the past; clamping to 0 hours"
            );
        }
        let hours = hours_until(at, now);
        return DeliveryEstimate {
            raw_timestamp: Some(raw.to_string()),
            hours: Some(hours),
            arrival_date: format_arrival(at),
            display_text: describe_hours(hours),
            source_kind: SourceKind::ApiProvided,
        };
    }

    match baseline.get(pair_key) {
        Some(entry) => DeliveryEstimate {
            raw_timestamp: None,
            hours: Some(entry.hours),
            arrival_date: entry.sample_arrival_date.clone(),
            display_text: entry.description.clone(),
            source_kind: SourceKind::BaselineFallback,
        },
        None => DeliveryEstimate::unavailable(),
    }
}

/// [`normalize`] against the wall clock.
pub fn normalize_now(
    candidate: Option<&str>,
    pair_key: &str,
    baseline: &BaselineTable,
) -> DeliveryEstimate {
    normalize(candidate, pair_key, baseline, Utc::now())
}
