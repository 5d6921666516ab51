//! Normalized delivery estimates.

use serde::{Deserialize, Serialize};

/// Arrival date reported when nothing is known.
pub const UNKNOWN_ARRIVAL: &str = "Unknown";

/// Where a delivery estimate came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Derived from a timestamp in the quote response.
    ApiProvided,

    /// Taken verbatim from the baseline table.
    BaselineFallback,

    /// Neither the response nor the baseline had anything usable.
    Unavailable,
}

/// A presentable, comparable delivery estimate.
///
/// `hours` is `None` exactly when `source_kind` is [`SourceKind::Unavailable`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeliveryEstimate {
    /// Timestamp as it appeared in the response (ApiProvided only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_timestamp: Option<String>,

    /// Whole hours until delivery, never negative.
    pub hours: Option<i64>,

    /// e.g. `"Monday, Apr 28 at 08:01"`, or `"Unknown"`.
    pub arrival_date: String,

    /// e.g. `"2 days and 13 hours"`.
    pub display_text: String,

    pub source_kind: SourceKind,
}

impl DeliveryEstimate {
    /// The "no data" estimate.
    pub fn unavailable() -> Self {
        Self {
            raw_timestamp: None,
            hours: None,
            arrival_date: UNKNOWN_ARRIVAL.to_string(),
            display_text: UNKNOWN_ARRIVAL.to_string(),
            source_kind: SourceKind::Unavailable,
        }
    }

    pub fn is_api_provided(&self) -> bool {
        self.source_kind == SourceKind::ApiProvided
    }
}
