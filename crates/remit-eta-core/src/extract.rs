//! Delivery-timestamp resolution for quote responses.
//!
//! Strategies are tried in [`Strategy::ORDER`]; the first one that yields a
//! valid ISO-8601 date-time wins and later strategies are never consulted.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::locator::locate_fields;
use crate::timestamp::is_iso8601;

/// Top-level and per-option field names that carry a delivery timestamp directly.
pub const WELL_KNOWN_FIELDS: &[&str] = &[
    "deliveryEstimate",
    "estimatedDelivery",
    "estimatedDeliveryDate",
    "deliveryDate",
    "estimatedArrival",
];

/// Sub-object names that may wrap an estimate inside a list entry.
pub const DELIVERY_SUBKEYS: &[&str] = &["delivery", "deliveryTime", "time"];

/// Estimate-like fields looked up inside a delivery/time sub-object.
pub const ESTIMATE_FIELDS: &[&str] = &[
    "estimate",
    "estimated",
    "estimatedDelivery",
    "deliveryEstimate",
    "arrival",
    "estimatedArrival",
];

/// Keywords for the last-resort search.
pub const SEARCH_KEYWORDS: &[&str] = &["delivery", "estimate", "arrival", "time"];

/// One step of the resolution chain.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// A well-known top-level field.
    WellKnownField,

    /// Any top-level key containing "delivery".
    DeliveryKey,

    /// First entry of `paymentOptions`.
    FirstPaymentOption,

    /// First entry of `feeDetails`.
    FirstFeeDetail,

    /// Top-level `delivery` / `time` sub-objects.
    DeliverySubObject,

    /// Keyword search anywhere in the document.
    KeywordSearch,
}

impl Strategy {
    /// Resolution order.
    pub const ORDER: [Strategy; 6] = [
        Strategy::WellKnownField,
        Strategy::DeliveryKey,
        Strategy::FirstPaymentOption,
        Strategy::FirstFeeDetail,
        Strategy::DeliverySubObject,
        Strategy::KeywordSearch,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::WellKnownField => "well_known_field",
            Strategy::DeliveryKey => "delivery_key",
            Strategy::FirstPaymentOption => "first_payment_option",
            Strategy::FirstFeeDetail => "first_fee_detail",
            Strategy::DeliverySubObject => "delivery_sub_object",
            Strategy::KeywordSearch => "keyword_search",
        }
    }

    /// Run this strategy alone.
    pub fn resolve(&self, response: &Value) -> Option<String> {
        match self {
            Strategy::WellKnownField => well_known_field(response.as_object()?),
            Strategy::DeliveryKey => delivery_key(response.as_object()?),
            Strategy::FirstPaymentOption => first_entry(response.as_object()?, "paymentOptions"),
            Strategy::FirstFeeDetail => first_entry(response.as_object()?, "feeDetails"),
            Strategy::DeliverySubObject => delivery_sub_object(response.as_object()?),
            Strategy::KeywordSearch => keyword_search(response),
        }
    }
}

/// A resolved timestamp and the strategy that found it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeliveryCandidate {
    pub strategy: Strategy,
    pub timestamp: String,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Find the best delivery timestamp in a quote response.
pub fn resolve_delivery(response: &Value) -> Option<DeliveryCandidate> {
    let candidate = Strategy::ORDER.iter().find_map(|strategy| {
        strategy.resolve(response).map(|timestamp| DeliveryCandidate {
            strategy: *strategy,
            timestamp,
        })
    });

    match &candidate {
        Some(c) => debug!(
            strategy = c.strategy.name(),
            timestamp = %c.timestamp,
            "Resolved delivery timestamp"
        ),
        None => debug!("No delivery timestamp in response"),
    }
    candidate
}

/// [`resolve_delivery`] without the strategy tag.
pub fn extract_delivery(response: &Value) -> Option<String> {
    resolve_delivery(response).map(|c| c.timestamp)
}

/// Delivery timestamp for a single `paymentOptions` / `feeDetails` entry.
///
/// Checks a direct delivery field, then a nested delivery/time sub-object
/// exposing an estimate field, then that sub-value as a timestamp itself.
pub fn option_delivery(entry: &Value) -> Option<String> {
    let entry = entry.as_object()?;
    if let Some(ts) = well_known_field(entry) {
        return Some(ts);
    }

    DELIVERY_SUBKEYS
        .iter()
        .filter_map(|key| entry.get(*key))
        .find_map(|sub| match sub {
            Value::Object(inner) => estimate_field(inner),
            other => iso_string(other),
        })
}

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn iso_string(value: &Value) -> Option<String> {
    value
        .as_str()
        .filter(|s| is_iso8601(s))
        .map(str::to_string)
}

fn well_known_field(obj: &Map<String, Value>) -> Option<String> {
    WELL_KNOWN_FIELDS
        .iter()
        .filter_map(|key| obj.get(*key))
        .find_map(iso_string)
}

fn estimate_field(obj: &Map<String, Value>) -> Option<String> {
    ESTIMATE_FIELDS
        .iter()
        .filter_map(|key| obj.get(*key))
        .find_map(iso_string)
}

fn delivery_key(top: &Map<String, Value>) -> Option<String> {
    top.iter()
        .filter(|(key, _)| key.to_lowercase().contains("delivery"))
        .find_map(|(_, value)| iso_string(value))
}

fn first_entry(top: &Map<String, Value>, list_key: &str) -> Option<String> {
    let first = top.get(list_key)?.as_array()?.first()?;
    option_delivery(first)
}

fn delivery_sub_object(top: &Map<String, Value>) -> Option<String> {
    ["delivery", "time"]
        .iter()
        .filter_map(|key| top.get(*key)?.as_object())
        .find_map(estimate_field)
}

fn keyword_search(response: &Value) -> Option<String> {
    locate_fields(response, SEARCH_KEYWORDS)
        .iter()
        .find_map(|field| iso_string(&field.value))
}
