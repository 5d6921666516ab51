//! Per-combination experiment outcomes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::estimate::DeliveryEstimate;
use super::fixture::TestCase;

/// A keyword match found anywhere in a quote response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExtractedField {
    /// Dot-joined key path; array elements appear as `[index]`.
    pub path: String,
    pub value: Value,
}

/// Delivery estimate for one entry of a response's `paymentOptions` list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OptionEstimate {
    pub pay_in: String,
    pub pay_out: String,
    pub estimate: DeliveryEstimate,
}

/// Result of quoting one (test case, payment method) combination.
///
/// Failed calls still produce an outcome; `error` is set and
/// `delivery_estimate` is `None`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExperimentOutcome {
    pub case: TestCase,

    /// Payment method label.
    pub method: String,

    #[serde(default)]
    pub delivery_estimate: Option<DeliveryEstimate>,

    #[serde(default)]
    pub extracted_time_fields: Vec<ExtractedField>,

    #[serde(default)]
    pub payment_options: Vec<OptionEstimate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Response body captured alongside a failure, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_payload: Option<Value>,

    pub duration_ms: u64,
}

impl ExperimentOutcome {
    pub fn success(
        case: TestCase,
        method: &str,
        estimate: DeliveryEstimate,
        extracted_time_fields: Vec<ExtractedField>,
        payment_options: Vec<OptionEstimate>,
        duration_ms: u64,
    ) -> Self {
        Self {
            case,
            method: method.to_string(),
            delivery_estimate: Some(estimate),
            extracted_time_fields,
            payment_options,
            error: None,
            error_payload: None,
            duration_ms,
        }
    }

    pub fn failure(
        case: TestCase,
        method: &str,
        error: String,
        error_payload: Option<Value>,
        duration_ms: u64,
    ) -> Self {
        Self {
            case,
            method: method.to_string(),
            delivery_estimate: None,
            extracted_time_fields: Vec::new(),
            payment_options: Vec::new(),
            error: Some(error),
            error_payload,
            duration_ms,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }

    /// Raw timestamp behind the headline estimate, if the API supplied one.
    pub fn raw_timestamp(&self) -> Option<&str> {
        self.delivery_estimate
            .as_ref()
            .and_then(|e| e.raw_timestamp.as_deref())
    }

    pub fn hours(&self) -> Option<i64> {
        self.delivery_estimate.as_ref().and_then(|e| e.hours)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_failure_outcome_has_no_estimate() {
        let outcome = ExperimentOutcome::failure(
            TestCase::new("GBP", "EUR", 1000.0),
            "Default",
            "HTTP 500".to_string(),
            Some(json!({ "error": "boom" })),
            12,
        );
        assert!(!outcome.succeeded());
        assert!(outcome.delivery_estimate.is_none());
        assert_eq!(outcome.hours(), None);
        assert_eq!(outcome.raw_timestamp(), None);
    }

    #[test]
    fn test_success_outcome_exposes_hours() {
        let estimate = DeliveryEstimate {
            raw_timestamp: Some("2099-01-01T00:00:00Z".to_string()),
            hours: Some(5),
            arrival_date: "Thursday, Jan 1 at 00:00".to_string(),
            display_text: "less than a day (5 hours)".to_string(),
            source_kind: crate::domain::SourceKind::ApiProvided,
        };
        let outcome = ExperimentOutcome::success(
            TestCase::new("GBP", "EUR", 1000.0),
            "Default",
            estimate,
            vec![],
            vec![],
            7,
        );
        assert!(outcome.succeeded());
        assert_eq!(outcome.hours(), Some(5));
        assert_eq!(outcome.raw_timestamp(), Some("2099-01-01T00:00:00Z"));
    }

    #[test]
    fn test_success_serialization_omits_error_fields() {
        let outcome = ExperimentOutcome::success(
            TestCase::new("GBP", "EUR", 1000.0),
            "Default",
            DeliveryEstimate::unavailable(),
            vec![],
            vec![],
            0,
        );
        let v = serde_json::to_value(&outcome).unwrap();
        let obj = v.as_object().unwrap();
        assert!(!obj.contains_key("error"));
        assert!(!obj.contains_key("error_payload"));
        assert!(obj.contains_key("delivery_estimate"));
    }
}
