//! Single-combination execution: one quote request turned into one outcome.

use chrono::{DateTime, Utc};
use remit_eta_client::{QuoteError, QuoteRequest, QuoteSource};
use remit_eta_core::extract::{option_delivery, resolve_delivery};
use remit_eta_core::{
    locate_fields, normalize, BaselineTable, ExperimentOutcome, OptionEstimate,
    PaymentMethodSpec, TestCase,
};
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Keywords for the diagnostic field scan on every successful response.
pub const DIAGNOSTIC_KEYWORDS: &[&str] = &["delivery", "time", "estimate", "arrival", "duration"];

/// Settings shared by every combination in a run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// `rateType` sent with each quote
    pub rate_type: String,

    /// Per-call timeout in seconds (0 disables the runner-side timeout).
    pub timeout_secs: u64,

    /// Fallback delivery times by pair key
    pub baseline: BaselineTable,
}

impl RunConfig {
    pub fn new(rate_type: &str, timeout_secs: u64, baseline: BaselineTable) -> Self {
        Self {
            rate_type: rate_type.to_string(),
            timeout_secs,
            baseline,
        }
    }

    /// Take rate type and timeout from the client configuration.
    pub fn from_quote_config(
        config: &remit_eta_client::QuoteConfig,
        baseline: BaselineTable,
    ) -> Self {
        Self::new(&config.rate_type, config.timeout_secs, baseline)
    }
}

/// Quotes one (case, method) combination.
pub struct CombinationRunner;

impl CombinationRunner {
    /// Request a quote and turn the response (or the failure) into an outcome.
    ///
    /// Never fails: transport errors, timeouts, non-2xx statuses and malformed
    /// bodies all become failure outcomes carrying the message and payload.
    pub async fn execute(
        source: &dyn QuoteSource,
        config: &RunConfig,
        case: &TestCase,
        method: &PaymentMethodSpec,
    ) -> ExperimentOutcome {
        let start = Instant::now();
        let request = QuoteRequest::for_case(case, method, &config.rate_type);

        let response = if config.timeout_secs > 0 {
            tokio::time::timeout(
                Duration::from_secs(config.timeout_secs),
                source.fetch_quote(&request),
            )
            .await
            .unwrap_or(Err(QuoteError::Timeout {
                secs: config.timeout_secs,
            }))
        } else {
            source.fetch_quote(&request).await
        };

        let duration_ms = start.elapsed().as_millis() as u64;

        match response {
            Ok(body) => Self::interpret(
                case.clone(),
                method,
                &body,
                &config.baseline,
                Utc::now(),
                duration_ms,
            ),
            Err(e) => {
                warn!(
                    pair = %case.pair_key(),
                    amount = case.amount,
                    method = %method.label,
                    error = %e,
                    "Quote request failed"
                );
                ExperimentOutcome::failure(
                    case.clone(),
                    &method.label,
                    e.to_string(),
                    e.payload(),
                    duration_ms,
                )
            }
        }
    }

    /// Build a success outcome from a quote body, evaluated against `now`.
    pub fn interpret(
        case: TestCase,
        method: &PaymentMethodSpec,
        body: &Value,
        baseline: &BaselineTable,
        now: DateTime<Utc>,
        duration_ms: u64,
    ) -> ExperimentOutcome {
        let pair = case.pair_key();

        let fields = locate_fields(body, DIAGNOSTIC_KEYWORDS);
        for field in &fields {
            debug!(pair = %pair, path = %field.path, value = %field.value, "Time-related field");
        }

        let candidate = resolve_delivery(body);
        if candidate.is_none() {
            debug!(pair = %pair, method = %method.label, "No delivery estimate in response");
        }
        let estimate = normalize(
            candidate.as_ref().map(|c| c.timestamp.as_str()),
            &pair,
            baseline,
            now,
        );
        let options = option_estimates(body, &pair, baseline, now);

        ExperimentOutcome::success(case, &method.label, estimate, fields, options, duration_ms)
    }
}

/// One estimate per `paymentOptions` entry naming both `payIn` and `payOut`.
pub fn option_estimates(
    body: &Value,
    pair: &str,
    baseline: &BaselineTable,
    now: DateTime<Utc>,
) -> Vec<OptionEstimate> {
    let Some(options) = body.get("paymentOptions").and_then(Value::as_array) else {
        return Vec::new();
    };

    options
        .iter()
        .filter_map(|entry| {
            let pay_in = entry.get("payIn")?.as_str()?;
            let pay_out = entry.get("payOut")?.as_str()?;
            let candidate = option_delivery(entry);
            Some(OptionEstimate {
                pay_in: pay_in.to_string(),
                pay_out: pay_out.to_string(),
                estimate: normalize(candidate.as_deref(), pair, baseline, now),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use remit_eta_core::SourceKind;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 25, 19, 1, 0).unwrap()
    }

    #[test]
    fn test_interpret_reads_top_level_estimate() {
        let body = json!({
            "id": "q-1",
            "estimatedDelivery": "2025-04-28T08:01:00Z",
            "rate": 1.17
        });
        let outcome = CombinationRunner::interpret(
            TestCase::new("GBP", "EUR", 1000.0),
            &PaymentMethodSpec::default_method("Default"),
            &body,
            &BaselineTable::reference(),
            now(),
            12,
        );

        assert!(outcome.succeeded());
        assert_eq!(outcome.hours(), Some(61));
        assert_eq!(outcome.raw_timestamp(), Some("2025-04-28T08:01:00Z"));
        assert_eq!(outcome.extracted_time_fields.len(), 1);
        assert_eq!(outcome.extracted_time_fields[0].path, "estimatedDelivery");
        assert_eq!(outcome.duration_ms, 12);
    }

    #[test]
    fn test_interpret_falls_back_to_baseline() {
        let outcome = CombinationRunner::interpret(
            TestCase::new("USD", "GBP", 100.0),
            &PaymentMethodSpec::default_method("Default"),
            &json!({ "id": "q-2" }),
            &BaselineTable::reference(),
            now(),
            0,
        );
        let estimate = outcome.delivery_estimate.as_ref().unwrap();
        assert_eq!(estimate.source_kind, SourceKind::BaselineFallback);
        assert_eq!(estimate.hours, Some(37));
        assert!(outcome.extracted_time_fields.is_empty());
    }

    #[test]
    fn test_option_estimates_per_entry() {
        let body = json!({
            "paymentOptions": [
                { "payIn": "BANK_TRANSFER", "payOut": "BANK_TRANSFER",
                  "estimatedDelivery": "2025-04-26T19:01:00Z" },
                { "payIn": "DEBIT", "payOut": "BANK_TRANSFER",
                  "delivery": { "estimate": "2025-04-25T21:01:00Z" } },
                { "payIn": "CREDIT" },
                { "payIn": "SWIFT", "payOut": "SWIFT" }
            ]
        });
        let options = option_estimates(&body, "ZAR to JPY", &BaselineTable::reference(), now());

        assert_eq!(options.len(), 3);
        assert_eq!(options[0].pay_in, "BANK_TRANSFER");
        assert_eq!(options[0].estimate.hours, Some(24));
        assert_eq!(options[1].pay_in, "DEBIT");
        assert_eq!(options[1].estimate.hours, Some(2));
        assert_eq!(options[2].estimate.source_kind, SourceKind::Unavailable);
    }

    #[test]
    fn test_option_estimates_without_payment_options() {
        let options = option_estimates(
            &json!({ "paymentOptions": "n/a" }),
            "GBP to EUR",
            &BaselineTable::reference(),
            now(),
        );
        assert!(options.is_empty());
    }
}
