//! Quote request body

use remit_eta_core::{PaymentMethodSpec, TestCase};
use serde::{Deserialize, Serialize};

/// JSON body for `POST /v3/quotes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub source_currency: String,
    pub target_currency: String,
    pub source_amount: f64,
    pub rate_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_pay_in: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_pay_out: Option<String>,
}

impl QuoteRequest {
    /// Build the request for one (case, method) combination.
    pub fn for_case(case: &TestCase, method: &PaymentMethodSpec, rate_type: &str) -> Self {
        QuoteRequest {
            source_currency: case.source_currency.clone(),
            target_currency: case.target_currency.clone(),
            source_amount: case.amount,
            rate_type: rate_type.to_string(),
            preferred_pay_in: method.pay_in.clone(),
            preferred_pay_out: method.pay_out.clone(),
        }
    }

    pub fn pair_key(&self) -> String {
        format!("{} to {}", self.source_currency, self.target_currency)
    }
}
