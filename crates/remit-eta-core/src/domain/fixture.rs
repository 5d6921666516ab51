//! Test-case and payment-method fixtures.

use serde::{Deserialize, Serialize};

use super::error::{RemitError, Result};

/// A single currency pair and amount to quote.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestCase {
    /// ISO 4217 source currency, e.g. `"GBP"`.
    pub source_currency: String,

    /// ISO 4217 target currency, e.g. `"EUR"`.
    pub target_currency: String,

    /// Amount in the source currency.
    pub amount: f64,
}

impl TestCase {
    /// Create a new test case.
    pub fn new(source_currency: &str, target_currency: &str, amount: f64) -> Self {
        Self {
            source_currency: source_currency.to_string(),
            target_currency: target_currency.to_string(),
            amount,
        }
    }

    /// Baseline lookup key, e.g. `"GBP to EUR"`.
    pub fn pair_key(&self) -> String {
        format!("{} to {}", self.source_currency, self.target_currency)
    }

    /// Reject fixtures that can never produce a quote.
    pub fn validate(&self) -> Result<()> {
        if self.source_currency.trim().is_empty() || self.target_currency.trim().is_empty() {
            return Err(RemitError::InvalidFixture(
                "currency codes must not be empty".to_string(),
            ));
        }
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(RemitError::InvalidFixture(format!(
                "{}: amount must be a positive number, got {}",
                self.pair_key(),
                self.amount
            )));
        }
        Ok(())
    }
}

/// A pay-in / pay-out preference pair.
///
/// `None` on either side means "no preference" and the field is omitted from
/// the quote request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentMethodSpec {
    /// Funding channel, e.g. `"BANK_TRANSFER"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pay_in: Option<String>,

    /// Disbursement channel, e.g. `"SWIFT"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pay_out: Option<String>,

    /// Human-readable label used in outcomes and reports.
    pub label: String,
}

impl PaymentMethodSpec {
    /// Method with no pay-in or pay-out preference.
    pub fn default_method(label: &str) -> Self {
        Self {
            pay_in: None,
            pay_out: None,
            label: label.to_string(),
        }
    }

    /// Method with explicit preferences.
    pub fn new(label: &str, pay_in: Option<&str>, pay_out: Option<&str>) -> Self {
        Self {
            pay_in: pay_in.map(str::to_string),
            pay_out: pay_out.map(str::to_string),
            label: label.to_string(),
        }
    }
}
