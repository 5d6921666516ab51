//! Fixture battery: the ordered test cases and payment methods a run covers.

use remit_eta_core::{PaymentMethodSpec, RemitError, TestCase};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Amounts quoted for every pair in the default battery.
pub const DEFAULT_AMOUNTS: [f64; 3] = [100.0, 1_000.0, 10_000.0];

/// Currency pairs in the default battery, in quoting order.
pub const DEFAULT_PAIRS: [(&str, &str); 6] = [
    ("GBP", "EUR"),
    ("GBP", "USD"),
    ("USD", "EUR"),
    ("USD", "GBP"),
    ("EUR", "GBP"),
    ("EUR", "USD"),
];

/// Builtin payment-method combinations.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BuiltinMethod {
    /// No pay-in or pay-out preference.
    Default,

    /// BANK_TRANSFER in, BANK_TRANSFER out
    BankToBank,

    /// DEBIT card in, BANK_TRANSFER out
    DebitToBank,

    /// CREDIT card in, BANK_TRANSFER out
    CreditToBank,

    /// BANK_TRANSFER in, SWIFT out
    BankToSwift,
}

impl BuiltinMethod {
    pub const ALL: [BuiltinMethod; 5] = [
        BuiltinMethod::Default,
        BuiltinMethod::BankToBank,
        BuiltinMethod::DebitToBank,
        BuiltinMethod::CreditToBank,
        BuiltinMethod::BankToSwift,
    ];

    /// Label recorded on each outcome.
    pub fn label(&self) -> &'static str {
        match self {
            BuiltinMethod::Default => "Default",
            BuiltinMethod::BankToBank => "Bank transfer to bank",
            BuiltinMethod::DebitToBank => "Debit card to bank",
            BuiltinMethod::CreditToBank => "Credit card to bank",
            BuiltinMethod::BankToSwift => "Bank transfer to SWIFT",
        }
    }

    /// (pay-in, pay-out) preferences sent with the quote.
    pub fn preferences(&self) -> (Option<&'static str>, Option<&'static str>) {
        match self {
            BuiltinMethod::Default => (None, None),
            BuiltinMethod::BankToBank => (Some("BANK_TRANSFER"), Some("BANK_TRANSFER")),
            BuiltinMethod::DebitToBank => (Some("DEBIT"), Some("BANK_TRANSFER")),
            BuiltinMethod::CreditToBank => (Some("CREDIT"), Some("BANK_TRANSFER")),
            BuiltinMethod::BankToSwift => (Some("BANK_TRANSFER"), Some("SWIFT")),
        }
    }

    pub fn spec(&self) -> PaymentMethodSpec {
        let (pay_in, pay_out) = self.preferences();
        PaymentMethodSpec::new(self.label(), pay_in, pay_out)
    }
}

/// Every default pair at every default amount, pair-major.
pub fn default_cases() -> Vec<TestCase> {
    DEFAULT_PAIRS
        .iter()
        .flat_map(|(src, dst)| {
            DEFAULT_AMOUNTS
                .iter()
                .map(move |amount| TestCase::new(src, dst, *amount))
        })
        .collect()
}

pub fn default_methods() -> Vec<PaymentMethodSpec> {
    BuiltinMethod::ALL.iter().map(BuiltinMethod::spec).collect()
}

/// Ordered cases and methods for one run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Battery {
    pub cases: Vec<TestCase>,
    pub methods: Vec<PaymentMethodSpec>,
}

impl Default for Battery {
    fn default() -> Self {
        Self {
            cases: default_cases(),
            methods: default_methods(),
        }
    }
}

impl Battery {
    pub fn new(cases: Vec<TestCase>, methods: Vec<PaymentMethodSpec>) -> Self {
        Self { cases, methods }
    }

    /// Replace the cases with a JSON array read from `path`.
    pub fn with_cases_file(mut self, path: &Path) -> remit_eta_core::Result<Self> {
        self.cases = read_json_array(path)?;
        Ok(self)
    }

    /// Replace the methods with a JSON array read from `path`.
    pub fn with_methods_file(mut self, path: &Path) -> remit_eta_core::Result<Self> {
        self.methods = read_json_array(path)?;
        Ok(self)
    }

    /// Number of quote requests a run will make.
    pub fn combinations(&self) -> usize {
        self.cases.len() * self.methods.len()
    }

    pub fn validate(&self) -> remit_eta_core::Result<()> {
        if self.cases.is_empty() || self.methods.is_empty() {
            return Err(RemitError::InvalidFixture(
                "battery needs at least one case and one method".to_string(),
            ));
        }
        for case in &self.cases {
            case.validate()?;
        }
        if let Some(m) = self.methods.iter().find(|m| m.label.trim().is_empty()) {
            return Err(RemitError::InvalidFixture(format!(
                "payment method {:?}/{:?} has an empty label",
                m.pay_in, m.pay_out
            )));
        }
        Ok(())
    }
}

fn read_json_array<T: DeserializeOwned>(path: &Path) -> remit_eta_core::Result<Vec<T>> {
    let raw = std::fs::read_to_string(path)?;
    serde_json::from_str(&raw).map_err(|e| {
        RemitError::InvalidFixture(format!("{}: {}", path.display(), e))
    })
}
