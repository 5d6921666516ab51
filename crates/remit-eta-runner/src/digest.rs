//! Battery identity.

use crate::battery::Battery;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Stable identity of a fixture battery.
///
/// Recorded with every run so saved reports can be matched to the exact
/// cases and methods that produced them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BatterySpec {
    /// SHA-256 over ordered cases then ordered methods.
    pub digest: String,

    pub cases: usize,

    pub methods: usize,
}

impl BatterySpec {
    pub fn new(battery: &Battery) -> Self {
        Self {
            digest: compute_battery_digest(battery),
            cases: battery.cases.len(),
            methods: battery.methods.len(),
        }
    }

    /// First 12 hex chars, for log lines.
    pub fn short(&self) -> &str {
        self.digest.get(..12).unwrap_or(&self.digest)
    }
}

/// Compute deterministic, order-sensitive digest of a battery.
fn compute_battery_digest(battery: &Battery) -> String {
    let mut hasher = Sha256::new();
    for case in &battery.cases {
        hasher.update(case.source_currency.as_bytes());
        hasher.update(b"\0");
        hasher.update(case.target_currency.as_bytes());
        hasher.update(b"\0");
        hasher.update(case.amount.to_bits().to_be_bytes());
        hasher.update(b"\n");
    }
    hasher.update(b"--\n");
    for method in &battery.methods {
        hasher.update(method.label.as_bytes());
        hasher.update(b"\0");
        hasher.update(method.pay_in.as_deref().unwrap_or("").as_bytes());
        hasher.update(b"\0");
        hasher.update(method.pay_out.as_deref().unwrap_or("").as_bytes());
        hasher.update(b"\n");
    }
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use remit_eta_core::{PaymentMethodSpec, TestCase};

    #[test]
    fn test_battery_spec_new() {
        let spec = BatterySpec::new(&Battery::default());
        assert_eq!(spec.digest.len(), 64);
        assert_eq!(spec.short().len(), 12);
        assert_eq!(spec.cases, 18);
        assert_eq!(spec.methods, 5);
    }

    #[test]
    fn test_battery_digest_deterministic() {
        assert_eq!(
            compute_battery_digest(&Battery::default()),
            compute_battery_digest(&Battery::default())
        );
    }

    #[test]
    fn test_battery_digest_order_sensitive() {
        let a = Battery::new(
            vec![TestCase::new("GBP", "EUR", 100.0), TestCase::new("GBP", "USD", 100.0)],
            vec![PaymentMethodSpec::default_method("Default")],
        );
        let b = Battery::new(
            vec![TestCase::new("GBP", "USD", 100.0), TestCase::new("GBP", "EUR", 100.0)],
            vec![PaymentMethodSpec::default_method("Default")],
        );
        assert_ne!(compute_battery_digest(&a), compute_battery_digest(&b));
    }

    #[test]
    fn test_battery_digest_sees_preferences() {
        let cases = vec![TestCase::new("GBP", "EUR", 100.0)];
        let a = Battery::new(
            cases.clone(),
            vec![PaymentMethodSpec::new("m", Some("DEBIT"), None)],
        );
        let b = Battery::new(cases, vec![PaymentMethodSpec::new("m", None, Some("DEBIT"))]);
        assert_ne!(compute_battery_digest(&a), compute_battery_digest(&b));
    }

    #[test]
    fn test_short_digest_never_splits_a_char() {
        let spec = BatterySpec {
            digest: "0123456789aé-tail".to_string(),
            cases: 0,
            methods: 0,
        };
        assert_eq!(spec.short(), "0123456789aé-tail");

        let spec = BatterySpec {
            digest: "abc".to_string(),
            cases: 0,
            methods: 0,
        };
        assert_eq!(spec.short(), "abc");
    }
}
