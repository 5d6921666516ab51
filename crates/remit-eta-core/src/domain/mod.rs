//! Domain models for remit-eta.
//!
//! Canonical definitions for the core entities:
//! - `TestCase` / `PaymentMethodSpec`: immutable fixtures driving a run
//! - `BaselineTable`: reference delivery times per currency pair
//! - `DeliveryEstimate`: normalized, comparable estimate
//! - `ExperimentOutcome`: one result per (case, method) combination

pub mod baseline;
pub mod error;
pub mod estimate;
pub mod fixture;
pub mod outcome;

// Re-export main types and errors
pub use baseline::{BaselineEntry, BaselineTable};
pub use error::{RemitError, Result};
pub use estimate::{DeliveryEstimate, SourceKind, UNKNOWN_ARRIVAL};
pub use fixture::{PaymentMethodSpec, TestCase};
pub use outcome::{ExperimentOutcome, ExtractedField, OptionEstimate};
