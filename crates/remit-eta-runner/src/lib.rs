//! remit-eta runner
//!
//! Drives a fixture battery against a [`QuoteSource`](remit_eta_client::QuoteSource):
//! - Gates the run on credential validation
//! - Quotes every case × method sequentially, under a per-call timeout
//! - Turns each response or failure into an `ExperimentOutcome`

pub mod battery;
pub mod digest;
pub mod error;
pub mod run;
pub mod runner;

// Re-export key types
pub use battery::{default_cases, default_methods, Battery, BuiltinMethod};
pub use digest::BatterySpec;
pub use error::{RunnerError, RunnerResult};
pub use run::{ExperimentRun, ExperimentRunner};
pub use runner::{CombinationRunner, RunConfig, DIAGNOSTIC_KEYWORDS};
