//! remit-eta Core Library
//!
//! Schema-agnostic delivery-time extraction for currency-transfer quotes:
//! - `locator`: keyword search over arbitrary JSON
//! - `extract`: ordered strategies that pick one delivery timestamp
//! - `normalize`: timestamp → comparable [`DeliveryEstimate`], with baseline fallback
//! - `analysis`: per-pair / per-amount comparison across a run
//! - `reporting`: persisted reports and the console narrative

pub mod analysis;
pub mod domain;
pub mod extract;
pub mod locator;
pub mod normalize;
pub mod obs;
pub mod reporting;
pub mod telemetry;
pub mod timestamp;

pub use analysis::{
    analyze, Analysis, AmountStats, BaselineComparison, ComparisonRow, PairSummary,
    DISCREPANCY_THRESHOLD_HOURS,
};
pub use domain::{
    BaselineEntry, BaselineTable, DeliveryEstimate, ExperimentOutcome, ExtractedField,
    OptionEstimate, PaymentMethodSpec, RemitError, Result, SourceKind, TestCase,
};
pub use extract::{
    extract_delivery, option_delivery, resolve_delivery, DeliveryCandidate, Strategy,
};
pub use locator::{locate_fields, locate_fields_with, LocatorLimits};
pub use normalize::{describe_hours, format_arrival, normalize, normalize_now};
pub use obs::{run_span, RunSpan};
pub use reporting::{
    load_full_report, render_console_report, simplify, write_full_report,
    write_simplified_report, RunReport, SimplifiedReport,
};
pub use telemetry::init_tracing;
pub use timestamp::{is_iso8601, parse_iso8601};

/// remit-eta version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
