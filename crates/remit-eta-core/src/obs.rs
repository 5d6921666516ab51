//! Structured observability hooks for probe-run lifecycle events.
//!
//! This module provides:
//! - Run-scoped tracing spans via `run_span` and the `RunSpan` RAII guard
//! - Emission functions for key lifecycle events: run start, each quoted
//!   combination, run finish, report persistence failures
//!
//! Events are emitted at `info!` level; filter with `RUST_LOG`.

use tracing::{info, info_span, warn, Span};

/// Span that scopes every event of one run.
///
/// Async code attaches it with `Instrument::instrument`; sync code enters it
/// through [`RunSpan`].
pub fn run_span(run_id: &str) -> Span {
    info_span!("remit_eta.run", run_id = %run_id)
}

/// RAII guard that enters a run-scoped tracing span for the duration of a run.
///
/// # Example
///
/// ```ignore
/// let _span = RunSpan::enter("run-12345");
/// // All tracing calls are now associated with run_id = "run-12345"
/// ```
pub struct RunSpan {
    _span: tracing::span::EnteredSpan,
}

impl RunSpan {
    /// Create and enter a span tagged with the run_id.
    pub fn enter(run_id: &str) -> Self {
        Self {
            _span: run_span(run_id).entered(),
        }
    }
}

/// Emit event: run started with the size of its battery.
pub fn emit_run_started(run_id: &str, battery_digest: &str, combinations: usize) {
    info!(
        event = "run.started",
        run_id = %run_id,
        battery_digest = %battery_digest,
        combinations = combinations,
    );
}

/// Emit event: one combination quoted.
pub fn emit_combination_quoted(pair: &str, amount: f64, method: &str, success: bool) {
    info!(
        event = "run.combination_quoted",
        pair = %pair,
        amount = amount,
        method = %method,
        success = success,
    );
}

/// Emit event: run finished with duration and outcome counts.
pub fn emit_run_finished(run_id: &str, duration_ms: u64, total: usize, failed: usize) {
    info!(
        event = "run.finished",
        run_id = %run_id,
        duration_ms = duration_ms,
        total_outcomes = total,
        failed_outcomes = failed,
    );
}

/// Emit event: a report file could not be written (warning level).
pub fn emit_report_write_error(kind: &str, error: &dyn std::fmt::Display) {
    warn!(event = "report.write_error", kind = %kind, error = %error);
}
