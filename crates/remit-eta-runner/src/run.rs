//! Experiment orchestration: credential gate, then every combination in
//! fixture order.

use crate::battery::Battery;
use crate::digest::BatterySpec;
use crate::error::{RunnerError, RunnerResult};
use crate::runner::{CombinationRunner, RunConfig};
use chrono::{DateTime, Utc};
use remit_eta_client::QuoteSource;
use remit_eta_core::obs::{emit_combination_quoted, emit_run_finished, emit_run_started, run_span};
use remit_eta_core::{
    analyze, BaselineTable, ExperimentOutcome, PaymentMethodSpec, RunReport, TestCase,
};
use std::time::Instant;
use tracing::{error, info, Instrument};
use uuid::Uuid;

/// Result of a complete experiment run.
#[derive(Debug, Clone)]
pub struct ExperimentRun {
    pub run_id: Uuid,

    /// Digest of the battery that produced these outcomes.
    pub battery_digest: String,

    pub started_at: DateTime<Utc>,

    pub finished_at: DateTime<Utc>,

    /// Total duration in milliseconds.
    pub duration_ms: u64,

    /// One entry per (case, method), in fixture order.
    pub outcomes: Vec<ExperimentOutcome>,
}

impl ExperimentRun {
    pub fn succeeded_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.succeeded()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.succeeded()).count()
    }

    /// Analyze the outcomes and wrap everything as a persistable report.
    pub fn into_report(self, baseline: &BaselineTable) -> RunReport {
        let analysis = analyze(&self.outcomes, baseline);
        RunReport::new(
            self.run_id,
            self.battery_digest,
            self.started_at,
            self.finished_at,
            self.duration_ms,
            self.outcomes,
            analysis,
        )
    }
}

/// Experiment orchestrator.
pub struct ExperimentRunner;

impl ExperimentRunner {
    /// Gate a run on the source accepting our credentials. No retries.
    pub async fn validate(source: &dyn QuoteSource) -> RunnerResult<()> {
        match source.validate_credentials().await {
            Ok(()) => {
                info!("Credential validation passed");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Credential validation failed");
                Err(RunnerError::Credentials(e))
            }
        }
    }

    /// Quote every case against every method, strictly one at a time.
    ///
    /// Individual failures are recorded and the run continues, so the result
    /// always holds `cases.len() * methods.len()` outcomes.
    pub async fn run(
        source: &dyn QuoteSource,
        config: &RunConfig,
        cases: &[TestCase],
        methods: &[PaymentMethodSpec],
    ) -> ExperimentRun {
        let battery = Battery::new(cases.to_vec(), methods.to_vec());
        let spec = BatterySpec::new(&battery);
        let run_id = Uuid::new_v4();
        let span = run_span(&run_id.to_string());

        async move {
            let started_at = Utc::now();
            let start = Instant::now();
            emit_run_started(&run_id.to_string(), &spec.digest, battery.combinations());

            let mut outcomes = Vec::with_capacity(battery.combinations());
            for case in cases {
                for method in methods {
                    info!(
                        pair = %case.pair_key(),
                        amount = case.amount,
                        method = %method.label,
                        "Quoting"
                    );
                    let outcome = CombinationRunner::execute(source, config, case, method).await;
                    emit_combination_quoted(
                        &case.pair_key(),
                        case.amount,
                        &method.label,
                        outcome.succeeded(),
                    );
                    outcomes.push(outcome);
                }
            }

            let duration_ms = start.elapsed().as_millis() as u64;
            let run = ExperimentRun {
                run_id,
                battery_digest: spec.digest,
                started_at,
                finished_at: Utc::now(),
                duration_ms,
                outcomes,
            };
            emit_run_finished(
                &run_id.to_string(),
                duration_ms,
                run.outcomes.len(),
                run.failed_count(),
            );
            run
        }
        .instrument(span)
        .await
    }

    /// Validate credentials, then run the battery.
    pub async fn validate_and_run(
        source: &dyn QuoteSource,
        config: &RunConfig,
        battery: &Battery,
    ) -> RunnerResult<ExperimentRun> {
        battery.validate().map_err(RunnerError::Battery)?;
        Self::validate(source).await?;
        Ok(Self::run(source, config, &battery.cases, &battery.methods).await)
    }
}
