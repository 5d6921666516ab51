//! Report artifacts: the full run report, the simplified per-pair projection,
//! and the console narrative.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::analysis::{Analysis, BaselineComparison};
use crate::domain::{
    BaselineTable, DeliveryEstimate, ExperimentOutcome, RemitError, Result, SourceKind,
};

/// Schema version written into every full report.
pub const REPORT_SCHEMA_VERSION: &str = "1.0";

/// Fixed name of the simplified report, overwritten each run.
pub const SIMPLIFIED_REPORT_FILE: &str = "delivery-times-simplified.json";

/// Prefix of the timestamped full report.
pub const FULL_REPORT_PREFIX: &str = "delivery-times-";

/// Complete persisted record of one run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunReport {
    pub schema_version: String,
    pub run_id: Uuid,
    /// Digest of the fixture battery this run executed.
    pub battery_digest: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub total_outcomes: usize,
    pub failed_outcomes: usize,
    pub outcomes: Vec<ExperimentOutcome>,
    pub analysis: Analysis,
}

impl RunReport {
    pub fn new(
        run_id: Uuid,
        battery_digest: String,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        duration_ms: u64,
        outcomes: Vec<ExperimentOutcome>,
        analysis: Analysis,
    ) -> Self {
        let failed_outcomes = outcomes.iter().filter(|o| !o.succeeded()).count();
        Self {
            schema_version: REPORT_SCHEMA_VERSION.to_string(),
            run_id,
            battery_digest,
            started_at,
            finished_at,
            duration_ms,
            total_outcomes: outcomes.len(),
            failed_outcomes,
            outcomes,
            analysis,
        }
    }
}

/// Baseline figures carried into the simplified report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimplifiedBaseline {
    pub description: String,
    pub hours: i64,
}

/// One concrete observation for a pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimplifiedExample {
    pub amount: f64,
    pub method: String,
    pub raw_estimate: Option<String>,
    pub formatted_time: String,
    pub expected_arrival: String,
}

/// Per-pair projection in the simplified report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimplifiedPair {
    pub baseline: Option<SimplifiedBaseline>,
    pub examples: Vec<SimplifiedExample>,
}

/// Simplified report keyed by `"SRC to DST"`.
pub type SimplifiedReport = BTreeMap<String, SimplifiedPair>;

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

/// Build the simplified projection: baseline figures plus one example per
/// tested amount, preferring API-provided estimates.
pub fn simplify(outcomes: &[ExperimentOutcome], baseline: &BaselineTable) -> SimplifiedReport {
    let mut report = SimplifiedReport::new();

    for outcome in outcomes {
        let pair = outcome.case.pair_key();
        let entry = report.entry(pair.clone()).or_insert_with(|| SimplifiedPair {
            baseline: baseline.get(&pair).map(|b| SimplifiedBaseline {
                description: b.description.clone(),
                hours: b.hours,
            }),
            examples: Vec::new(),
        });

        let Some(estimate) = outcome.delivery_estimate.as_ref() else {
            continue;
        };

        let example = to_example(outcome, estimate);
        match entry
            .examples
            .iter_mut()
            .find(|e| e.amount == outcome.case.amount)
        {
            None => entry.examples.push(example),
            Some(existing) if existing.raw_estimate.is_none() && estimate.is_api_provided() => {
                *existing = example;
            }
            Some(_) => {}
        }
    }

    report
}

fn to_example(outcome: &ExperimentOutcome, estimate: &DeliveryEstimate) -> SimplifiedExample {
    SimplifiedExample {
        amount: outcome.case.amount,
        method: outcome.method.clone(),
        raw_estimate: estimate.raw_timestamp.clone(),
        formatted_time: estimate.display_text.clone(),
        expected_arrival: estimate.arrival_date.clone(),
    }
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

/// File name of the full report for a run finishing at `at`.
pub fn full_report_file_name(at: DateTime<Utc>) -> String {
    format!("{}{}.json", FULL_REPORT_PREFIX, at.format("%Y%m%dT%H%M%SZ"))
}

/// Write the full report as `delivery-times-<stamp>.json` in `dir`.
pub fn write_full_report(dir: &Path, report: &RunReport, at: DateTime<Utc>) -> Result<PathBuf> {
    let path = dir.join(full_report_file_name(at));
    write_json(&path, report)?;
    Ok(path)
}

/// Write (overwrite) the simplified report in `dir`.
pub fn write_simplified_report(dir: &Path, report: &SimplifiedReport) -> Result<PathBuf> {
    let path = dir.join(SIMPLIFIED_REPORT_FILE);
    write_json(&path, report)?;
    Ok(path)
}

/// Load a previously written full report.
pub fn load_full_report(path: &Path) -> Result<RunReport> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| RemitError::Report(format!("read {:?}: {}", path, e)))?;
    Ok(serde_json::from_str(&content)?)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|e| RemitError::Report(format!("create {:?}: {}", parent, e)))?;
        }
    }
    let content = serde_json::to_string_pretty(value)?;
    std::fs::write(path, content)
        .map_err(|e| RemitError::Report(format!("write {:?}: {}", path, e)))
}

// ---------------------------------------------------------------------------
// Console narrative
// ---------------------------------------------------------------------------

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

/// Render the human-readable run narrative.
pub fn render_console_report(analysis: &Analysis) -> String {
    let mut out = String::new();

    out.push_str("# Delivery Time Comparison\n\n");
    let _ = writeln!(
        out,
        "{:<12} {:>12} {:>10}  {:<28} {}",
        "Pair", "Amount", "Avg hours", "Sample arrival", "Varies by method"
    );
    for row in &analysis.comparison {
        let avg = row
            .average_hours
            .map(|h| h.to_string())
            .unwrap_or_else(|| "-".to_string());
        let arrival = row.sample_arrival_date.as_deref().unwrap_or("-");
        let _ = writeln!(
            out,
            "{:<12} {:>12.2} {:>10}  {:<28} {}",
            row.pair,
            row.amount,
            avg,
            arrival,
            yes_no(row.varies_by_method)
        );
    }

    out.push_str("\n## Findings\n");
    let _ = writeln!(
        out,
        "- delivery time varies by payment method: {}",
        yes_no(analysis.any_varies_by_method)
    );
    let _ = writeln!(
        out,
        "- delivery time varies by amount: {}",
        yes_no(analysis.any_varies_by_amount)
    );

    out.push_str("\n## Pairs\n");
    for pair in &analysis.pairs {
        let by_amount = if pair.amounts_tested > 1 {
            yes_no(pair.varies_by_amount)
        } else {
            "n/a (single amount)"
        };
        let baseline = match &pair.baseline {
            BaselineComparison::Match {
                baseline_hours,
                average_hours,
            } => format!("matches baseline ({}h vs {}h)", average_hours, baseline_hours),
            BaselineComparison::Discrepancy {
                baseline_hours,
                average_hours,
                magnitude,
            } => format!(
                "differs from baseline by {}h ({}h vs {}h)",
                magnitude, average_hours, baseline_hours
            ),
            BaselineComparison::NoBaseline => "no baseline".to_string(),
            BaselineComparison::NoData { baseline_hours } => {
                format!("no data to compare with baseline ({}h)", baseline_hours)
            }
        };
        let _ = writeln!(
            out,
            "- {}: varies by amount: {}; {}",
            pair.pair, by_amount, baseline
        );
    }

    out.push_str("\n## Baseline Delivery Times\n");
    for (pair, entry) in analysis.baseline.iter() {
        let _ = writeln!(
            out,
            "- {}: {} ({}h, e.g. {})",
            pair, entry.description, entry.hours, entry.sample_arrival_date
        );
    }
    out
}

/// Short label for an estimate's provenance.
pub fn source_label(kind: SourceKind) -> &'static str {
    match kind {
        SourceKind::ApiProvided => "api",
        SourceKind::BaselineFallback => "baseline",
        SourceKind::Unavailable => "unavailable",
    }
}
