//! Cross-outcome comparison per currency pair and amount.
//!
//! Groups are kept in first-appearance order so the report follows fixture
//! order. Failed outcomes never count as a distinct delivery value.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::domain::{BaselineTable, ExperimentOutcome, UNKNOWN_ARRIVAL};

/// Differences above this many hours from the baseline are flagged.
pub const DISCREPANCY_THRESHOLD_HOURS: i64 = 5;

/// How a pair's observed average compares to its baseline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BaselineComparison {
    /// Within the threshold.
    Match {
        baseline_hours: i64,
        average_hours: i64,
    },

    /// Off by more than the threshold.
    Discrepancy {
        baseline_hours: i64,
        average_hours: i64,
        magnitude: i64,
    },

    /// Pair has no baseline entry.
    NoBaseline,

    /// Baseline exists but no outcome produced hours.
    NoData { baseline_hours: i64 },
}

impl BaselineComparison {
    fn evaluate(baseline_hours: Option<i64>, average_hours: Option<i64>) -> Self {
        match (baseline_hours, average_hours) {
            (None, _) => BaselineComparison::NoBaseline,
            (Some(baseline_hours), None) => BaselineComparison::NoData { baseline_hours },
            (Some(baseline_hours), Some(average_hours)) => {
                let magnitude = (average_hours - baseline_hours).abs();
                if magnitude > DISCREPANCY_THRESHOLD_HOURS {
                    BaselineComparison::Discrepancy {
                        baseline_hours,
                        average_hours,
                        magnitude,
                    }
                } else {
                    BaselineComparison::Match {
                        baseline_hours,
                        average_hours,
                    }
                }
            }
        }
    }
}

/// Statistics for one (pair, amount) group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AmountStats {
    pub amount: f64,
    pub average_hours: Option<i64>,
    pub sample_arrival_date: Option<String>,
    pub varies_by_method: bool,
    pub attempted: usize,
    pub successful: usize,
}

/// Summary for one currency pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PairSummary {
    pub pair: String,
    pub per_amount: Vec<AmountStats>,
    /// `false` when only one amount was tested.
    pub varies_by_amount: bool,
    pub amounts_tested: usize,
    pub baseline: BaselineComparison,
}

impl PairSummary {
    /// Magnitude of a flagged baseline discrepancy, in hours.
    pub fn baseline_discrepancy(&self) -> Option<i64> {
        match self.baseline {
            BaselineComparison::Discrepancy { magnitude, .. } => Some(magnitude),
            _ => None,
        }
    }
}

/// One row of the flat comparison table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComparisonRow {
    pub pair: String,
    pub amount: f64,
    pub average_hours: Option<i64>,
    pub sample_arrival_date: Option<String>,
    pub varies_by_method: bool,
}

/// Run-wide analysis.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Analysis {
    pub pairs: Vec<PairSummary>,
    pub comparison: Vec<ComparisonRow>,
    pub any_varies_by_method: bool,
    pub any_varies_by_amount: bool,
    /// Baseline table reprinted verbatim as ground truth.
    pub baseline: BaselineTable,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Analyze a complete outcome collection.
pub fn analyze(outcomes: &[ExperimentOutcome], baseline: &BaselineTable) -> Analysis {
    let by_pair = group_by(outcomes.iter(), |o| o.case.pair_key());

    let pairs: Vec<PairSummary> = by_pair
        .into_iter()
        .map(|(pair, group)| summarize_pair(pair, &group, baseline))
        .collect();

    let comparison = pairs
        .iter()
        .flat_map(|p| {
            p.per_amount.iter().map(move |a| ComparisonRow {
                pair: p.pair.clone(),
                amount: a.amount,
                average_hours: a.average_hours,
                sample_arrival_date: a.sample_arrival_date.clone(),
                varies_by_method: a.varies_by_method,
            })
        })
        .collect();

    let any_varies_by_method = pairs
        .iter()
        .any(|p| p.per_amount.iter().any(|a| a.varies_by_method));
    let any_varies_by_amount = pairs.iter().any(|p| p.varies_by_amount);

    Analysis {
        pairs,
        comparison,
        any_varies_by_method,
        any_varies_by_amount,
        baseline: baseline.clone(),
    }
}

/// `round(mean)` of the non-null hours, `None` if there are none.
pub fn average_hours<'a, I>(outcomes: I) -> Option<i64>
where
    I: IntoIterator<Item = &'a ExperimentOutcome>,
{
    let hours: Vec<i64> = outcomes.into_iter().filter_map(|o| o.hours()).collect();
    if hours.is_empty() {
        return None;
    }
    let mean = hours.iter().sum::<i64>() as f64 / hours.len() as f64;
    Some(mean.round() as i64)
}

/// Whether the successful outcomes disagree on the raw timestamp.
///
/// Only timestamps the API returned are compared; baseline fallbacks and
/// failures are ignored.
pub fn varies_by_method<'a, I>(outcomes: I) -> bool
where
    I: IntoIterator<Item = &'a ExperimentOutcome>,
{
    let distinct: BTreeSet<&str> = outcomes
        .into_iter()
        .filter(|o| o.succeeded())
        .filter_map(|o| o.raw_timestamp())
        .collect();
    distinct.len() > 1
}

// ---------------------------------------------------------------------------
// Internals
// ---------------------------------------------------------------------------

fn summarize_pair(
    pair: String,
    group: &[&ExperimentOutcome],
    baseline: &BaselineTable,
) -> PairSummary {
    let by_amount = group_by(group.iter().copied(), |o| o.case.amount);

    let per_amount: Vec<AmountStats> = by_amount
        .into_iter()
        .map(|(amount, outcomes)| AmountStats {
            amount,
            average_hours: average_hours(outcomes.iter().copied()),
            sample_arrival_date: outcomes
                .iter()
                .filter_map(|o| o.delivery_estimate.as_ref())
                .map(|e| e.arrival_date.clone())
                .find(|d| d != UNKNOWN_ARRIVAL),
            varies_by_method: varies_by_method(outcomes.iter().copied()),
            attempted: outcomes.len(),
            successful: outcomes.iter().filter(|o| o.succeeded()).count(),
        })
        .collect();

    let amounts_tested = per_amount.len();
    let distinct_averages: BTreeSet<i64> =
        per_amount.iter().filter_map(|a| a.average_hours).collect();
    let varies_by_amount = amounts_tested > 1 && distinct_averages.len() > 1;

    let pair_average = average_hours(group.iter().copied());
    let baseline_cmp =
        BaselineComparison::evaluate(baseline.get(&pair).map(|e| e.hours), pair_average);

    PairSummary {
        pair,
        per_amount,
        varies_by_amount,
        amounts_tested,
        baseline: baseline_cmp,
    }
}

/// Group items by key, preserving first-appearance order of keys.
fn group_by<'a, K, I, F>(items: I, key: F) -> Vec<(K, Vec<&'a ExperimentOutcome>)>
where
    K: PartialEq,
    I: Iterator<Item = &'a ExperimentOutcome>,
    F: Fn(&ExperimentOutcome) -> K,
{
    let mut groups: Vec<(K, Vec<&'a ExperimentOutcome>)> = Vec::new();
    for item in items {
        let k = key(item);
        match groups.iter_mut().find(|(existing, _)| *existing == k) {
            Some((_, members)) => members.push(item),
            None => groups.push((k, vec![item])),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DeliveryEstimate, SourceKind, TestCase};

    fn api_outcome(
        pair: (&str, &str),
        amount: f64,
        method: &str,
        ts: &str,
        hours: i64,
    ) -> ExperimentOutcome {
        ExperimentOutcome::success(
            TestCase::new(pair.0, pair.1, amount),
            method,
            DeliveryEstimate {
                raw_timestamp: Some(ts.to_string()),
                hours: Some(hours),
                arrival_date: format!("arrival {}", ts),
                display_text: String::new(),
                source_kind: SourceKind::ApiProvided,
            },
            vec![],
            vec![],
            1,
        )
    }

    fn failed(pair: (&str, &str), amount: f64, method: &str) -> ExperimentOutcome {
        ExperimentOutcome::failure(
            TestCase::new(pair.0, pair.1, amount),
            method,
            "HTTP 500".to_string(),
            None,
            1,
        )
    }

    fn fallback_outcome(pair: (&str, &str), amount: f64, method: &str) -> ExperimentOutcome {
        ExperimentOutcome::success(
            TestCase::new(pair.0, pair.1, amount),
            method,
            DeliveryEstimate {
                raw_timestamp: None,
                hours: Some(61),
                arrival_date: "baseline arrival".to_string(),
                display_text: String::new(),
                source_kind: SourceKind::BaselineFallback,
            },
            vec![],
            vec![],
            1,
        )
    }

    const GBP_EUR: (&str, &str) = ("GBP", "EUR");

    #[test]
    fn differing_timestamps_vary_by_method() {
        let outcomes = vec![
            api_outcome(GBP_EUR, 1000.0, "Default", "2099-01-01T00:00:00Z", 60),
            api_outcome(GBP_EUR, 1000.0, "Debit", "2099-01-01T02:00:00Z", 62),
        ];
        let analysis = analyze(&outcomes, &BaselineTable::empty());
        assert!(analysis.pairs[0].per_amount[0].varies_by_method);
        assert!(analysis.any_varies_by_method);
    }

    #[test]
    fn identical_timestamps_do_not_vary() {
        let outcomes = vec![
            api_outcome(GBP_EUR, 1000.0, "Default", "2099-01-01T00:00:00Z", 60),
            api_outcome(GBP_EUR, 1000.0, "Debit", "2099-01-01T00:00:00Z", 60),
        ];
        let analysis = analyze(&outcomes, &BaselineTable::empty());
        assert!(!analysis.pairs[0].per_amount[0].varies_by_method);
        assert!(!analysis.any_varies_by_method);
    }

    #[test]
    fn failures_are_not_a_distinct_value() {
        let outcomes = vec![
            api_outcome(GBP_EUR, 1000.0, "Default", "2099-01-01T00:00:00Z", 60),
            failed(GBP_EUR, 1000.0, "Debit"),
        ];
        let analysis = analyze(&outcomes, &BaselineTable::empty());
        let stats = &analysis.pairs[0].per_amount[0];
        assert!(!stats.varies_by_method);
        assert_eq!(stats.attempted, 2);
        assert_eq!(stats.successful, 1);
    }

    #[test]
    fn baseline_fallback_is_not_a_distinct_value() {
        let outcomes = vec![
            api_outcome(GBP_EUR, 1000.0, "Default", "2099-01-01T00:00:00Z", 60),
            fallback_outcome(GBP_EUR, 1000.0, "Debit"),
        ];
        assert!(!varies_by_method(&outcomes));

        let analysis = analyze(&outcomes, &BaselineTable::empty());
        assert!(!analysis.pairs[0].per_amount[0].varies_by_method);
        assert!(!analysis.any_varies_by_method);
        assert_eq!(analysis.pairs[0].per_amount[0].successful, 2);
    }

    #[test]
    fn average_is_rounded_mean_of_non_null_hours() {
        let outcomes = vec![
            api_outcome(GBP_EUR, 1000.0, "A", "2099-01-01T00:00:00Z", 60),
            api_outcome(GBP_EUR, 1000.0, "B", "2099-01-01T01:00:00Z", 61),
            failed(GBP_EUR, 1000.0, "C"),
        ];
        // mean 60.5 rounds up
        assert_eq!(average_hours(&outcomes), Some(61));
        assert_eq!(average_hours(&outcomes[2..]), None);
    }

    #[test]
    fn varies_by_amount_needs_two_distinct_averages() {
        let outcomes = vec![
            api_outcome(GBP_EUR, 1000.0, "Default", "2099-01-01T00:00:00Z", 60),
            api_outcome(GBP_EUR, 10000.0, "Default", "2099-01-02T00:00:00Z", 84),
        ];
        let analysis = analyze(&outcomes, &BaselineTable::empty());
        assert!(analysis.pairs[0].varies_by_amount);
        assert_eq!(analysis.pairs[0].amounts_tested, 2);
        assert!(analysis.any_varies_by_amount);
    }

    #[test]
    fn single_amount_does_not_vary_by_amount() {
        let outcomes = vec![api_outcome(
            GBP_EUR,
            1000.0,
            "Default",
            "2099-01-01T00:00:00Z",
            60,
        )];
        let analysis = analyze(&outcomes, &BaselineTable::empty());
        assert!(!analysis.pairs[0].varies_by_amount);
        assert_eq!(analysis.pairs[0].amounts_tested, 1);
    }

    #[test]
    fn discrepancy_flagged_above_threshold() {
        assert_eq!(
            BaselineComparison::evaluate(Some(67), Some(74)),
            BaselineComparison::Discrepancy {
                baseline_hours: 67,
                average_hours: 74,
                magnitude: 7
            }
        );
        assert_eq!(
            BaselineComparison::evaluate(Some(67), Some(70)),
            BaselineComparison::Match {
                baseline_hours: 67,
                average_hours: 70
            }
        );
        assert_eq!(
            BaselineComparison::evaluate(Some(67), Some(62)),
            BaselineComparison::Match {
                baseline_hours: 67,
                average_hours: 62
            }
        );
        assert_eq!(
            BaselineComparison::evaluate(None, Some(70)),
            BaselineComparison::NoBaseline
        );
        assert_eq!(
            BaselineComparison::evaluate(Some(67), None),
            BaselineComparison::NoData { baseline_hours: 67 }
        );
    }

    #[test]
    fn pair_discrepancy_against_reference_table() {
        let outcomes = vec![api_outcome(
            ("GBP", "USD"),
            1000.0,
            "Default",
            "2099-01-01T00:00:00Z",
            74,
        )];
        let analysis = analyze(&outcomes, &BaselineTable::reference());
        assert_eq!(analysis.pairs[0].baseline_discrepancy(), Some(7));
    }

    #[test]
    fn comparison_rows_follow_fixture_order() {
        let outcomes = vec![
            api_outcome(("USD", "EUR"), 500.0, "Default", "2099-01-01T00:00:00Z", 40),
            api_outcome(GBP_EUR, 1000.0, "Default", "2099-01-01T00:00:00Z", 60),
            api_outcome(("USD", "EUR"), 5000.0, "Default", "2099-01-01T00:00:00Z", 40),
        ];
        let analysis = analyze(&outcomes, &BaselineTable::empty());
        let rows: Vec<_> = analysis
            .comparison
            .iter()
            .map(|r| (r.pair.as_str(), r.amount))
            .collect();
        assert_eq!(
            rows,
            vec![("USD to EUR", 500.0), ("USD to EUR", 5000.0), ("GBP to EUR", 1000.0)]
        );
        assert_eq!(
            analysis.comparison[0].sample_arrival_date.as_deref(),
            Some("arrival 2099-01-01T00:00:00Z")
        );
    }

    #[test]
    fn baseline_is_reprinted() {
        let analysis = analyze(&[], &BaselineTable::reference());
        assert_eq!(analysis.baseline, BaselineTable::reference());
        assert!(analysis.pairs.is_empty());
        assert!(!analysis.any_varies_by_method);
        assert!(!analysis.any_varies_by_amount);
    }
}
