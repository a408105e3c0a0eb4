// lumen-core/src/domain/quality/outlier.rs

use std::collections::BTreeSet;
use tracing::debug;

use crate::domain::quality::{QualityRule, RuleOutcome, RunContext, Severity};
use crate::domain::record::{Dataset, coerce_number};

/// Metrics screened for outliers, each independently.
pub const OUTLIER_METRICS: [&str; 5] = ["spend", "impressions", "clicks", "conversions", "revenue"];

pub const DEFAULT_ZSCORE_THRESHOLD: f64 = 3.0;

// Rounding slack: a value exactly on the threshold can compute as 2.9999999999999996
const ZSCORE_TOLERANCE: f64 = 1e-9;

/// Population statistics (divisor N) of one metric column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopulationStats {
    pub mean: f64,
    pub stddev: f64,
    pub count: usize,
}

impl PopulationStats {
    /// `None` with fewer than two values: no spread can be measured.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.len() < 2 {
            return None;
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        // Two-pass variance keeps exact results for well-behaved inputs
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        Some(Self {
            mean,
            stddev: variance.sqrt(),
            count: values.len(),
        })
    }

    /// `None` when every value is identical.
    pub fn z_score(&self, value: f64) -> Option<f64> {
        if self.stddev == 0.0 {
            return None;
        }
        Some((value - self.mean) / self.stddev)
    }
}

/// Flags rows whose value on any screened metric sits `threshold` or more
/// standard deviations away from that metric's mean.
///
/// The union over metrics is reported without saying which metric tripped.
#[derive(Debug, Clone, Copy)]
pub struct ZScoreOutliers {
    pub threshold: f64,
}

impl Default for ZScoreOutliers {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_ZSCORE_THRESHOLD,
        }
    }
}

impl ZScoreOutliers {
    /// Row indices flagged on a single metric, ascending.
    fn flag_metric(&self, dataset: &Dataset, metric: &str) -> Vec<usize> {
        let observed: Vec<(usize, f64)> = dataset
            .records()
            .iter()
            .enumerate()
            .filter_map(|(idx, record)| coerce_number(record.get(metric)).map(|v| (idx, v)))
            .collect();

        let values: Vec<f64> = observed.iter().map(|(_, v)| *v).collect();
        let Some(stats) = PopulationStats::from_values(&values) else {
            debug!(metric, observed = values.len(), "skipping metric: not enough values");
            return Vec::new();
        };
        if stats.stddev == 0.0 {
            debug!(metric, "skipping metric: no variance");
            return Vec::new();
        }

        observed
            .into_iter()
            .filter(|(_, value)| {
                stats
                    .z_score(*value)
                    .is_some_and(|z| z.abs() >= self.threshold - ZSCORE_TOLERANCE)
            })
            .map(|(idx, _)| idx)
            .collect()
    }
}

impl QualityRule for ZScoreOutliers {
    fn key(&self) -> &'static str {
        "zscore_outliers"
    }

    fn severity(&self) -> Severity {
        Severity::Warning
    }

    fn evaluate<'a>(&self, dataset: &'a Dataset, _ctx: &RunContext) -> RuleOutcome<'a> {
        let flagged: BTreeSet<usize> = OUTLIER_METRICS
            .iter()
            .flat_map(|metric| self.flag_metric(dataset, metric))
            .collect();

        let records = dataset.records();
        RuleOutcome::flagged(flagged.into_iter().map(|idx| &records[idx]).collect())
    }
}
