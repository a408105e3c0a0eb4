// lumen-core/src/domain/quality/mod.rs

pub mod finding;
pub mod latency;
pub mod outlier;
pub mod preflight;
pub mod sample;
pub mod taxonomy;

pub use finding::{Finding, RunContext, Severity, has_critical};
pub use latency::DataLatency;
pub use outlier::ZScoreOutliers;
pub use preflight::{Preflight, StructuralGap};
pub use sample::{DEFAULT_SAMPLE_LIMIT, build_sample};
pub use taxonomy::MissingTaxonomy;

use crate::domain::record::{Dataset, Record};

/// What a rule found in one snapshot: how many records are at fault and which ones.
///
/// `count` is not always `flagged.len()`: structural failures report a single
/// offence with one or zero sample records.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RuleOutcome<'a> {
    pub count: usize,
    pub flagged: Vec<&'a Record>,
}

impl<'a> RuleOutcome<'a> {
    pub fn pass() -> Self {
        Self::default()
    }

    pub fn flagged(flagged: Vec<&'a Record>) -> Self {
        Self {
            count: flagged.len(),
            flagged,
        }
    }

    /// A single failure that is not countable per row.
    pub fn structural(sample: Option<&'a Record>) -> Self {
        Self {
            count: 1,
            flagged: sample.into_iter().collect(),
        }
    }

    pub fn is_pass(&self) -> bool {
        self.count == 0
    }
}

/// Shared evaluation contract of the quality rules.
///
/// Rules are stateless: the same snapshot and context always yield the same outcome.
pub trait QualityRule: Send + Sync {
    /// Stable key written to the report.
    fn key(&self) -> &'static str;

    fn severity(&self) -> Severity;

    fn evaluate<'a>(&self, dataset: &'a Dataset, ctx: &RunContext) -> RuleOutcome<'a>;

    /// Text reported instead of an empty sample.
    fn empty_sample_message(&self) -> &'static str {
        ""
    }

    /// Evaluates the rule and turns a failing outcome into a report row.
    fn check(&self, dataset: &Dataset, ctx: &RunContext) -> Option<Finding> {
        let outcome = self.evaluate(dataset, ctx);
        if outcome.is_pass() {
            return None;
        }
        let sample_rows = if outcome.flagged.is_empty() {
            self.empty_sample_message().to_string()
        } else {
            build_sample(outcome.flagged.iter().copied(), DEFAULT_SAMPLE_LIMIT)
        };
        Some(Finding::new(
            self.key(),
            self.severity(),
            outcome.count,
            sample_rows,
            ctx,
        ))
    }
}

/// The rule set in reporting order.
pub fn default_rules() -> Vec<Box<dyn QualityRule>> {
    vec![
        Box::new(MissingTaxonomy),
        Box::new(ZScoreOutliers::default()),
        Box::new(DataLatency::default()),
    ]
}

/// Runs every rule against one snapshot and keeps the failing ones, in rule order.
pub fn evaluate_all(
    rules: &[Box<dyn QualityRule>],
    dataset: &Dataset,
    ctx: &RunContext,
) -> Vec<Finding> {
    rules
        .iter()
        .filter_map(|rule| rule.check(dataset, ctx))
        .collect()
}
