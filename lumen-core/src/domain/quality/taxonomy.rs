// lumen-core/src/domain/quality/taxonomy.rs

use tracing::debug;

use crate::domain::quality::{
    DEFAULT_SAMPLE_LIMIT, Preflight, QualityRule, RuleOutcome, RunContext, Severity,
    StructuralGap,
};
use crate::domain::record::{Dataset, is_missing};

const TAXONOMY_COLUMNS: [&str; 2] = ["source", "medium"];

/// Every row needs a usable `source` and `medium` for attribution.
#[derive(Debug, Clone, Copy, Default)]
pub struct MissingTaxonomy;

impl QualityRule for MissingTaxonomy {
    fn key(&self) -> &'static str {
        "missing_taxonomy"
    }

    fn severity(&self) -> Severity {
        Severity::Critical
    }

    fn evaluate<'a>(&self, dataset: &'a Dataset, _ctx: &RunContext) -> RuleOutcome<'a> {
        match Preflight::require(dataset, &TAXONOMY_COLUMNS) {
            Preflight::Gap(StructuralGap::EmptyDataset) => RuleOutcome::pass(),
            Preflight::Gap(StructuralGap::MissingColumns(missing)) => {
                // The table cannot be validated at all: every row is at fault.
                debug!(table = dataset.table(), ?missing, "taxonomy columns absent");
                RuleOutcome {
                    count: dataset.len(),
                    flagged: dataset.records().iter().take(DEFAULT_SAMPLE_LIMIT).collect(),
                }
            }
            Preflight::Ready(records) => RuleOutcome::flagged(
                records
                    .iter()
                    .filter(|record| {
                        TAXONOMY_COLUMNS
                            .iter()
                            .any(|column| is_missing(record.get(column)))
                    })
                    .collect(),
            ),
        }
    }
}
