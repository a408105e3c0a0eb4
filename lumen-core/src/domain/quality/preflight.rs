// lumen-core/src/domain/quality/preflight.rs

use crate::domain::record::{Dataset, Record};

/// Why a rule cannot run its normal logic on a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructuralGap {
    EmptyDataset,
    MissingColumns(Vec<String>),
}

/// Result of checking a rule's preconditions once, before evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum Preflight<'a> {
    Ready(&'a [Record]),
    Gap(StructuralGap),
}

impl<'a> Preflight<'a> {
    /// Requires a non-empty dataset that declares every column in `required`.
    pub fn require(dataset: &'a Dataset, required: &[&str]) -> Self {
        if dataset.is_empty() {
            return Preflight::Gap(StructuralGap::EmptyDataset);
        }
        let missing: Vec<String> = required
            .iter()
            .filter(|column| !dataset.has_column(column))
            .map(|column| column.to_string())
            .collect();
        if missing.is_empty() {
            Preflight::Ready(dataset.records())
        } else {
            Preflight::Gap(StructuralGap::MissingColumns(missing))
        }
    }
}
