// lumen-core/src/domain/cleaning/summary.rs

use serde::Serialize;
use std::collections::HashMap;

use crate::domain::record::{Dataset, Value};

/// Number of rows attributed to one `source` / `medium` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxonomyCount {
    pub source: String,
    pub medium: String,
    pub rows: usize,
}

fn label(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "<NA>".to_string(),
        Some(v) => v.to_string(),
    }
}

/// Row counts per taxonomy pair, largest first, then by source and medium.
/// `None` when the table has no `source` or no `medium` column.
pub fn summarize_taxonomy(dataset: &Dataset) -> Option<Vec<TaxonomyCount>> {
    if !dataset.has_column("source") || !dataset.has_column("medium") {
        return None;
    }

    let mut counts: HashMap<(String, String), usize> = HashMap::new();
    for record in dataset.records() {
        let key = (label(record.get("source")), label(record.get("medium")));
        *counts.entry(key).or_default() += 1;
    }

    let mut summary: Vec<TaxonomyCount> = counts
        .into_iter()
        .map(|((source, medium), rows)| TaxonomyCount {
            source,
            medium,
            rows,
        })
        .collect();
    summary.sort_by(|a, b| {
        b.rows
            .cmp(&a.rows)
            .then_with(|| a.source.cmp(&b.source))
            .then_with(|| a.medium.cmp(&b.medium))
    });
    Some(summary)
}
