// lumen-core/src/domain/quality/sample.rs

use std::collections::BTreeMap;

use crate::domain::record::{Record, Value};

pub const DEFAULT_SAMPLE_LIMIT: usize = 5;

/// Columns that identify a row for a human reviewer, in priority order.
const IDENTIFYING_COLUMNS: [&str; 4] = ["campaign_id", "ad_id", "ad_group_id", "id"];
const DATE_COLUMN: &str = "date";

/// Compact text summary of the first `limit` records:
/// `campaign_id=1|date=2024-01-01; campaign_id=2|date=2024-01-02`.
pub fn build_sample<'a, I>(records: I, limit: usize) -> String
where
    I: IntoIterator<Item = &'a Record>,
{
    records
        .into_iter()
        .take(limit)
        .map(describe_record)
        .collect::<Vec<_>>()
        .join("; ")
}

fn describe_record(record: &Record) -> String {
    let parts: Vec<String> = IDENTIFYING_COLUMNS
        .iter()
        .chain(std::iter::once(&DATE_COLUMN))
        .filter_map(|column| match record.get(column) {
            Some(value) if !value.is_null() => Some(format!("{}={}", column, value)),
            _ => None,
        })
        .collect();

    if parts.is_empty() {
        full_dump(record)
    } else {
        parts.join("|")
    }
}

/// Key-sorted JSON object of every column.
fn full_dump(record: &Record) -> String {
    let sorted: BTreeMap<&str, serde_json::Value> = record
        .iter()
        .map(|(column, value)| (column, Value::to_json(value)))
        .collect();
    serde_json::to_string(&sorted).unwrap_or_default()
}
