// lumen-core/src/domain/cleaning/mod.rs
//
// Turns a raw campaign export into the uniform table the quality rules read.

pub mod naming;
pub mod summary;

pub use naming::to_snake_case;
pub use summary::{TaxonomyCount, summarize_taxonomy};

use indexmap::IndexSet;
use std::collections::HashSet;
use tracing::{debug, warn};

use crate::domain::record::coercion::UNKNOWN_SENTINEL;
use crate::domain::record::{Dataset, Record, Value, parse_date};

const TAXONOMY_COLUMNS: [&str; 2] = ["medium", "source"];
const DATE_COLUMN: &str = "date";

/// A CSV export exactly as read: header cells and text rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Integer,
    Float,
    Text,
}

/// Runs every cleaning step in order:
/// snake_case headers, trim cells, infer column types, fill taxonomy,
/// parse dates, clip negatives, drop duplicates.
pub fn clean_table(table: &str, raw: RawTable) -> Dataset {
    if raw.headers.is_empty() {
        return Dataset::new(table, Vec::new(), Vec::new());
    }

    let columns: Vec<String> = raw.headers.iter().map(|h| to_snake_case(h)).collect();
    let width = columns.len();

    let cells: Vec<Vec<Option<String>>> = raw
        .rows
        .into_iter()
        .map(|row| {
            if row.len() > width {
                warn!(cells = row.len(), width, "row wider than header, extra cells ignored");
            }
            (0..width)
                .map(|i| row.get(i).and_then(|cell| trim_cell(cell)))
                .collect()
        })
        .collect();

    let kinds: Vec<ColumnKind> = (0..width)
        .map(|i| infer_kind(cells.iter().filter_map(|row| row[i].as_deref())))
        .collect();
    debug!(?columns, ?kinds, "column types inferred");

    let mut records: Vec<Record> = cells
        .into_iter()
        .map(|row| {
            columns
                .iter()
                .zip(row)
                .zip(&kinds)
                .map(|((column, cell), kind)| (column.clone(), typed_value(cell, *kind)))
                .collect()
        })
        .collect();

    for record in &mut records {
        fill_taxonomy(record);
        parse_date_column(record);
        clip_negative(record);
    }

    let records = drop_duplicates(records);
    let columns: IndexSet<String> = columns.into_iter().collect();
    Dataset::new(table, columns.into_iter().collect(), records)
}

fn trim_cell(cell: &str) -> Option<String> {
    let trimmed = cell.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn infer_kind<'a>(mut cells: impl Iterator<Item = &'a str> + Clone) -> ColumnKind {
    if cells.clone().all(|c| c.parse::<i64>().is_ok()) {
        ColumnKind::Integer
    } else if cells.all(|c| c.parse::<f64>().is_ok()) {
        ColumnKind::Float
    } else {
        ColumnKind::Text
    }
}

fn typed_value(cell: Option<String>, kind: ColumnKind) -> Value {
    let Some(cell) = cell else {
        return Value::Null;
    };
    match kind {
        ColumnKind::Integer => cell.parse().map(Value::Integer).unwrap_or(Value::Text(cell)),
        ColumnKind::Float => cell.parse().map(Value::Float).unwrap_or(Value::Text(cell)),
        ColumnKind::Text => Value::Text(cell),
    }
}

fn fill_taxonomy(record: &mut Record) {
    for column in TAXONOMY_COLUMNS {
        if let Some(value) = record.get_mut(column) {
            if value.is_null() {
                *value = Value::Text(UNKNOWN_SENTINEL.to_string());
            }
        }
    }
}

fn parse_date_column(record: &mut Record) {
    if let Some(value) = record.get_mut(DATE_COLUMN) {
        *value = parse_date(Some(&*value)).map(Value::Date).unwrap_or(Value::Null);
    }
}

fn clip_negative(record: &mut Record) {
    for value in record.values_mut() {
        match value {
            Value::Integer(i) if *i < 0 => *i = 0,
            Value::Float(f) if *f < 0.0 => *f = 0.0,
            _ => {}
        }
    }
}

/// Keeps the first occurrence of every fully identical row.
fn drop_duplicates(records: Vec<Record>) -> Vec<Record> {
    let mut seen: HashSet<String> = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|record| {
            let key: Vec<String> = record.iter().map(|(_, v)| format!("{:?}", v)).collect();
            seen.insert(key.join("\u{1f}"))
        })
        .collect()
}
