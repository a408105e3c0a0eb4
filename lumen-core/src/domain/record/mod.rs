// lumen-core/src/domain/record/mod.rs

pub mod coercion;
pub mod value;

pub use coercion::{coerce_number, is_missing, parse_date};
pub use value::Value;

use indexmap::{IndexMap, IndexSet};

/// One row of a table: column name -> value, in column order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    fields: IndexMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy for fixtures.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(column, value);
        self
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(column.into(), value.into());
    }

    /// `None` means the column is absent from this record, which is not the
    /// same as a present `Value::Null`.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields.get(column)
    }

    pub fn get_mut(&mut self, column: &str) -> Option<&mut Value> {
        self.fields.get_mut(column)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.fields.contains_key(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut Value> {
        self.fields.values_mut()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Immutable snapshot of one table.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    table: String,
    columns: Vec<String>,
    records: Vec<Record>,
}

impl Dataset {
    /// Column set as declared by the storage schema.
    pub fn new(table: impl Into<String>, columns: Vec<String>, records: Vec<Record>) -> Self {
        Self {
            table: table.into(),
            columns,
            records,
        }
    }

    /// Column set derived from the records themselves (union, first-seen order).
    pub fn from_records(table: impl Into<String>, records: Vec<Record>) -> Self {
        let mut seen: IndexSet<String> = IndexSet::new();
        for record in &records {
            for column in record.columns() {
                if !seen.contains(column) {
                    seen.insert(column.to_string());
                }
            }
        }
        Self::new(table, seen.into_iter().collect(), records)
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
