// lumen-core/src/application/ingest.rs

use std::path::Path;
use tracing::{info, instrument, warn};

use crate::domain::cleaning::{TaxonomyCount, clean_table, summarize_taxonomy};
use crate::error::LumenError;
use crate::infrastructure::adapters::csv::{read_raw_table, write_dataset_csv};
use crate::ports::source::TableStore;

#[derive(Debug, Clone, PartialEq)]
pub struct IngestSummary {
    pub raw_rows: usize,
    pub cleaned_rows: usize,
    /// `None` when the export has no `source` or no `medium` column.
    pub taxonomy: Option<Vec<TaxonomyCount>>,
    pub table_written: bool,
}

/// Raw export -> cleaned CSV -> storage table.
#[instrument(skip(store), fields(input = %input.display()))]
pub async fn run_ingest(
    input: &Path,
    store: &dyn TableStore,
    table: &str,
    clean_output: &Path,
) -> Result<IngestSummary, LumenError> {
    let raw = read_raw_table(input)?;
    let raw_rows = raw.row_count();

    let dataset = clean_table(table, raw);
    info!(raw_rows, cleaned_rows = dataset.len(), "export cleaned");

    write_dataset_csv(clean_output, &dataset)?;

    let table_written = if dataset.columns().is_empty() {
        warn!(table, "export has no columns, table left untouched");
        false
    } else {
        store.replace_table(table, &dataset).await?;
        true
    };

    Ok(IngestSummary {
        raw_rows,
        cleaned_rows: dataset.len(),
        taxonomy: summarize_taxonomy(&dataset),
        table_written,
    })
}
