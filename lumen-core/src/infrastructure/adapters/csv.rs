// lumen-core/src/infrastructure/adapters/csv.rs

use std::path::{Path, PathBuf};
use tracing::{info, instrument};

use crate::domain::cleaning::RawTable;
use crate::domain::quality::Finding;
use crate::domain::record::Dataset;
use crate::error::LumenError;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::atomic_write;
use crate::ports::report::ReportSink;

/// Reads a raw export. Short rows are accepted; the cleaning step pads them.
#[instrument]
pub fn read_raw_table(path: &Path) -> Result<RawTable, InfrastructureError> {
    if !path.exists() {
        return Err(InfrastructureError::InputNotFound(
            path.display().to_string(),
        ));
    }

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)?;

    let headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        rows.push(record?.iter().map(String::from).collect());
    }

    info!(columns = headers.len(), rows = rows.len(), "raw export loaded");
    Ok(RawTable { headers, rows })
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>, InfrastructureError> {
    writer
        .into_inner()
        .map_err(|e| InfrastructureError::Io(e.into_error()))
}

/// Writes the cleaned table as CSV, nulls as empty cells.
pub fn write_dataset_csv(path: &Path, dataset: &Dataset) -> Result<(), InfrastructureError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    if !dataset.columns().is_empty() {
        writer.write_record(dataset.columns())?;
        for record in dataset.records() {
            writer.write_record(dataset.columns().iter().map(|column| {
                record
                    .get(column)
                    .map(|value| value.to_string())
                    .unwrap_or_default()
            }))?;
        }
    }
    atomic_write(path, finish(writer)?)
}

/// Findings report as a flat CSV file: header plus one row per finding.
#[derive(Debug, Clone)]
pub struct CsvReportSink {
    path: PathBuf,
}

impl CsvReportSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn render(findings: &[Finding]) -> Result<Vec<u8>, InfrastructureError> {
        // Header written by hand: serde only emits it alongside a first row
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        writer.write_record(Finding::COLUMNS)?;
        for finding in findings {
            writer.serialize(finding)?;
        }
        finish(writer)
    }
}

impl ReportSink for CsvReportSink {
    fn write(&self, findings: &[Finding]) -> Result<(), LumenError> {
        let content = Self::render(findings)?;
        atomic_write(&self.path, content)?;
        info!(path = %self.path.display(), findings = findings.len(), "report written");
        Ok(())
    }
}
