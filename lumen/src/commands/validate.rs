// lumen/src/commands/validate.rs
//
// USE CASE: Run the quality rules against the stored table.

use anyhow::Context;
use comfy_table::{Cell, CellAlignment, Color, ContentArrangement, Table};
use std::path::PathBuf;

use lumen_core::application::run_validations;
use lumen_core::domain::quality::{Finding, RunContext, Severity};
use lumen_core::infrastructure::adapters::csv::CsvReportSink;
use lumen_core::infrastructure::adapters::duckdb::DuckDBConnector;

use super::load_config;

pub async fn execute(
    project_dir: PathBuf,
    database: Option<PathBuf>,
    table: Option<String>,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    match validate(project_dir, database, table, output).await {
        Ok(false) => println!("\n✨ SUCCESS! No critical findings."),
        Ok(true) => {
            eprintln!("\n❌ FAILURE: critical findings present");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("\n💥 Validation failed: {:#}", e);
            std::process::exit(1);
        }
    }
    Ok(())
}

/// Returns whether a critical finding was produced.
async fn validate(
    project_dir: PathBuf,
    database: Option<PathBuf>,
    table: Option<String>,
    output: Option<PathBuf>,
) -> anyhow::Result<bool> {
    let config = load_config(&project_dir)?;

    let db_path = database.unwrap_or_else(|| config.resolve(&project_dir, &config.database));
    let report_path = output.unwrap_or_else(|| config.resolve(&project_dir, &config.report_path));
    let table = table.unwrap_or(config.table);

    println!("🧪 Validating '{}' (DuckDB 🦆 {})", table, db_path.display());

    let connector = DuckDBConnector::new(db_path.to_string_lossy().into_owned());
    let sink = CsvReportSink::new(&report_path);
    let ctx = RunContext::now();

    let run = run_validations(&connector, &sink, &table, &ctx)
        .await
        .with_context(|| format!("Failed to write report to {}", report_path.display()))?;

    print_findings(&run.findings);
    println!("📝 Report written to {}", report_path.display());
    Ok(run.critical_found)
}

fn severity_cell(severity: Severity) -> Cell {
    let color = match severity {
        Severity::Critical => Color::Red,
        Severity::Warning => Color::Yellow,
    };
    Cell::new(severity).fg(color)
}

fn print_findings(findings: &[Finding]) {
    if findings.is_empty() {
        println!("✅ All quality rules passed");
        return;
    }

    let mut table = Table::new();
    table
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["rule", "severity", "count", "sample_rows"]);
    for finding in findings {
        table.add_row(vec![
            Cell::new(&finding.rule),
            severity_cell(finding.severity),
            Cell::new(finding.count).set_alignment(CellAlignment::Right),
            Cell::new(&finding.sample_rows),
        ]);
    }
    println!("{table}");
}
