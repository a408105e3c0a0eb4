// lumen/src/commands/ingest.rs
//
// USE CASE: Clean the raw export and load it into DuckDB.

use comfy_table::{Cell, CellAlignment, Table};
use std::path::PathBuf;

use lumen_core::application::{IngestSummary, run_ingest};
use lumen_core::infrastructure::adapters::duckdb::DuckDBConnector;

use super::load_config;

pub async fn execute(
    project_dir: PathBuf,
    input: Option<PathBuf>,
    database: Option<PathBuf>,
    table: Option<String>,
    clean_output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let config = load_config(&project_dir)?;

    let input = input.unwrap_or_else(|| config.resolve(&project_dir, &config.raw_input));
    let db_path = database.unwrap_or_else(|| config.resolve(&project_dir, &config.database));
    let clean_output =
        clean_output.unwrap_or_else(|| config.resolve(&project_dir, &config.clean_output));
    let table = table.unwrap_or(config.table);

    println!("📥 Ingesting {}", input.display());
    println!("   Engine: DuckDB 🦆 ({})", db_path.display());

    let connector = DuckDBConnector::new(db_path.to_string_lossy().into_owned());

    match run_ingest(&input, &connector, &table, &clean_output).await {
        Ok(summary) => {
            print_summary(&summary);
            println!("🧹 Clean CSV written to {}", clean_output.display());
            if summary.table_written {
                println!("✨ Table '{}' replaced with {} rows", table, summary.cleaned_rows);
            } else {
                println!("⚠️  Export has no columns, table '{}' left untouched", table);
            }
        }
        Err(e) => {
            eprintln!("❌ Ingest failed: {}", e);
            std::process::exit(1);
        }
    }
    Ok(())
}

fn print_summary(summary: &IngestSummary) {
    println!("Raw rows: {}", summary.raw_rows);
    println!("Cleaned rows: {}", summary.cleaned_rows);

    let Some(taxonomy) = &summary.taxonomy else {
        println!("Missing 'source' or 'medium' columns; skipping taxonomy summary");
        return;
    };

    let mut table = Table::new();
    table.set_header(vec!["source", "medium", "rows"]);
    for count in taxonomy {
        table.add_row(vec![
            Cell::new(&count.source),
            Cell::new(&count.medium),
            Cell::new(count.rows).set_alignment(CellAlignment::Right),
        ]);
    }
    println!("{table}");
}
