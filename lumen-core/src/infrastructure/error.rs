// lumen-core/src/infrastructure/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DatabaseError {
    #[error("DuckDB Engine Error: {0}")]
    #[diagnostic(
        code(lumen::infra::database::duckdb),
        help("An error occurred inside the SQL engine. Has 'lumen ingest' been run?")
    )]
    DuckDB(#[from] duckdb::Error),
}

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- DATABASE (Abstracted) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Database(#[from] DatabaseError),

    // --- FILESYSTEM (IO) ---
    #[error("File System Error: {0}")]
    #[diagnostic(
        code(lumen::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),

    // Opening the database file is not an engine rejection of a query
    #[error("Cannot open database at {path}: {source}")]
    #[diagnostic(
        code(lumen::infra::connection),
        help("Check that the database path is writable and not locked by another process.")
    )]
    ConnectionFailed {
        path: String,
        #[source]
        source: duckdb::Error,
    },

    // --- CONFIG / YAML ---
    #[error("YAML Parsing Error in {path}: {source}")]
    #[diagnostic(
        code(lumen::infra::yaml),
        help("Check your YAML syntax (indentation, types).")
    )]
    YamlError {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    // --- CSV ---
    #[error("CSV Error: {0}")]
    #[diagnostic(code(lumen::infra::csv))]
    Csv(#[from] csv::Error),

    #[error("Input CSV not found at {0}")]
    #[diagnostic(
        code(lumen::infra::input_missing),
        help("Pass --input or set 'raw-input' in lumen.yaml.")
    )]
    InputNotFound(String),
}

// Shortcut for `?` on duckdb calls
impl From<duckdb::Error> for InfrastructureError {
    fn from(err: duckdb::Error) -> Self {
        InfrastructureError::Database(DatabaseError::DuckDB(err))
    }
}
