// lumen-core/src/error.rs

use crate::domain::error::DomainError;
use crate::infrastructure::error::{DatabaseError, InfrastructureError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LumenError {
    // --- DOMAIN ERRORS (configuration, schema) ---
    #[error(transparent)]
    Domain(#[from] DomainError),

    // --- INFRASTRUCTURE ERRORS (DuckDB, IO, parsing) ---
    #[error(transparent)]
    Infrastructure(#[from] InfrastructureError),

    // --- GENERIC / APPLICATION ERRORS ---
    #[error("Internal Error: {0}")]
    InternalError(String),
}

impl LumenError {
    /// True when the storage engine itself rejected the request
    /// (missing table, catalog or SQL error).
    pub fn is_database_error(&self) -> bool {
        matches!(
            self,
            LumenError::Infrastructure(InfrastructureError::Database(_))
        )
    }
}

impl From<std::io::Error> for LumenError {
    fn from(err: std::io::Error) -> Self {
        LumenError::Infrastructure(InfrastructureError::Io(err))
    }
}

impl From<duckdb::Error> for LumenError {
    fn from(err: duckdb::Error) -> Self {
        LumenError::Infrastructure(InfrastructureError::Database(DatabaseError::DuckDB(err)))
    }
}
