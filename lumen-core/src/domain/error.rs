// lumen-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error("Invalid project configuration: {0}")]
    #[diagnostic(
        code(lumen::domain::configuration),
        help("Check 'lumen.yaml' and the LUMEN_* environment variables.")
    )]
    InvalidConfiguration(String),

    #[error("Schema Error: {0}")]
    #[diagnostic(code(lumen::domain::schema))]
    SchemaError(String),
}
