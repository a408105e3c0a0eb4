// lumen-core/src/application/mod.rs

pub mod ingest;
pub mod validation;

// Facade: the CLI only needs these two entry points
pub use ingest::{IngestSummary, run_ingest};
pub use validation::{ValidationRun, run_validations};
