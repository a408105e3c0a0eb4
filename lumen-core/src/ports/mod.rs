// lumen-core/src/ports/mod.rs

pub mod report;
pub mod source;

pub use report::ReportSink;
pub use source::{RecordSource, TableStore};
