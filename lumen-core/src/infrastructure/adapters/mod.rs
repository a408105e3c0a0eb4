// lumen-core/src/infrastructure/adapters/mod.rs

pub mod csv;
pub mod duckdb;

pub use self::csv::{CsvReportSink, read_raw_table, write_dataset_csv};
pub use self::duckdb::DuckDBConnector;
