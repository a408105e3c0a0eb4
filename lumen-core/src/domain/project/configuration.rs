// lumen-core/src/domain/project/configuration.rs

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use validator::Validate;

use crate::domain::error::DomainError;

/// Where a project's inputs and outputs live. Rules themselves are fixed.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Validate)]
pub struct ProjectConfig {
    #[serde(default = "default_name")]
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,

    /// DuckDB file holding the cleaned table.
    #[serde(default = "default_database")]
    #[validate(length(min = 1, message = "database path must not be empty"))]
    pub database: String,

    #[serde(default = "default_table")]
    #[validate(length(min = 1, max = 128, message = "table name must be 1-128 characters"))]
    pub table: String,

    #[serde(rename = "raw-input", default = "default_raw_input")]
    pub raw_input: String,

    #[serde(rename = "clean-output", default = "default_clean_output")]
    pub clean_output: String,

    #[serde(rename = "report-path", default = "default_report_path")]
    #[validate(length(min = 1, message = "report path must not be empty"))]
    pub report_path: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            database: default_database(),
            table: default_table(),
            raw_input: default_raw_input(),
            clean_output: default_clean_output(),
            report_path: default_report_path(),
        }
    }
}

impl ProjectConfig {
    /// Runs the field checks and flattens them into one domain error.
    pub fn check(&self) -> Result<(), DomainError> {
        self.validate()
            .map_err(|e| DomainError::InvalidConfiguration(e.to_string()))
    }

    /// Relative paths are taken from the project directory.
    pub fn resolve(&self, project_dir: &Path, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            project_dir.join(path)
        }
    }
}

fn default_name() -> String {
    "lumen".to_string()
}
fn default_database() -> String {
    "data/marketing.duckdb".to_string()
}
fn default_table() -> String {
    "fact_campaigns".to_string()
}
fn default_raw_input() -> String {
    "data/sample_marketing_data.csv".to_string()
}
fn default_clean_output() -> String {
    "data/sample_marketing_data_clean.csv".to_string()
}
fn default_report_path() -> String {
    "data/validation_results.csv".to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: ProjectConfig =
            serde_yaml::from_str("name: acme\ntable: campaigns_daily\n").unwrap();
        assert_eq!(config.name, "acme");
        assert_eq!(config.table, "campaigns_daily");
        assert_eq!(config.database, "data/marketing.duckdb");
        assert_eq!(config.report_path, "data/validation_results.csv");
        assert!(config.check().is_ok());
    }

    #[test]
    fn test_kebab_case_keys() {
        let config: ProjectConfig =
            serde_yaml::from_str("report-path: out/findings.csv\nraw-input: in.csv\n").unwrap();
        assert_eq!(config.report_path, "out/findings.csv");
        assert_eq!(config.raw_input, "in.csv");
    }

    #[test]
    fn test_empty_table_is_rejected() {
        let config = ProjectConfig {
            table: String::new(),
            ..ProjectConfig::default()
        };
        let err = config.check().unwrap_err();
        assert!(matches!(err, DomainError::InvalidConfiguration(_)));
        assert!(err.to_string().contains("table"));
    }

    #[test]
    fn test_resolve_relative_and_absolute() {
        let config = ProjectConfig::default();
        let dir = Path::new("/srv/project");
        assert_eq!(
            config.resolve(dir, &config.database),
            PathBuf::from("/srv/project/data/marketing.duckdb")
        );
        assert_eq!(
            config.resolve(dir, "/tmp/x.csv"),
            PathBuf::from("/tmp/x.csv")
        );
    }
}
