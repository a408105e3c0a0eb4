// lumen-core/src/infrastructure/config/project.rs

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

use crate::domain::project::ProjectConfig;
use crate::error::LumenError;
use crate::infrastructure::error::InfrastructureError;

const CONFIG_CANDIDATES: [&str; 2] = ["lumen.yaml", "lumen.yml"];

/// Loads `lumen.yaml` from the project directory, then layers environment
/// overrides on top. A project without a manifest runs on defaults.
#[instrument(skip(project_dir))]
pub fn load_project_config(project_dir: &Path) -> Result<ProjectConfig, LumenError> {
    let mut config = match find_main_config(project_dir) {
        Some(config_path) => {
            info!(path = ?config_path, "Loading project manifest");
            let content = fs::read_to_string(&config_path).map_err(InfrastructureError::Io)?;
            parse_manifest(&config_path, &content)?
        }
        None => {
            debug!(dir = ?project_dir, "no manifest found, using defaults");
            ProjectConfig::default()
        }
    };

    // LUMEN_TABLE=campaigns_v2 lumen validate
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    config.check()?;
    Ok(config)
}

fn find_main_config(root: &Path) -> Option<PathBuf> {
    CONFIG_CANDIDATES
        .iter()
        .map(|name| root.join(name))
        .find(|p| p.exists())
}

fn parse_manifest(path: &Path, content: &str) -> Result<ProjectConfig, InfrastructureError> {
    // An empty file is a valid manifest
    if content.trim().is_empty() {
        return Ok(ProjectConfig::default());
    }
    serde_yaml::from_str(content).map_err(|source| InfrastructureError::YamlError {
        path: path.display().to_string(),
        source,
    })
}

/// Applies `LUMEN_DATABASE`, `LUMEN_TABLE` and `LUMEN_REPORT_PATH` when set and non-empty.
pub fn apply_env_overrides<F>(config: &mut ProjectConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let fields: [(&str, &mut String); 3] = [
        ("LUMEN_DATABASE", &mut config.database),
        ("LUMEN_TABLE", &mut config.table),
        ("LUMEN_REPORT_PATH", &mut config.report_path),
    ];
    for (key, field) in fields {
        if let Some(value) = lookup(key).filter(|v| !v.trim().is_empty()) {
            debug!(key, value = %value, "environment override");
            *field = value;
        }
    }
}
