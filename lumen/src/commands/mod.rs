// lumen/src/commands/mod.rs

pub mod ingest;
pub mod validate;

use anyhow::Context;
use std::path::Path;

use lumen_core::domain::project::ProjectConfig;
use lumen_core::infrastructure::config::project::load_project_config;

/// Shared first step of every command: manifest + environment overrides.
pub(crate) fn load_config(project_dir: &Path) -> anyhow::Result<ProjectConfig> {
    println!("⚙️  Loading configuration...");
    let config = load_project_config(project_dir).with_context(|| {
        format!(
            "Failed to load project configuration from {:?}",
            project_dir
        )
    })?;
    println!("   Project: {}", config.name);
    Ok(config)
}
