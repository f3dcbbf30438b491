// src/config/validate.rs

use std::path::{Component, Path};

use globset::Glob;

use crate::config::model::{ProjectConfig, RawProjectConfig};
use crate::errors::{BuildMatrixError, Result};

impl TryFrom<RawProjectConfig> for ProjectConfig {
    type Error = crate::errors::BuildMatrixError;

    fn try_from(raw: RawProjectConfig) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ProjectConfig::new_unchecked(raw.project, raw.artifacts))
    }
}

fn validate_raw_config(cfg: &RawProjectConfig) -> Result<()> {
    validate_project_section(cfg)?;
    validate_artifacts(cfg)?;
    Ok(())
}

fn validate_project_section(cfg: &RawProjectConfig) -> Result<()> {
    let project = &cfg.project;

    if project.tool.trim().is_empty() {
        return Err(BuildMatrixError::ConfigError(
            "[project].tool must not be empty".to_string(),
        ));
    }

    if project.cache_marker.trim().is_empty() {
        return Err(BuildMatrixError::ConfigError(
            "[project].cache_marker must not be empty".to_string(),
        ));
    }

    Glob::new(&project.pattern).map_err(|e| {
        BuildMatrixError::ConfigError(format!(
            "[project].pattern is not a valid glob ({}): {e}",
            project.pattern
        ))
    })?;

    if project.output_dir == project.build_dir {
        return Err(BuildMatrixError::ConfigError(format!(
            "[project].output_dir and [project].build_dir must differ (both are {})",
            project.output_dir.display()
        )));
    }

    Ok(())
}

fn validate_artifacts(cfg: &RawProjectConfig) -> Result<()> {
    let artifacts = &cfg.artifacts;
    for (key, path) in [
        ("image", &artifacts.image),
        ("bootloader", &artifacts.bootloader),
        ("partition_table", &artifacts.partition_table),
    ] {
        ensure_relative_file(key, path)?;
    }
    Ok(())
}

fn ensure_relative_file(key: &str, path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(BuildMatrixError::ConfigError(format!(
            "[artifacts].{key} must not be empty"
        )));
    }
    let escapes = path
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        return Err(BuildMatrixError::ConfigError(format!(
            "[artifacts].{key} must be a path inside the build directory (got {})",
            path.display()
        )));
    }
    Ok(())
}
