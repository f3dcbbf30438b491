// src/config/loader.rs

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::cli::CliArgs;
use crate::config::model::{ProjectConfig, RawProjectConfig};
use crate::errors::{BuildMatrixError, Result};

/// Project file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "Buildmatrix.toml";

/// Load a project file from a given path and return the raw `RawProjectConfig`.
///
/// This only performs TOML deserialization; use [`load_and_validate`] to get
/// a checked [`ProjectConfig`].
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawProjectConfig> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawProjectConfig = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a project file from path and validate it.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ProjectConfig> {
    let raw_config = load_from_path(&path)?;
    ProjectConfig::try_from(raw_config)
}

/// Build the effective project configuration for a CLI invocation.
///
/// - `--config <PATH>` must exist.
/// - Without `--config`, `Buildmatrix.toml` is read if present; otherwise the
///   built-in defaults are used.
/// - CLI directory/tool flags override file values before validation.
pub fn resolve_project_config(args: &CliArgs) -> Result<ProjectConfig> {
    let mut raw = match &args.config {
        Some(path) => {
            if !path.is_file() {
                return Err(BuildMatrixError::ConfigError(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            load_from_path(path)?
        }
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_FILE);
            if default_path.is_file() {
                debug!(path = %default_path.display(), "using project config file");
                load_from_path(default_path)?
            } else {
                debug!("no project config file; using defaults");
                RawProjectConfig::default()
            }
        }
    };

    raw.apply_overrides(args);
    ProjectConfig::try_from(raw)
}
