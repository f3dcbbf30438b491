// src/config/mod.rs

//! Project configuration for buildmatrix.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load an optional `Buildmatrix.toml` from disk (`loader.rs`).
//! - Validate paths, the discovery glob and artifact layout (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, resolve_project_config, DEFAULT_CONFIG_FILE};
pub use model::{ArtifactsSection, ProjectConfig, ProjectSection, RawProjectConfig};
