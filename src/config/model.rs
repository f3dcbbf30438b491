// src/config/model.rs

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::cli::CliArgs;

/// Project configuration as read from a TOML file.
///
/// ```toml
/// [project]
/// hwconf_dir = "main/hwconf"
/// pattern = "**/hw_*.h"
/// build_dir = "build"
/// output_dir = "build_output"
/// tool = "idf.py"
/// cache_marker = "CMakeCache.txt"
///
/// [artifacts]
/// image = "vesc_express.bin"
/// bootloader = "bootloader/bootloader.bin"
/// partition_table = "partition_table/partition-table.bin"
/// ```
///
/// Every key is optional; a missing file is the same as an empty one.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawProjectConfig {
    #[serde(default)]
    pub project: ProjectSection,

    #[serde(default)]
    pub artifacts: ArtifactsSection,
}

/// `[project]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectSection {
    /// Directory scanned for hardware config headers.
    #[serde(default = "default_hwconf_dir")]
    pub hwconf_dir: PathBuf,

    /// Glob (relative to `hwconf_dir`) selecting candidate headers.
    #[serde(default = "default_pattern")]
    pub pattern: String,

    /// Build working directory passed to the tool with `-B`.
    #[serde(default = "default_build_dir")]
    pub build_dir: PathBuf,

    /// Root of the per-config artifact directories.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Build tool executable.
    #[serde(default = "default_tool")]
    pub tool: String,

    /// File inside `build_dir` whose presence means the directory has been
    /// configured before.
    #[serde(default = "default_cache_marker")]
    pub cache_marker: String,
}

fn default_hwconf_dir() -> PathBuf {
    PathBuf::from("main/hwconf")
}

fn default_pattern() -> String {
    "**/hw_*.h".to_string()
}

fn default_build_dir() -> PathBuf {
    PathBuf::from("build")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("build_output")
}

fn default_tool() -> String {
    "idf.py".to_string()
}

fn default_cache_marker() -> String {
    "CMakeCache.txt".to_string()
}

impl Default for ProjectSection {
    fn default() -> Self {
        Self {
            hwconf_dir: default_hwconf_dir(),
            pattern: default_pattern(),
            build_dir: default_build_dir(),
            output_dir: default_output_dir(),
            tool: default_tool(),
            cache_marker: default_cache_marker(),
        }
    }
}

/// `[artifacts]` section: source paths relative to the build directory.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArtifactsSection {
    #[serde(default = "default_image")]
    pub image: PathBuf,

    #[serde(default = "default_bootloader")]
    pub bootloader: PathBuf,

    #[serde(default = "default_partition_table")]
    pub partition_table: PathBuf,
}

fn default_image() -> PathBuf {
    PathBuf::from("vesc_express.bin")
}

fn default_bootloader() -> PathBuf {
    PathBuf::from("bootloader/bootloader.bin")
}

fn default_partition_table() -> PathBuf {
    PathBuf::from("partition_table/partition-table.bin")
}

impl Default for ArtifactsSection {
    fn default() -> Self {
        Self {
            image: default_image(),
            bootloader: default_bootloader(),
            partition_table: default_partition_table(),
        }
    }
}

impl RawProjectConfig {
    /// Apply CLI overrides on top of whatever the file provided.
    pub fn apply_overrides(&mut self, args: &CliArgs) {
        if let Some(root) = &args.root {
            self.project.hwconf_dir = root.clone();
        }
        if let Some(output) = &args.output {
            self.project.output_dir = output.clone();
        }
        if let Some(build_dir) = &args.build_dir {
            self.project.build_dir = build_dir.clone();
        }
        if let Some(tool) = &args.tool {
            self.project.tool = tool.clone();
        }
    }
}

/// Validated project configuration.
///
/// Only constructible via `TryFrom<RawProjectConfig>` (see `validate.rs`).
#[derive(Debug, Clone)]
pub struct ProjectConfig {
    project: ProjectSection,
    artifacts: ArtifactsSection,
}

impl ProjectConfig {
    pub(crate) fn new_unchecked(project: ProjectSection, artifacts: ArtifactsSection) -> Self {
        Self { project, artifacts }
    }

    pub fn hwconf_dir(&self) -> &Path {
        &self.project.hwconf_dir
    }

    pub fn pattern(&self) -> &str {
        &self.project.pattern
    }

    pub fn build_dir(&self) -> &Path {
        &self.project.build_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.project.output_dir
    }

    pub fn tool(&self) -> &str {
        &self.project.tool
    }

    pub fn cache_marker(&self) -> &str {
        &self.project.cache_marker
    }

    pub fn artifacts(&self) -> &ArtifactsSection {
        &self.artifacts
    }
}
