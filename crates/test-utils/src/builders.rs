#![allow(dead_code)]

use std::path::{Path, PathBuf};

use buildmatrix::config::{ProjectConfig, RawProjectConfig};
use buildmatrix::fs::mock::MockFileSystem;

/// Header text declaring a hardware config.
pub fn hw_header(name: &str, target: &str) -> String {
    format!(
        "#ifndef HW_H_\n#define HW_H_\n\n#define HW_NAME \"{name}\"\n#define HW_TARGET \"{target}\"\n\n#endif\n"
    )
}

/// Add `hw_<stem>.h` declaring `name`/`target` under `root` in a mock fs.
pub fn add_hw_file(
    fs: &MockFileSystem,
    root: &Path,
    stem: &str,
    name: &str,
    target: &str,
) -> PathBuf {
    let path = root.join(format!("hw_{stem}.h"));
    fs.add_file(&path, hw_header(name, target));
    path
}

/// Builder for `ProjectConfig` to simplify test setup.
pub struct ProjectConfigBuilder {
    raw: RawProjectConfig,
}

impl ProjectConfigBuilder {
    pub fn new() -> Self {
        Self {
            raw: RawProjectConfig::default(),
        }
    }

    pub fn hwconf_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.raw.project.hwconf_dir = dir.into();
        self
    }

    pub fn pattern(mut self, pattern: &str) -> Self {
        self.raw.project.pattern = pattern.to_string();
        self
    }

    pub fn build_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.raw.project.build_dir = dir.into();
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.raw.project.output_dir = dir.into();
        self
    }

    pub fn tool(mut self, tool: &str) -> Self {
        self.raw.project.tool = tool.to_string();
        self
    }

    pub fn image(mut self, path: impl Into<PathBuf>) -> Self {
        self.raw.artifacts.image = path.into();
        self
    }

    pub fn build(self) -> ProjectConfig {
        ProjectConfig::try_from(self.raw).expect("Failed to build valid config from builder")
    }
}

impl Default for ProjectConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
