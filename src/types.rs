// src/types.rs

use std::cmp::Ordering;
use std::fmt;
use std::path::PathBuf;

/// Canonical config name type used throughout the engine.
pub type ConfigName = String;

/// One hardware build configuration discovered from a header file.
///
/// Ordering is `(target, name)` so that configs for the same chip sit next to
/// each other and the build directory only has to be re-targeted when the
/// chip actually changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    pub name: ConfigName,
    pub target: String,
    pub source_file: PathBuf,
}

impl BuildConfig {
    pub fn new(
        name: impl Into<ConfigName>,
        target: impl Into<String>,
        source_file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            target: target.into(),
            source_file: source_file.into(),
        }
    }

    /// Directory name used for this config under the output root.
    ///
    /// Path separators and the `.`/`..` names would escape the output root,
    /// so they become `_`.
    pub fn output_dir_name(&self) -> String {
        if matches!(self.name.as_str(), "." | "..") {
            return "_".repeat(self.name.len());
        }
        self.name
            .chars()
            .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
            .collect()
    }
}

impl Ord for BuildConfig {
    fn cmp(&self, other: &Self) -> Ordering {
        (&self.target, &self.name, &self.source_file).cmp(&(
            &other.target,
            &other.name,
            &other.source_file,
        ))
    }
}

impl PartialOrd for BuildConfig {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for BuildConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orders_by_target_then_name() {
        let mut configs = vec![
            BuildConfig::new("B", "esp32s3", "b.h"),
            BuildConfig::new("C", "esp32c3", "c.h"),
            BuildConfig::new("A", "esp32s3", "a.h"),
        ];
        configs.sort();
        let order: Vec<_> = configs.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(order, vec!["C", "A", "B"]);
    }

    #[test]
    fn ordering_is_case_sensitive() {
        let mut configs = vec![
            BuildConfig::new("b", "esp32", "1.h"),
            BuildConfig::new("B", "esp32", "2.h"),
        ];
        configs.sort();
        assert_eq!(configs[0].name, "B");
    }

    #[test]
    fn output_dir_name_replaces_separators() {
        let cfg = BuildConfig::new("Rev 1/2", "esp32c3", "x.h");
        assert_eq!(cfg.output_dir_name(), "Rev 1_2");
    }

    #[test]
    fn output_dir_name_never_names_a_parent_or_self() {
        assert_eq!(BuildConfig::new("..", "esp32", "x.h").output_dir_name(), "__");
        assert_eq!(BuildConfig::new(".", "esp32", "x.h").output_dir_name(), "_");
        assert_eq!(BuildConfig::new("v1.2", "esp32", "x.h").output_dir_name(), "v1.2");
    }
}
