// src/discovery/mod.rs

//! Hardware config discovery.
//!
//! - [`scan`] walks the config directory and selects candidate headers.
//! - [`parse`] pulls the name/target declarations out of a header.
//!
//! [`discover_configs`] combines the two into the ordered build list.

pub mod parse;
pub mod scan;

use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, warn};

use crate::errors::{BuildMatrixError, Result};
use crate::fs::FileSystem;
use crate::types::BuildConfig;

pub use parse::{extract_declarations, HwDeclarations};
pub use scan::{collect_matching_files, compile_pattern};

/// Discover every valid hardware config under `root`.
///
/// - Files that fail to read are logged and skipped.
/// - Files lacking either declaration are skipped silently (debug log only).
/// - A name seen twice keeps the first file in path order.
///
/// The result is sorted by `(target, name)`.
pub fn discover_configs(
    fs: &dyn FileSystem,
    root: &Path,
    pattern: &str,
) -> Result<Vec<BuildConfig>> {
    if !fs.is_dir(root) {
        return Err(BuildMatrixError::MissingRoot(root.to_path_buf()));
    }

    let matcher = compile_pattern(pattern)?;
    let candidates = collect_matching_files(fs, root, &matcher)?;

    let mut seen = HashSet::new();
    let mut configs = Vec::with_capacity(candidates.len());

    for path in candidates {
        let contents = match fs.read_to_string(&path) {
            Ok(c) => c,
            Err(e) => {
                warn!(
                    file = %path.display(),
                    error = %e,
                    "error parsing hardware config; skipping"
                );
                continue;
            }
        };

        let Some(decl) = extract_declarations(&contents) else {
            debug!(file = %path.display(), "no HW_NAME/HW_TARGET pair; not a hardware config");
            continue;
        };

        if !seen.insert(decl.name.clone()) {
            warn!(
                file = %path.display(),
                name = %decl.name,
                "duplicate hardware config name; skipping"
            );
            continue;
        }

        configs.push(BuildConfig::new(decl.name, decl.target, path));
    }

    configs.sort();
    debug!(count = configs.len(), "hardware config discovery finished");
    Ok(configs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;

    fn header(name: &str, target: &str) -> String {
        format!("#define HW_NAME \"{name}\"\n#define HW_TARGET \"{target}\"\n")
    }

    #[test]
    fn discovers_sorted_configs() {
        let fs = MockFileSystem::new();
        fs.add_file("hw/hw_s3.h", header("DevKit S3", "esp32s3"));
        fs.add_file("hw/hw_c6.h", header("Devkit C6", "esp32c6"));
        fs.add_file("hw/hw_c3b.h", header("Beta", "esp32c3"));
        fs.add_file("hw/hw_c3a.h", header("Alpha", "esp32c3"));

        let configs = discover_configs(&fs, Path::new("hw"), "**/hw_*.h").unwrap();
        let pairs: Vec<_> = configs
            .iter()
            .map(|c| (c.target.as_str(), c.name.as_str()))
            .collect();

        assert_eq!(
            pairs,
            vec![
                ("esp32c3", "Alpha"),
                ("esp32c3", "Beta"),
                ("esp32c6", "Devkit C6"),
                ("esp32s3", "DevKit S3"),
            ]
        );
    }

    #[test]
    fn incomplete_and_unreadable_files_are_skipped() {
        let fs = MockFileSystem::new();
        fs.add_file("hw/hw_ok.h", header("Ok", "esp32"));
        fs.add_file("hw/hw_name_only.h", "#define HW_NAME \"NameOnly\"\n");
        fs.add_file("hw/hw_binary.h", vec![0xff, 0xfe, 0x00]);

        let configs = discover_configs(&fs, Path::new("hw"), "**/hw_*.h").unwrap();
        assert_eq!(configs.len(), 1);
        assert_eq!(configs[0].name, "Ok");
    }

    #[test]
    fn duplicate_names_keep_first_path() {
        let fs = MockFileSystem::new();
        fs.add_file("hw/hw_a.h", header("Same", "esp32c3"));
        fs.add_file("hw/hw_b.h", header("Same", "esp32s3"));

        let configs = discover_configs(&fs, Path::new("hw"), "**/hw_*.h").unwrap();
        assert_eq!(configs.len(), 1);
        assert_eq!(configs[0].target, "esp32c3");
    }

    #[test]
    fn missing_root_is_reported() {
        let fs = MockFileSystem::new();
        match discover_configs(&fs, Path::new("main/hwconf"), "**/hw_*.h") {
            Err(BuildMatrixError::MissingRoot(p)) => assert_eq!(p, Path::new("main/hwconf")),
            other => panic!("expected MissingRoot, got {other:?}"),
        }
    }
}
