// src/discovery/scan.rs

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{Glob, GlobMatcher};
use tracing::warn;

use crate::fs::FileSystem;

/// Compile the candidate-file glob (matched against paths relative to the
/// discovery root, using `/` separators).
pub fn compile_pattern(pattern: &str) -> Result<GlobMatcher> {
    let glob = Glob::new(pattern).with_context(|| format!("invalid glob pattern: {pattern}"))?;
    Ok(glob.compile_matcher())
}

/// Collect all files under `root` whose relative path matches `matcher`.
///
/// Unreadable subdirectories are logged and skipped. The result is sorted by
/// path so discovery is deterministic regardless of directory order.
pub fn collect_matching_files(
    fs: &dyn FileSystem,
    root: &Path,
    matcher: &GlobMatcher,
) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut stack = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        let entries = match fs.read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if dir == root => return Err(e),
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "skipping unreadable directory");
                continue;
            }
        };

        for path in entries {
            if fs.is_dir(&path) {
                stack.push(path);
            } else if fs.is_file(&path) {
                if let Ok(rel) = path.strip_prefix(root) {
                    let rel_str = rel.to_string_lossy().replace('\\', "/");
                    if matcher.is_match(&rel_str) {
                        files.push(path);
                    }
                }
            }
        }
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;

    #[test]
    fn matches_nested_and_top_level_headers() {
        let fs = MockFileSystem::new();
        fs.add_file("hwconf/hw_a.h", "");
        fs.add_file("hwconf/boards/rev2/hw_b.h", "");
        fs.add_file("hwconf/boards/hw_b.c", "");
        fs.add_file("hwconf/other.h", "");

        let matcher = compile_pattern("**/hw_*.h").unwrap();
        let files = collect_matching_files(&fs, Path::new("hwconf"), &matcher).unwrap();

        assert_eq!(
            files,
            vec![
                PathBuf::from("hwconf/boards/rev2/hw_b.h"),
                PathBuf::from("hwconf/hw_a.h"),
            ]
        );
    }

    #[test]
    fn missing_root_is_an_error() {
        let fs = MockFileSystem::new();
        let matcher = compile_pattern("**/hw_*.h").unwrap();
        assert!(collect_matching_files(&fs, Path::new("nope"), &matcher).is_err());
    }
}
