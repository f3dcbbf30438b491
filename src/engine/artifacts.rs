// src/engine/artifacts.rs

//! Verification and collection of the three flashable build outputs.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::config::ArtifactsSection;
use crate::fs::FileSystem;

/// One required output: where the build tool writes it and the file name it
/// gets in the per-config output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSpec {
    pub label: &'static str,
    pub source: PathBuf,
    pub dest_name: String,
}

/// The primary image, bootloader and partition table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSet {
    pub image: ArtifactSpec,
    pub bootloader: ArtifactSpec,
    pub partition_table: ArtifactSpec,
}

impl ArtifactSet {
    pub fn from_config(section: &ArtifactsSection) -> Self {
        let image_name = section
            .image
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "app.bin".to_string());

        Self {
            image: ArtifactSpec {
                label: "bin",
                source: section.image.clone(),
                dest_name: image_name,
            },
            bootloader: ArtifactSpec {
                label: "bootloader",
                source: section.bootloader.clone(),
                dest_name: "bootloader.bin".to_string(),
            },
            partition_table: ArtifactSpec {
                label: "partition table",
                source: section.partition_table.clone(),
                dest_name: "partition_table.bin".to_string(),
            },
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ArtifactSpec> {
        [&self.image, &self.bootloader, &self.partition_table].into_iter()
    }
}

impl Default for ArtifactSet {
    fn default() -> Self {
        Self::from_config(&ArtifactsSection::default())
    }
}

/// Result of checking a build directory for its outputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    Complete,
    /// The first required file that was not found.
    MissingArtifact(PathBuf),
}

/// Check that every artifact exists as a file under `build_dir`.
pub fn verify_artifacts(fs: &dyn FileSystem, build_dir: &Path, set: &ArtifactSet) -> Verification {
    for spec in set.iter() {
        let path = build_dir.join(&spec.source);
        if !fs.is_file(&path) {
            debug!(artifact = spec.label, path = %path.display(), "artifact missing");
            return Verification::MissingArtifact(path);
        }
    }
    Verification::Complete
}

/// Remove any artifacts a previous build left in `build_dir`.
///
/// Every config builds in the same directory, so without this a build that
/// exits 0 but skips an output would pass verification with another config's
/// file.
pub fn clear_artifacts(fs: &dyn FileSystem, build_dir: &Path, set: &ArtifactSet) -> Result<()> {
    for spec in set.iter() {
        let path = build_dir.join(&spec.source);
        if fs.is_file(&path) {
            fs.remove_file(&path)
                .with_context(|| format!("clearing previous {} artifact", spec.label))?;
            debug!(artifact = spec.label, path = %path.display(), "cleared stale artifact");
        }
    }
    Ok(())
}

/// Copy every artifact into `dest_dir`, creating it first.
///
/// Returns the destination paths in copy order.
pub fn copy_artifacts(
    fs: &dyn FileSystem,
    build_dir: &Path,
    dest_dir: &Path,
    set: &ArtifactSet,
) -> Result<Vec<PathBuf>> {
    fs.create_dir_all(dest_dir)
        .with_context(|| format!("creating output directory {}", dest_dir.display()))?;

    let mut copied = Vec::with_capacity(3);
    for spec in set.iter() {
        let from = build_dir.join(&spec.source);
        let to = dest_dir.join(&spec.dest_name);
        fs.copy(&from, &to)
            .with_context(|| format!("copying {} artifact", spec.label))?;
        copied.push(to);
    }
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;

    fn populate(fs: &MockFileSystem, skip: Option<&str>) {
        for path in [
            "build/vesc_express.bin",
            "build/bootloader/bootloader.bin",
            "build/partition_table/partition-table.bin",
        ] {
            if Some(path) != skip {
                fs.add_file(path, path.as_bytes());
            }
        }
    }

    #[test]
    fn complete_build_verifies() {
        let fs = MockFileSystem::new();
        populate(&fs, None);
        let set = ArtifactSet::default();
        assert_eq!(verify_artifacts(&fs, Path::new("build"), &set), Verification::Complete);
    }

    #[test]
    fn missing_bootloader_is_reported_by_path() {
        let fs = MockFileSystem::new();
        populate(&fs, Some("build/bootloader/bootloader.bin"));
        let set = ArtifactSet::default();
        assert_eq!(
            verify_artifacts(&fs, Path::new("build"), &set),
            Verification::MissingArtifact(PathBuf::from("build/bootloader/bootloader.bin"))
        );
    }

    #[test]
    fn clearing_leaves_other_build_files_alone() {
        let fs = MockFileSystem::new();
        populate(&fs, Some("build/vesc_express.bin"));
        fs.add_file("build/CMakeCache.txt", "IDF_TARGET:STRING=esp32c3\n");
        let set = ArtifactSet::default();

        clear_artifacts(&fs, Path::new("build"), &set).unwrap();

        assert!(fs.exists(Path::new("build/CMakeCache.txt")));
        assert_eq!(
            verify_artifacts(&fs, Path::new("build"), &set),
            Verification::MissingArtifact(PathBuf::from("build/vesc_express.bin"))
        );
        assert!(!fs.exists(Path::new("build/bootloader/bootloader.bin")));
        assert!(!fs.exists(Path::new("build/partition_table/partition-table.bin")));
    }

    #[test]
    fn copy_uses_fixed_destination_names() {
        let fs = MockFileSystem::new();
        populate(&fs, None);
        let set = ArtifactSet::default();

        let copied =
            copy_artifacts(&fs, Path::new("build"), Path::new("out/Devkit C6"), &set).unwrap();

        assert_eq!(
            copied,
            vec![
                PathBuf::from("out/Devkit C6/vesc_express.bin"),
                PathBuf::from("out/Devkit C6/bootloader.bin"),
                PathBuf::from("out/Devkit C6/partition_table.bin"),
            ]
        );
        assert_eq!(
            fs.contents("out/Devkit C6/bootloader.bin").unwrap(),
            b"build/bootloader/bootloader.bin".to_vec()
        );
    }
}
