// src/engine/core.rs

//! Pure per-config build state machine.
//!
//! Given the state of the build directory (fresh or previously configured,
//! and for which target), decide which build tool commands a config needs.
//! No IO happens here apart from the explicit probing helpers, which go
//! through [`FileSystem`].

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::exec::BuildCommand;
use crate::fs::FileSystem;
use crate::types::BuildConfig;

/// Cache entry holding the target a build directory was configured for.
const CACHE_TARGET_KEY: &str = "IDF_TARGET";

/// Mutable state threaded through the configs of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildContext {
    pub work_dir: PathBuf,
    /// True when the work directory holds no build tool state yet.
    pub is_fresh_cache: bool,
    /// Target the directory was last configured for. Tracks configuration
    /// history, not build success.
    pub previous_target: Option<String>,
}

impl BuildContext {
    pub fn new(
        work_dir: impl Into<PathBuf>,
        is_fresh_cache: bool,
        previous_target: Option<String>,
    ) -> Self {
        Self {
            work_dir: work_dir.into(),
            is_fresh_cache,
            previous_target,
        }
    }

    /// Inspect an existing work directory.
    ///
    /// Freshness is the absence of `cache_marker`; when the marker exists its
    /// `IDF_TARGET` entry seeds `previous_target`.
    pub fn probe(fs: &dyn FileSystem, work_dir: &Path, cache_marker: &str) -> Self {
        let marker = work_dir.join(cache_marker);
        if !fs.exists(&marker) {
            return Self::new(work_dir, true, None);
        }

        let previous_target = match fs.read_to_string(&marker) {
            Ok(contents) => cached_target(&contents),
            Err(e) => {
                debug!(marker = %marker.display(), error = %e, "unreadable build cache");
                None
            }
        };
        debug!(?previous_target, "found existing build directory");
        Self::new(work_dir, false, previous_target)
    }

    /// Re-check freshness before each config. A previous configure step may
    /// have created the cache, or a user may have deleted the directory.
    pub fn refresh(&mut self, fs: &dyn FileSystem, cache_marker: &str) {
        self.is_fresh_cache = !fs.exists(&self.work_dir.join(cache_marker));
    }

    /// Record the target of the config that was just processed.
    pub fn record_target(&mut self, target: &str) {
        self.previous_target = Some(target.to_string());
    }

    /// Whether building for `target` requires switching the directory over.
    /// An unknown previous target counts as a change.
    pub fn target_changed(&self, target: &str) -> bool {
        self.previous_target.as_deref() != Some(target)
    }
}

/// Commands for one config, in execution order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPlan {
    /// Configure or re-target step; `None` when the directory already
    /// targets the right chip.
    pub configure: Option<BuildCommand>,
    pub build: BuildCommand,
}

impl ConfigPlan {
    pub fn commands(&self) -> impl Iterator<Item = &BuildCommand> {
        self.configure.iter().chain(std::iter::once(&self.build))
    }
}

/// Decide the commands for `config`.
///
/// | fresh | target changed | configure step        |
/// |-------|----------------|-----------------------|
/// | yes   | any            | `ConfigureFresh`      |
/// | no    | yes            | `Retarget`            |
/// | no    | no             | none                  |
///
/// A fresh directory never gets `Retarget`: `set-target` would run a full
/// clean on an empty directory for nothing.
pub fn plan_config(ctx: &BuildContext, config: &BuildConfig) -> ConfigPlan {
    let configure = if ctx.is_fresh_cache {
        Some(BuildCommand::ConfigureFresh {
            name: config.name.clone(),
            target: config.target.clone(),
        })
    } else if ctx.target_changed(&config.target) {
        Some(BuildCommand::Retarget {
            name: config.name.clone(),
            target: config.target.clone(),
        })
    } else {
        None
    };

    ConfigPlan {
        configure,
        build: BuildCommand::Build {
            name: config.name.clone(),
        },
    }
}

/// Extract the `IDF_TARGET` value from CMake cache text
/// (`IDF_TARGET:STRING=esp32c3`).
pub fn cached_target(cache: &str) -> Option<String> {
    cache.lines().find_map(|line| {
        let (key, value) = line.trim().split_once('=')?;
        let name = key.split(':').next()?;
        (name == CACHE_TARGET_KEY && !value.is_empty()).then(|| value.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::CommandKind;
    use crate::fs::mock::MockFileSystem;

    fn cfg(name: &str, target: &str) -> BuildConfig {
        BuildConfig::new(name, target, format!("hw_{name}.h"))
    }

    fn kinds(plan: &ConfigPlan) -> Vec<CommandKind> {
        plan.commands().map(BuildCommand::kind).collect()
    }

    #[test]
    fn fresh_directory_configures_in_one_step() {
        let ctx = BuildContext::new("build", true, Some("esp32s3".into()));
        let plan = plan_config(&ctx, &cfg("A", "esp32c3"));
        assert_eq!(kinds(&plan), vec![CommandKind::ConfigureFresh, CommandKind::Build]);
    }

    #[test]
    fn existing_directory_with_same_target_builds_directly() {
        let ctx = BuildContext::new("build", false, Some("esp32c3".into()));
        let plan = plan_config(&ctx, &cfg("B", "esp32c3"));
        assert_eq!(kinds(&plan), vec![CommandKind::Build]);
    }

    #[test]
    fn existing_directory_with_other_target_is_retargeted() {
        let ctx = BuildContext::new("build", false, Some("esp32c3".into()));
        let plan = plan_config(&ctx, &cfg("C", "esp32s3"));
        assert_eq!(
            plan.configure,
            Some(BuildCommand::Retarget {
                name: "C".into(),
                target: "esp32s3".into()
            })
        );
        assert_eq!(kinds(&plan), vec![CommandKind::Retarget, CommandKind::Build]);
    }

    #[test]
    fn unknown_previous_target_is_retargeted() {
        let ctx = BuildContext::new("build", false, None);
        let plan = plan_config(&ctx, &cfg("A", "esp32c3"));
        assert_eq!(kinds(&plan), vec![CommandKind::Retarget, CommandKind::Build]);
    }

    #[test]
    fn cached_target_reads_cmake_entry() {
        let cache = "# comment\nCMAKE_BUILD_TYPE:STRING=\nIDF_TARGET:STRING=esp32c3\nIDF_TARGET_ARCH:STRING=riscv\n";
        assert_eq!(cached_target(cache).as_deref(), Some("esp32c3"));
        assert_eq!(cached_target("IDF_TARGET_ARCH:STRING=xtensa\n"), None);
    }

    #[test]
    fn probe_distinguishes_fresh_and_existing_directories() {
        let fs = MockFileSystem::new();
        let fresh = BuildContext::probe(&fs, Path::new("build"), "CMakeCache.txt");
        assert!(fresh.is_fresh_cache);
        assert_eq!(fresh.previous_target, None);

        fs.add_file("build/CMakeCache.txt", "IDF_TARGET:STRING=esp32s3\n");
        let existing = BuildContext::probe(&fs, Path::new("build"), "CMakeCache.txt");
        assert!(!existing.is_fresh_cache);
        assert_eq!(existing.previous_target.as_deref(), Some("esp32s3"));
    }

    #[test]
    fn refresh_tracks_cache_creation() {
        let fs = MockFileSystem::new();
        let mut ctx = BuildContext::probe(&fs, Path::new("build"), "CMakeCache.txt");
        fs.add_file("build/CMakeCache.txt", "");
        ctx.refresh(&fs, "CMakeCache.txt");
        assert!(!ctx.is_fresh_cache);
    }
}
