use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use buildmatrix::engine::ArtifactSet;
use buildmatrix::errors::{BuildMatrixError, Result};
use buildmatrix::exec::{BuildCommand, CommandKind, CommandRunner};
use buildmatrix::fs::FileSystem;
use buildmatrix::fs::mock::MockFileSystem;

/// A fake build tool that:
/// - records every command it is asked to run
/// - on a successful configure/re-target writes the cache marker with the
///   target, like the real tool's CMake cache
/// - on a successful build writes all three artifacts into the build dir
/// - returns scripted exit codes, spawn errors or hangs per (kind, config).
#[derive(Debug, Clone)]
pub struct FakeRunner {
    fs: MockFileSystem,
    build_dir: PathBuf,
    cache_marker: String,
    artifacts: ArtifactSet,
    executed: Arc<Mutex<Vec<BuildCommand>>>,
    exit_codes: HashMap<(CommandKind, String), i32>,
    spawn_errors: HashSet<(CommandKind, String)>,
    hangs: HashSet<(CommandKind, String)>,
    skip_artifact: HashMap<String, PathBuf>,
}

impl FakeRunner {
    pub fn new(fs: MockFileSystem, build_dir: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            build_dir: build_dir.into(),
            cache_marker: "CMakeCache.txt".to_string(),
            artifacts: ArtifactSet::default(),
            executed: Arc::new(Mutex::new(Vec::new())),
            exit_codes: HashMap::new(),
            spawn_errors: HashSet::new(),
            hangs: HashSet::new(),
            skip_artifact: HashMap::new(),
        }
    }

    pub fn with_artifacts(mut self, artifacts: ArtifactSet) -> Self {
        self.artifacts = artifacts;
        self
    }

    /// Make `kind` for `config` exit with `code`.
    pub fn exit_with(mut self, kind: CommandKind, config: &str, code: i32) -> Self {
        self.exit_codes.insert((kind, config.to_string()), code);
        self
    }

    /// Make `kind` for `config` fail to start.
    pub fn fail_spawn(mut self, kind: CommandKind, config: &str) -> Self {
        self.spawn_errors.insert((kind, config.to_string()));
        self
    }

    /// Make `kind` for `config` never finish.
    pub fn hang_on(mut self, kind: CommandKind, config: &str) -> Self {
        self.hangs.insert((kind, config.to_string()));
        self
    }

    /// Let the build for `config` succeed without producing `source`
    /// (relative to the build dir).
    pub fn omit_artifact(mut self, config: &str, source: impl Into<PathBuf>) -> Self {
        self.skip_artifact.insert(config.to_string(), source.into());
        self
    }

    /// Shared log of executed commands; stays valid after the runner is moved.
    pub fn executed(&self) -> Arc<Mutex<Vec<BuildCommand>>> {
        Arc::clone(&self.executed)
    }

    fn key(command: &BuildCommand) -> (CommandKind, String) {
        (command.kind(), command.config_name().to_string())
    }

    fn apply_side_effects(&self, command: &BuildCommand) -> anyhow::Result<()> {
        match command {
            BuildCommand::ConfigureFresh { name, target }
            | BuildCommand::Retarget { name, target } => {
                let cache = format!("HW_NAME:UNINITIALIZED={name}\nIDF_TARGET:STRING={target}\n");
                self.fs.create_dir_all(&self.build_dir)?;
                self.fs
                    .write(&self.build_dir.join(&self.cache_marker), cache.as_bytes())?;
            }
            BuildCommand::Build { name } => {
                let skipped = self.skip_artifact.get(name);
                for spec in self.artifacts.iter() {
                    if skipped == Some(&spec.source) {
                        continue;
                    }
                    let path = self.build_dir.join(&spec.source);
                    self.fs.write(&path, format!("{name}:{}", spec.label).as_bytes())?;
                }
            }
        }
        Ok(())
    }
}

impl CommandRunner for FakeRunner {
    fn run<'a>(
        &'a mut self,
        command: &'a BuildCommand,
    ) -> Pin<Box<dyn Future<Output = Result<i32>> + Send + 'a>> {
        Box::pin(async move {
            self.executed.lock().unwrap().push(command.clone());
            let key = Self::key(command);

            if self.spawn_errors.contains(&key) {
                return Err(BuildMatrixError::Other(anyhow::anyhow!(
                    "spawning fake tool for {}",
                    key.1
                )));
            }
            if self.hangs.contains(&key) {
                std::future::pending::<()>().await;
            }

            let code = self.exit_codes.get(&key).copied().unwrap_or(0);
            if code == 0 {
                self.apply_side_effects(command)?;
            }
            Ok(code)
        })
    }
}
