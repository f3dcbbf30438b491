#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use buildmatrix::console::Console;
use buildmatrix::engine::{ArtifactSet, Orchestrator, OrchestratorSettings};
use buildmatrix::exec::BuildCommand;
use buildmatrix::fs::mock::MockFileSystem;
use buildmatrix::status::StatusHandle;
use buildmatrix::types::BuildConfig;

pub use buildmatrix_test_utils::builders;
pub use buildmatrix_test_utils::fake_runner::FakeRunner;
pub use buildmatrix_test_utils::recording_terminal::{RecordingTerminal, TermEvent};
pub use buildmatrix_test_utils::{init_tracing, with_timeout, SharedBuffer};

pub const BUILD_DIR: &str = "build";
pub const OUTPUT_DIR: &str = "build_output";

pub fn settings() -> OrchestratorSettings {
    OrchestratorSettings {
        build_dir: PathBuf::from(BUILD_DIR),
        output_dir: PathBuf::from(OUTPUT_DIR),
        cache_marker: "CMakeCache.txt".to_string(),
        artifacts: ArtifactSet::default(),
    }
}

/// `[{A, esp32c3}, {B, esp32c3}, {C, esp32s3}]`
pub fn three_configs() -> Vec<BuildConfig> {
    vec![
        BuildConfig::new("A", "esp32c3", "main/hwconf/hw_a.h"),
        BuildConfig::new("B", "esp32c3", "main/hwconf/hw_b.h"),
        BuildConfig::new("C", "esp32s3", "main/hwconf/hw_c.h"),
    ]
}

/// Orchestrator over a mock filesystem with console output captured.
pub struct Harness {
    pub fs: MockFileSystem,
    pub executed: Arc<Mutex<Vec<BuildCommand>>>,
    pub console_out: SharedBuffer,
    pub orchestrator: Orchestrator<FakeRunner>,
}

impl Harness {
    pub fn new(fs: MockFileSystem, runner: FakeRunner, status: StatusHandle) -> Self {
        Self::with_settings(fs, runner, status, settings())
    }

    pub fn with_settings(
        fs: MockFileSystem,
        runner: FakeRunner,
        status: StatusHandle,
        settings: OrchestratorSettings,
    ) -> Self {
        let executed = runner.executed();
        let console_out = SharedBuffer::new();
        let console = Console::new(Box::new(console_out.clone()), false);
        let orchestrator =
            Orchestrator::new(runner, Arc::new(fs.clone()), status, console, settings);
        Self {
            fs,
            executed,
            console_out,
            orchestrator,
        }
    }

    pub fn commands(&self) -> Vec<BuildCommand> {
        self.executed.lock().unwrap().clone()
    }
}

/// Seed a previously configured build directory.
pub fn existing_build_dir(fs: &MockFileSystem, target: &str) {
    fs.add_file(
        Path::new(BUILD_DIR).join("CMakeCache.txt"),
        format!("IDF_TARGET:STRING={target}\n"),
    );
}

pub fn output_files(fs: &MockFileSystem, name: &str) -> Option<Vec<PathBuf>> {
    fs.list(Path::new(OUTPUT_DIR).join(name))
}

pub fn fresh(name: &str, target: &str) -> BuildCommand {
    BuildCommand::ConfigureFresh {
        name: name.to_string(),
        target: target.to_string(),
    }
}

pub fn retarget(name: &str, target: &str) -> BuildCommand {
    BuildCommand::Retarget {
        name: name.to_string(),
        target: target.to_string(),
    }
}

pub fn build(name: &str) -> BuildCommand {
    BuildCommand::Build {
        name: name.to_string(),
    }
}
