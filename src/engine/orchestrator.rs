// src/engine/orchestrator.rs

//! IO shell around the build state machine.
//!
//! The orchestrator walks the discovered configs one at a time, asks
//! [`plan_config`] which commands each needs, runs them through a
//! [`CommandRunner`], verifies and copies artifacts, and keeps the status bar
//! text in step with the current phase.

use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::config::ProjectConfig;
use crate::console::Console;
use crate::exec::{BuildCommand, CommandRunner};
use crate::fs::FileSystem;
use crate::status::{StatusHandle, StatusSurface};
use crate::types::BuildConfig;

use super::artifacts::{
    clear_artifacts, copy_artifacts, verify_artifacts, ArtifactSet, Verification,
};
use super::core::{plan_config, BuildContext};
use super::outcome::{BuildOutcome, ConfigResult, RunSummary};

/// Coarse phase shown in the status bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Targeting,
    Building,
    Copying,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Targeting => "targeting",
            Phase::Building => "building",
            Phase::Copying => "copying",
        })
    }
}

/// Status bar text for a config and phase.
pub fn status_text(index: usize, total: usize, config: &BuildConfig, phase: Phase) -> String {
    format!(
        "{index}/{total} | {} ({}) | {phase}",
        config.name, config.target
    )
}

/// Directory and artifact layout used by the orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorSettings {
    pub build_dir: PathBuf,
    pub output_dir: PathBuf,
    pub cache_marker: String,
    pub artifacts: ArtifactSet,
}

impl OrchestratorSettings {
    pub fn from_project(cfg: &ProjectConfig) -> Self {
        Self {
            build_dir: cfg.build_dir().to_path_buf(),
            output_dir: cfg.output_dir().to_path_buf(),
            cache_marker: cfg.cache_marker().to_string(),
            artifacts: ArtifactSet::from_config(cfg.artifacts()),
        }
    }
}

pub struct Orchestrator<R: CommandRunner> {
    runner: R,
    fs: Arc<dyn FileSystem>,
    status: StatusHandle,
    console: Console,
    settings: OrchestratorSettings,
    ctx: BuildContext,
    outcomes: Vec<BuildOutcome>,
}

impl<R: CommandRunner> fmt::Debug for Orchestrator<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Orchestrator")
            .field("settings", &self.settings)
            .field("ctx", &self.ctx)
            .field("outcomes", &self.outcomes)
            .finish_non_exhaustive()
    }
}

impl<R: CommandRunner> Orchestrator<R> {
    /// Create an orchestrator, probing the build directory for prior state.
    pub fn new(
        runner: R,
        fs: Arc<dyn FileSystem>,
        status: StatusHandle,
        console: Console,
        settings: OrchestratorSettings,
    ) -> Self {
        let ctx = BuildContext::probe(fs.as_ref(), &settings.build_dir, &settings.cache_marker);
        Self::with_context(runner, fs, status, console, settings, ctx)
    }

    /// Create an orchestrator with an explicit starting context.
    pub fn with_context(
        runner: R,
        fs: Arc<dyn FileSystem>,
        status: StatusHandle,
        console: Console,
        settings: OrchestratorSettings,
        ctx: BuildContext,
    ) -> Self {
        Self {
            runner,
            fs,
            status,
            console,
            settings,
            ctx,
            outcomes: Vec::new(),
        }
    }

    pub fn outcomes(&self) -> &[BuildOutcome] {
        &self.outcomes
    }

    pub fn console_mut(&mut self) -> &mut Console {
        &mut self.console
    }

    /// Build every config in order and return the summary.
    ///
    /// Per-config failures never stop the run. Outcomes are recorded as they
    /// complete, so [`Self::summary`] is meaningful even if this future is
    /// dropped part-way (interruption).
    pub async fn run(&mut self, configs: &[BuildConfig]) -> RunSummary {
        let total = configs.len();
        info!(total, "starting build matrix");

        for (i, config) in configs.iter().enumerate() {
            let index = i + 1;
            let result = self.build_one(index, total, config).await;

            // Configuration history, independent of the build result.
            self.ctx.record_target(&config.target);

            if result.is_success() {
                self.console.success(&format!("SUCCESS: {}", config.name));
            } else {
                self.console.error(&format!("FAILED: {} ({result})", config.name));
            }
            info!(config = %config.name, outcome = %result, "config finished");
            self.outcomes.push(BuildOutcome::new(config.name.clone(), result));
        }

        self.summary(total, false)
    }

    /// Summary of everything recorded so far.
    pub fn summary(&self, total: usize, interrupted: bool) -> RunSummary {
        let output_dir = self
            .fs
            .canonicalize(&self.settings.output_dir)
            .unwrap_or_else(|_| self.settings.output_dir.clone());

        RunSummary {
            outcomes: self.outcomes.clone(),
            total,
            output_dir,
            interrupted,
        }
    }

    async fn build_one(
        &mut self,
        index: usize,
        total: usize,
        config: &BuildConfig,
    ) -> ConfigResult {
        let build_dir_label = self.settings.build_dir.display().to_string();
        self.console.config_banner(index, total, config, &build_dir_label);

        self.ctx.refresh(self.fs.as_ref(), &self.settings.cache_marker);
        let plan = plan_config(&self.ctx, config);
        debug!(config = %config.name, ctx = ?self.ctx, ?plan, "planned config");

        match &plan.configure {
            Some(command) => {
                self.set_phase(index, total, config, Phase::Targeting);
                self.console.info(match command {
                    BuildCommand::ConfigureFresh { .. } => {
                        "--> Configuring fresh build directory..."
                    }
                    _ => "--> Setting target...",
                });
                let exit_code = self.run_command(command).await;
                if exit_code != 0 {
                    return ConfigResult::ConfigureFailed { exit_code };
                }
            }
            None => {
                self.console.info(&format!(
                    "--> Target unchanged ({}); skipping set-target",
                    config.target
                ));
            }
        }

        let settings = &self.settings;
        let cleared = clear_artifacts(self.fs.as_ref(), &settings.build_dir, &settings.artifacts);
        if let Err(e) = cleared {
            let reason = format!("{e:#}");
            error!(
                config = %config.name,
                error = %reason,
                "could not clear previous artifacts"
            );
            return ConfigResult::ClearFailed(reason);
        }

        self.set_phase(index, total, config, Phase::Building);
        self.console.info("--> Building...");
        let exit_code = self.run_command(&plan.build).await;
        if exit_code != 0 {
            return ConfigResult::BuildFailed { exit_code };
        }

        let build_dir = &self.settings.build_dir;
        if let Verification::MissingArtifact(path) =
            verify_artifacts(self.fs.as_ref(), build_dir, &self.settings.artifacts)
        {
            warn!(
                config = %config.name,
                path = %path.display(),
                "build succeeded without producing artifact"
            );
            return ConfigResult::MissingArtifact(path);
        }

        self.set_phase(index, total, config, Phase::Copying);
        let dest_dir = self.settings.output_dir.join(config.output_dir_name());
        match copy_artifacts(self.fs.as_ref(), build_dir, &dest_dir, &self.settings.artifacts) {
            Ok(copied) => {
                for path in copied {
                    self.console.info(&format!("--> Copied {}", path.display()));
                }
                ConfigResult::Succeeded
            }
            Err(e) => {
                let reason = format!("{e:#}");
                error!(config = %config.name, error = %reason, "artifact copy failed");
                ConfigResult::CopyFailed(reason)
            }
        }
    }

    fn set_phase(&self, index: usize, total: usize, config: &BuildConfig, phase: Phase) {
        self.status.set_text(status_text(index, total, config, phase));
    }

    /// Run a command, mapping "could not run" to exit code -1.
    async fn run_command(&mut self, command: &BuildCommand) -> i32 {
        match self.runner.run(command).await {
            Ok(code) => code,
            Err(e) => {
                error!(
                    config = %command.config_name(),
                    kind = ?command.kind(),
                    error = %e,
                    "build tool could not be run"
                );
                self.console.error(&format!("Error: {e}"));
                -1
            }
        }
    }
}

/// Drive `work` until it completes or `interrupt` fires, then stop the
/// status surface.
///
/// Returns `None` when interrupted. Dropping `work` kills any running build
/// tool process. The surface is always stopped (ticker joined, scroll region
/// reset) before this returns.
pub async fn run_until_interrupted<F, I>(
    work: F,
    surface: &mut StatusSurface,
    interrupt: I,
) -> Option<F::Output>
where
    F: Future,
    I: Future<Output = ()>,
{
    let result = tokio::select! {
        output = work => Some(output),
        () = interrupt => {
            warn!("interrupt received; aborting build matrix");
            None
        }
    };

    surface.stop().await;
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_text_names_config_and_phase() {
        let cfg = BuildConfig::new("VESC Express T", "esp32c3", "hw.h");
        assert_eq!(
            status_text(2, 5, &cfg, Phase::Targeting),
            "2/5 | VESC Express T (esp32c3) | targeting"
        );
        assert_eq!(Phase::Copying.to_string(), "copying");
    }

    #[tokio::test]
    async fn interrupt_wins_over_pending_work() {
        let mut surface = StatusSurface::with_backend(Arc::new(crate::status::NoopTerminal));
        let out = run_until_interrupted(
            std::future::pending::<u8>(),
            &mut surface,
            std::future::ready(()),
        )
        .await;
        assert_eq!(out, None);
    }
}
