// src/lib.rs

pub mod cli;
pub mod config;
pub mod console;
pub mod discovery;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod status;
pub mod types;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::{resolve_project_config, ProjectConfig};
use crate::console::Console;
use crate::discovery::discover_configs;
use crate::engine::{
    plan_config, run_until_interrupted, BuildContext, Orchestrator, OrchestratorSettings,
    RunStatus,
};
use crate::errors::{BuildMatrixError, Result};
use crate::exec::{StreamingRunner, ToolInvocation};
use crate::fs::{FileSystem, RealFileSystem};
use crate::status::StatusSurface;
use crate::types::BuildConfig;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - project config loading
/// - hardware config discovery
/// - status surface + streaming runner
/// - the orchestrator loop
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<RunStatus> {
    let cfg = resolve_project_config(&args)?;
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let mut console = Console::stdout();

    if !fs.is_dir(cfg.hwconf_dir()) {
        return Err(BuildMatrixError::MissingRoot(cfg.hwconf_dir().to_path_buf()));
    }

    let configs = discover_configs(fs.as_ref(), cfg.hwconf_dir(), cfg.pattern())?;

    if args.dry_run {
        print_dry_run(&mut console, &cfg, &configs);
        return Ok(RunStatus::Succeeded);
    }

    if !fs.is_dir(cfg.output_dir()) {
        fs.create_dir_all(cfg.output_dir())?;
        console.info(&format!(
            "Created output directory: {}",
            cfg.output_dir().display()
        ));
    }

    if configs.is_empty() {
        console.warning(&format!(
            "No hardware configurations found in {}",
            cfg.hwconf_dir().display()
        ));
    } else {
        console.info(&format!("Found {} hardware configurations.", configs.len()));
    }
    info!(count = configs.len(), root = %cfg.hwconf_dir().display(), "discovered configs");

    let total = configs.len();
    let mut surface = StatusSurface::init();
    let status = surface.handle();

    let runner = StreamingRunner::new(cfg.tool(), project_dir(), cfg.build_dir(), status.clone());
    let mut orchestrator = Orchestrator::new(
        runner,
        Arc::clone(&fs),
        status,
        console,
        OrchestratorSettings::from_project(&cfg),
    );

    let finished =
        run_until_interrupted(orchestrator.run(&configs), &mut surface, wait_for_ctrl_c()).await;

    let summary = match finished {
        Some(summary) => summary,
        None => orchestrator.summary(total, true),
    };
    orchestrator.console_mut().summary(&summary);

    debug!(status = ?summary.status(), "run complete");
    Ok(summary.status())
}

/// Resolves on Ctrl-C. If the signal handler cannot be installed the future
/// never resolves, so the run continues uninterruptible.
async fn wait_for_ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}

/// The build tool runs from the directory buildmatrix was started in.
fn project_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Dry-run output: each config and the commands it would get, starting from
/// a fresh build directory.
fn print_dry_run(console: &mut Console, cfg: &ProjectConfig, configs: &[BuildConfig]) {
    console.plain("buildmatrix dry-run");
    console.plain(&format!("  root = {}", cfg.hwconf_dir().display()));
    console.plain(&format!("  build_dir = {}", cfg.build_dir().display()));
    console.plain(&format!("  output_dir = {}", cfg.output_dir().display()));
    console.plain("");
    console.plain(&format!("configs ({}):", configs.len()));

    let dir = project_dir();
    let mut ctx = BuildContext::new(cfg.build_dir(), true, None);
    for config in configs {
        console.plain(&format!("  - {config}"));
        console.plain(&format!("      file: {}", config.source_file.display()));
        console.plain(&format!(
            "      output: {}",
            output_path(cfg.output_dir(), config).display()
        ));

        let plan = plan_config(&ctx, config);
        for command in plan.commands() {
            let invocation =
                ToolInvocation::for_command(cfg.tool(), command, &dir, cfg.build_dir());
            console.plain(&format!("      {:?}: {invocation}", command.kind()));
        }

        // A configure step leaves a cache behind.
        ctx.is_fresh_cache = false;
        ctx.record_target(&config.target);
    }

    debug!("dry-run complete (no execution)");
}

fn output_path(output_dir: &Path, config: &BuildConfig) -> PathBuf {
    output_dir.join(config.output_dir_name())
}
