// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `buildmatrix`.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "buildmatrix",
    version,
    about = "Build firmware once per discovered hardware configuration.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the project config file (TOML).
    ///
    /// If omitted, `Buildmatrix.toml` is used when present, otherwise the
    /// built-in defaults apply.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory scanned for hardware config headers.
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Directory receiving one artifact subdirectory per config.
    #[arg(long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Build working directory handed to the build tool via `-B`.
    #[arg(long, value_name = "DIR")]
    pub build_dir: Option<PathBuf>,

    /// Build tool executable (e.g. `idf.py`).
    #[arg(long, value_name = "PROGRAM")]
    pub tool: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `BUILDMATRIX_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Discover configs and print the planned commands, but don't run anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
