// src/exec/commands.rs

//! The three build tool invocations and their argument vectors.

use std::fmt;
use std::path::{Path, PathBuf};

use tokio::process::Command;

use crate::types::ConfigName;

/// Which step of a config's build a command belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    /// Configure an empty build directory for a target in one go.
    ConfigureFresh,
    /// Switch an existing build directory to a new target (full clean).
    Retarget,
    /// Build with whatever configuration the directory holds.
    Build,
}

/// A build tool command for one config.
///
/// The hardware name is passed on every command so that the cached
/// `HW_NAME` always matches the config being built, even when two configs
/// share a target and the directory is reused without re-targeting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildCommand {
    ConfigureFresh { name: ConfigName, target: String },
    Retarget { name: ConfigName, target: String },
    Build { name: ConfigName },
}

impl BuildCommand {
    pub fn kind(&self) -> CommandKind {
        match self {
            BuildCommand::ConfigureFresh { .. } => CommandKind::ConfigureFresh,
            BuildCommand::Retarget { .. } => CommandKind::Retarget,
            BuildCommand::Build { .. } => CommandKind::Build,
        }
    }

    pub fn config_name(&self) -> &str {
        match self {
            BuildCommand::ConfigureFresh { name, .. }
            | BuildCommand::Retarget { name, .. }
            | BuildCommand::Build { name } => name,
        }
    }

    /// Arguments passed to the build tool (without the program itself).
    pub fn tool_args(&self, build_dir: &Path) -> Vec<String> {
        let mut args = vec![
            "-B".to_string(),
            build_dir.display().to_string(),
            format!("-DHW_NAME={}", self.config_name()),
        ];
        match self {
            BuildCommand::ConfigureFresh { target, .. } => {
                args.push(format!("-DIDF_TARGET={target}"));
                args.push("reconfigure".to_string());
            }
            BuildCommand::Retarget { target, .. } => {
                args.push("set-target".to_string());
                args.push(target.clone());
            }
            BuildCommand::Build { .. } => {
                args.push("build".to_string());
            }
        }
        args
    }
}

/// A fully resolved process invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl ToolInvocation {
    pub fn new(program: impl Into<String>, args: Vec<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args,
            cwd: cwd.into(),
        }
    }

    /// Resolve a [`BuildCommand`] against the tool and directories.
    pub fn for_command(
        tool: &str,
        command: &BuildCommand,
        project_dir: &Path,
        build_dir: &Path,
    ) -> Self {
        Self::new(tool, command.tool_args(build_dir), project_dir)
    }

    /// Build a `tokio` command. On Windows the tool goes through `cmd /C`
    /// so script launchers such as `idf.py` resolve via `PATHEXT`.
    pub fn to_command(&self) -> Command {
        let mut cmd = if cfg!(windows) {
            let mut c = Command::new("cmd");
            c.arg("/C").arg(&self.program).args(&self.args);
            c
        } else {
            let mut c = Command::new(&self.program);
            c.args(&self.args);
            c
        };
        cmd.current_dir(&self.cwd);
        cmd
    }
}

impl fmt::Display for ToolInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            if arg.contains(char::is_whitespace) {
                write!(f, " \"{arg}\"")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}
