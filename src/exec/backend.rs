// src/exec/backend.rs

//! Pluggable command runner abstraction.
//!
//! The orchestrator talks to a `CommandRunner` instead of spawning processes
//! itself. Production code uses [`StreamingRunner`]; tests provide a fake
//! that records commands and scripts exit codes.

use std::future::Future;
use std::io::Write;
use std::path::PathBuf;
use std::pin::Pin;

use crate::errors::Result;
use crate::status::StatusHandle;

use super::commands::{BuildCommand, ToolInvocation};
use super::task_runner::run_streaming;

/// Trait abstracting how build tool commands are executed.
pub trait CommandRunner: Send {
    /// Run one command to completion and return its exit code.
    ///
    /// `Err` means the command could not be run at all (e.g. spawn failure).
    fn run<'a>(
        &'a mut self,
        command: &'a BuildCommand,
    ) -> Pin<Box<dyn Future<Output = Result<i32>> + Send + 'a>>;
}

/// Real runner: spawns the build tool and streams its output.
pub struct StreamingRunner {
    tool: String,
    project_dir: PathBuf,
    build_dir: PathBuf,
    status: StatusHandle,
    out: Box<dyn Write + Send>,
}

impl StreamingRunner {
    /// Runner writing tool output to stdout.
    pub fn new(
        tool: impl Into<String>,
        project_dir: impl Into<PathBuf>,
        build_dir: impl Into<PathBuf>,
        status: StatusHandle,
    ) -> Self {
        Self {
            tool: tool.into(),
            project_dir: project_dir.into(),
            build_dir: build_dir.into(),
            status,
            out: Box::new(std::io::stdout()),
        }
    }

    /// Redirect tool output (used by tests).
    pub fn with_output(mut self, out: Box<dyn Write + Send>) -> Self {
        self.out = out;
        self
    }

    pub fn invocation_for(&self, command: &BuildCommand) -> ToolInvocation {
        ToolInvocation::for_command(&self.tool, command, &self.project_dir, &self.build_dir)
    }
}

impl CommandRunner for StreamingRunner {
    fn run<'a>(
        &'a mut self,
        command: &'a BuildCommand,
    ) -> Pin<Box<dyn Future<Output = Result<i32>> + Send + 'a>> {
        let invocation = self.invocation_for(command);

        Box::pin(async move {
            let code = run_streaming(&invocation, &self.status, self.out.as_mut()).await?;
            Ok(code)
        })
    }
}
