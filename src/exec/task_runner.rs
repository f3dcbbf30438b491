// src/exec/task_runner.rs

//! Streaming process runner.

use std::io::Write;
use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::status::StatusHandle;

use super::commands::ToolInvocation;

/// Lines buffered between the pipe readers and the writer.
const LINE_BUFFER: usize = 256;

/// Run a process with stdout and stderr merged into `out`, line by line.
///
/// After each forwarded line the status bar is redrawn so it stays pinned
/// below the fresh output. Returns the exit code (`-1` when the process was
/// terminated by a signal).
///
/// The child is killed if this future is dropped before completion, which is
/// how interruption reaches a running build.
pub async fn run_streaming(
    invocation: &ToolInvocation,
    status: &StatusHandle,
    out: &mut (dyn Write + Send),
) -> Result<i32> {
    info!(cmd = %invocation, cwd = %invocation.cwd.display(), "starting build tool");

    let mut cmd = invocation.to_command();
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd
        .spawn()
        .with_context(|| format!("spawning `{invocation}`"))?;

    let (line_tx, mut line_rx) = mpsc::channel::<String>(LINE_BUFFER);
    if let Some(stdout) = child.stdout.take() {
        tokio::spawn(forward_lines(stdout, line_tx.clone()));
    }
    if let Some(stderr) = child.stderr.take() {
        tokio::spawn(forward_lines(stderr, line_tx.clone()));
    }
    // The channel closes once both readers hit EOF.
    drop(line_tx);

    while let Some(line) = line_rx.recv().await {
        writeln!(out, "{line}").context("writing build tool output")?;
        status.redraw();
    }
    out.flush().context("flushing build tool output")?;

    let exit = child
        .wait()
        .await
        .with_context(|| format!("waiting for `{invocation}`"))?;

    let code = exit.code().unwrap_or(-1);
    info!(exit_code = code, success = exit.success(), "build tool exited");
    Ok(code)
}

/// Forward newline-separated output from a pipe. Invalid UTF-8 is replaced
/// rather than dropping the line.
async fn forward_lines<R>(reader: R, tx: mpsc::Sender<String>)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let mut segments = BufReader::new(reader).split(b'\n');
    loop {
        match segments.next_segment().await {
            Ok(Some(bytes)) => {
                let line = String::from_utf8_lossy(&bytes);
                let line = line.strip_suffix('\r').unwrap_or(&line).to_string();
                if tx.send(line).await.is_err() {
                    break;
                }
            }
            Ok(None) => break,
            Err(e) => {
                debug!(error = %e, "output pipe read failed");
                break;
            }
        }
    }
}
