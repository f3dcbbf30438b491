// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`commands`] maps the three build steps to build tool argument vectors.
//! - [`task_runner`] spawns a process and streams its merged output.
//! - [`backend`] provides the `CommandRunner` trait and the production
//!   `StreamingRunner`; tests replace it with a fake.

pub mod backend;
pub mod commands;
pub mod task_runner;

pub use backend::{CommandRunner, StreamingRunner};
pub use commands::{BuildCommand, CommandKind, ToolInvocation};
pub use task_runner::run_streaming;
