// src/engine/mod.rs

//! Build orchestration.
//!
//! - [`core`] is the pure per-config state machine (fresh configure,
//!   re-target or plain build).
//! - [`artifacts`] verifies and copies the build outputs.
//! - [`orchestrator`] is the async shell running configs one at a time.
//! - [`outcome`] holds per-config results and the run summary.

pub mod artifacts;
pub mod core;
pub mod orchestrator;
pub mod outcome;

pub use artifacts::{
    clear_artifacts, copy_artifacts, verify_artifacts, ArtifactSet, ArtifactSpec, Verification,
};
pub use self::core::{cached_target, plan_config, BuildContext, ConfigPlan};
pub use orchestrator::{
    run_until_interrupted, status_text, Orchestrator, OrchestratorSettings, Phase,
};
pub use outcome::{BuildOutcome, ConfigResult, RunStatus, RunSummary};
