// src/engine/outcome.rs

use std::fmt;
use std::path::PathBuf;

use crate::types::ConfigName;

/// How a single config ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigResult {
    Succeeded,
    /// The configure / re-target command exited non-zero (or could not run).
    ConfigureFailed { exit_code: i32 },
    /// The build command exited non-zero (or could not run).
    BuildFailed { exit_code: i32 },
    /// Outputs of the previous build could not be removed before building.
    ClearFailed(String),
    /// The build reported success but a required output file is absent.
    MissingArtifact(PathBuf),
    CopyFailed(String),
}

impl ConfigResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ConfigResult::Succeeded)
    }
}

impl fmt::Display for ConfigResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigResult::Succeeded => f.write_str("succeeded"),
            ConfigResult::ConfigureFailed { exit_code } => {
                write!(f, "configure step failed (exit code {exit_code})")
            }
            ConfigResult::BuildFailed { exit_code } => {
                write!(f, "build failed (exit code {exit_code})")
            }
            ConfigResult::ClearFailed(reason) => {
                write!(f, "clearing previous artifacts failed: {reason}")
            }
            ConfigResult::MissingArtifact(path) => {
                write!(f, "missing artifact {}", path.display())
            }
            ConfigResult::CopyFailed(reason) => write!(f, "copying artifacts failed: {reason}"),
        }
    }
}

/// Result of one config, in build order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutcome {
    pub config_name: ConfigName,
    pub result: ConfigResult,
}

impl BuildOutcome {
    pub fn new(config_name: impl Into<ConfigName>, result: ConfigResult) -> Self {
        Self {
            config_name: config_name.into(),
            result,
        }
    }

    pub fn success(&self) -> bool {
        self.result.is_success()
    }
}

/// Overall result of a run; decides the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Succeeded,
    Failed,
    Interrupted,
}

impl RunStatus {
    pub fn exit_code(self) -> i32 {
        match self {
            RunStatus::Succeeded => 0,
            RunStatus::Failed | RunStatus::Interrupted => 1,
        }
    }
}

/// Aggregate over all attempted configs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub outcomes: Vec<BuildOutcome>,
    /// Number of configs discovered for this run.
    pub total: usize,
    /// Output root, absolute when it could be resolved.
    pub output_dir: PathBuf,
    pub interrupted: bool,
}

impl RunSummary {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.success()).count()
    }

    pub fn failed_names(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| !o.success())
            .map(|o| o.config_name.as_str())
            .collect()
    }

    pub fn status(&self) -> RunStatus {
        if self.interrupted {
            RunStatus::Interrupted
        } else if self.outcomes.iter().all(BuildOutcome::success) {
            RunStatus::Succeeded
        } else {
            RunStatus::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(results: Vec<(&str, ConfigResult)>, interrupted: bool) -> RunSummary {
        let total = results.len();
        RunSummary {
            outcomes: results
                .into_iter()
                .map(|(n, r)| BuildOutcome::new(n, r))
                .collect(),
            total,
            output_dir: PathBuf::from("/out"),
            interrupted,
        }
    }

    #[test]
    fn all_succeeded_exits_zero() {
        let s = summary(vec![("A", ConfigResult::Succeeded)], false);
        assert_eq!(s.status(), RunStatus::Succeeded);
        assert_eq!(s.status().exit_code(), 0);
    }

    #[test]
    fn any_failure_exits_one_and_lists_names() {
        let s = summary(
            vec![
                ("A", ConfigResult::Succeeded),
                ("B", ConfigResult::BuildFailed { exit_code: 2 }),
                ("C", ConfigResult::MissingArtifact(PathBuf::from("build/x.bin"))),
            ],
            false,
        );
        assert_eq!(s.status(), RunStatus::Failed);
        assert_eq!(s.succeeded(), 1);
        assert_eq!(s.failed_names(), vec!["B", "C"]);
        assert_eq!(s.status().exit_code(), 1);
    }

    #[test]
    fn interruption_is_distinct_from_failure() {
        let s = summary(vec![("A", ConfigResult::Succeeded)], true);
        assert_eq!(s.status(), RunStatus::Interrupted);
        assert_ne!(s.status(), RunStatus::Failed);
    }

    #[test]
    fn configure_failure_wording_fits_fresh_and_retarget() {
        let text = ConfigResult::ConfigureFailed { exit_code: 2 }.to_string();
        assert_eq!(text, "configure step failed (exit code 2)");
    }

    #[test]
    fn empty_run_succeeds() {
        assert_eq!(summary(vec![], false).status(), RunStatus::Succeeded);
    }
}
