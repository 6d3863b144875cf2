//! Core types for the provisioning pipeline.
//!
//! A provisioning run is three ordered stages; each stage is a single
//! external command. Types here model the stage order, per-stage outcomes,
//! and the run report.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Backend packages installed by the backend dependency stage.
///
/// Unpinned on purpose: the contract is "current latest compatible", and
/// reproducibility is the package manager's concern. `celery[redis]` selects
/// the broker extra so the queue and the cache share one backend.
pub const BACKEND_PACKAGES: [&str; 6] = [
    "flask",
    "flask-cors",
    "redis",
    "celery[redis]",
    "flower",
    "eventlet",
];

/// One ordered step of the provisioning pipeline.
///
/// Stages form a total order and only ever advance to the immediate
/// successor; nothing skips a stage or runs one out of order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    /// Install the frontend package set declared in the frontend manifest
    FrontendInstall,
    /// Install the fixed backend package list
    BackendInstall,
    /// Delegate container-image pulls to the collaborator script
    ImagePull,
}

impl Stage {
    /// All stages, in execution order.
    pub const ALL: [Stage; 3] = [Stage::FrontendInstall, Stage::BackendInstall, Stage::ImagePull];

    /// Stable machine-readable name
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::FrontendInstall => "frontend-install",
            Stage::BackendInstall => "backend-install",
            Stage::ImagePull => "image-pull",
        }
    }

    /// Zero-based position in the execution order
    pub fn index(&self) -> usize {
        match self {
            Stage::FrontendInstall => 0,
            Stage::BackendInstall => 1,
            Stage::ImagePull => 2,
        }
    }

    /// The stage that runs after this one, if any
    pub fn next(&self) -> Option<Stage> {
        match self {
            Stage::FrontendInstall => Some(Stage::BackendInstall),
            Stage::BackendInstall => Some(Stage::ImagePull),
            Stage::ImagePull => None,
        }
    }

    /// Whether this stage is the legal successor of `prev`
    pub fn follows(&self, prev: Stage) -> bool {
        prev.next() == Some(*self)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a single stage within one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StageStatus {
    /// Command ran and exited zero
    Completed,
    /// Command ran (or failed to launch) and the pipeline stopped here
    Failed,
    /// Never started because an earlier stage failed
    Skipped,
}

/// Per-stage record collected into the run report
#[derive(Debug, Clone, Serialize)]
pub struct StageReport {
    pub stage: Stage,
    pub status: StageStatus,
    /// Exit code of the stage command, when it ran and reported one
    pub exit_code: Option<i32>,
    pub duration_ms: u64,
}

/// Report for one full provisioning run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub started_at: DateTime<Utc>,
    pub stages: Vec<StageReport>,
}

impl PipelineReport {
    /// True when every stage completed
    pub fn is_success(&self) -> bool {
        self.stages
            .iter()
            .all(|s| s.status == StageStatus::Completed)
    }

    /// The stage the run stopped at, if any
    pub fn failed_stage(&self) -> Option<&StageReport> {
        self.stages.iter().find(|s| s.status == StageStatus::Failed)
    }

    /// Total wall-clock time across executed stages
    pub fn total_duration_ms(&self) -> u64 {
        self.stages.iter().map(|s| s.duration_ms).sum()
    }

    /// Process exit code for this run: the first failing stage's exit code
    /// (1 when the stage died without one), or 0 when everything completed.
    pub fn exit_code(&self) -> i32 {
        match self.failed_stage() {
            Some(failed) => failed.exit_code.filter(|c| *c != 0).unwrap_or(1),
            None => 0,
        }
    }
}
