//! The provisioning pipeline
//!
//! Three stages, executed strictly in order on a single host:
//!
//! 1. Frontend dependency install (inside the frontend directory)
//! 2. Backend dependency install (fixed package list)
//! 3. Container-image acquisition (delegated to the collaborator script)
//!
//! Any stage failure aborts the run at that point: the failing stage is
//! recorded, later stages are marked skipped and never execute. Nothing is
//! rolled back and nothing is retried; the underlying package managers own
//! idempotency.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::Utc;
use fs2::FileExt;

use crate::config::Config;
use crate::error::{ProvisError, ProvisResult};
use crate::exec::StageCommand;
use crate::models::{PipelineReport, Stage, StageReport, StageStatus, BACKEND_PACKAGES};
use crate::workdir::WorkdirGuard;

/// Lock file taken for the duration of a run, in the project root
pub const LOCK_FILE: &str = ".provis.lock";

/// Options for a pipeline run
#[derive(Debug, Clone, Default)]
pub struct ProvisionOptions {
    /// Discard child stdout (JSON output mode)
    pub quiet: bool,
}

/// Progress events emitted while the pipeline runs
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    StageStarted {
        stage: Stage,
        command: String,
    },
    StageCompleted {
        stage: Stage,
        duration_ms: u64,
    },
    StageFailed {
        stage: Stage,
        code: Option<i32>,
        message: String,
    },
}

impl PipelineEvent {
    /// One-line JSON rendering for `--json` output
    pub fn to_json(&self) -> String {
        let value = match self {
            PipelineEvent::StageStarted { stage, command } => serde_json::json!({
                "event": "stage",
                "stage": stage,
                "status": "started",
                "command": command,
            }),
            PipelineEvent::StageCompleted { stage, duration_ms } => serde_json::json!({
                "event": "stage",
                "stage": stage,
                "status": "completed",
                "duration_ms": duration_ms,
            }),
            PipelineEvent::StageFailed {
                stage,
                code,
                message,
            } => serde_json::json!({
                "event": "stage",
                "stage": stage,
                "status": "failed",
                "code": code,
                "message": message,
            }),
        };
        value.to_string()
    }
}

/// The three-stage provisioning pipeline for one project root
#[derive(Debug, Clone)]
pub struct Pipeline {
    root: PathBuf,
    config: Config,
}

impl Pipeline {
    pub fn new(root: PathBuf, config: Config) -> Self {
        Self { root, config }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The frontend directory, resolved against the project root
    pub fn frontend_dir(&self) -> PathBuf {
        self.root.join(&self.config.frontend_dir)
    }

    /// The collaborator script, resolved against the project root unless
    /// configured as an absolute path
    pub fn image_script(&self) -> PathBuf {
        if self.config.image_script.is_absolute() {
            self.config.image_script.clone()
        } else {
            self.root.join(&self.config.image_script)
        }
    }

    /// The command each stage runs
    pub fn command_for(&self, stage: Stage) -> StageCommand {
        match stage {
            Stage::FrontendInstall => {
                StageCommand::new(self.config.tools.npm.clone(), ["install"])
            }
            Stage::BackendInstall => {
                let mut args = vec!["install".to_string()];
                args.extend(BACKEND_PACKAGES.iter().map(|p| p.to_string()));
                StageCommand::new(self.config.tools.pip.clone(), args)
            }
            Stage::ImagePull => StageCommand::new(
                self.image_script().display().to_string(),
                Vec::<String>::new(),
            ),
        }
    }

    /// Human-readable plan: one line per stage, nothing executed.
    ///
    /// Renders the configured (not resolved) locations so the plan is the
    /// same wherever it is printed from.
    pub fn plan(&self) -> Vec<String> {
        Stage::ALL
            .iter()
            .map(|stage| match stage {
                Stage::FrontendInstall => format!(
                    "{}: {} (in {})",
                    stage,
                    self.command_for(*stage).rendered(),
                    self.config.frontend_dir.display()
                ),
                Stage::BackendInstall => {
                    format!("{}: {}", stage, self.command_for(*stage).rendered())
                }
                Stage::ImagePull => {
                    format!("{}: {}", stage, self.config.image_script.display())
                }
            })
            .collect()
    }

    /// Run the stages in order, fail-fast.
    ///
    /// Emits a `PipelineEvent` around each stage. Returns the run report;
    /// a stage failure shows up there as a `Failed` entry followed by
    /// `Skipped` entries for the stages that never ran. `Err` is reserved
    /// for problems outside the stages themselves (the run lock).
    pub fn run(
        &self,
        options: &ProvisionOptions,
        mut on_event: impl FnMut(PipelineEvent),
    ) -> ProvisResult<PipelineReport> {
        let _lock = self.acquire_lock()?;

        let started_at = Utc::now();
        let mut stages = Vec::with_capacity(Stage::ALL.len());

        let mut order = Stage::ALL.iter().copied();
        while let Some(stage) = order.next() {
            let command = self.command_for(stage);
            on_event(PipelineEvent::StageStarted {
                stage,
                command: command.rendered(),
            });

            let clock = Instant::now();
            let outcome = self.run_stage(stage, &command, options);
            let duration_ms = clock.elapsed().as_millis() as u64;

            match outcome {
                Ok(()) => {
                    on_event(PipelineEvent::StageCompleted { stage, duration_ms });
                    stages.push(StageReport {
                        stage,
                        status: StageStatus::Completed,
                        exit_code: Some(0),
                        duration_ms,
                    });
                }
                Err(err) => {
                    let code = match &err {
                        ProvisError::StageFailed { code, .. } => *code,
                        _ => None,
                    };
                    on_event(PipelineEvent::StageFailed {
                        stage,
                        code,
                        message: err.to_string(),
                    });
                    stages.push(StageReport {
                        stage,
                        status: StageStatus::Failed,
                        exit_code: code,
                        duration_ms,
                    });
                    for skipped in order.by_ref() {
                        stages.push(StageReport {
                            stage: skipped,
                            status: StageStatus::Skipped,
                            exit_code: None,
                            duration_ms: 0,
                        });
                    }
                    break;
                }
            }
        }

        Ok(PipelineReport { started_at, stages })
    }

    /// Run one stage's command, with directory context where the stage
    /// demands it.
    fn run_stage(
        &self,
        stage: Stage,
        command: &StageCommand,
        options: &ProvisionOptions,
    ) -> ProvisResult<()> {
        match stage {
            Stage::FrontendInstall => {
                // Guard restores the starting directory on every exit path,
                // so the backend stage always runs where the pipeline began.
                let _dir = WorkdirGuard::enter(&self.frontend_dir())?;
                command.run(stage, options.quiet)
            }
            Stage::BackendInstall | Stage::ImagePull => command.run(stage, options.quiet),
        }
    }

    /// Take the exclusive run lock for this project root.
    fn acquire_lock(&self) -> ProvisResult<File> {
        let path = self.root.join(LOCK_FILE);
        let file = File::create(&path)?;
        file.try_lock_exclusive().map_err(|e| {
            if e.kind() == std::io::ErrorKind::WouldBlock {
                ProvisError::LockHeld { path: path.clone() }
            } else {
                ProvisError::Io(e)
            }
        })?;
        Ok(file)
    }
}
