//! External command execution
//!
//! Every stage is one external command. Commands are held as data so the
//! pipeline can be planned without running anything, and run with inherited
//! stdio so the invoking terminal sees each tool's own diagnostics - the
//! pipeline adds no wrapping of child output.

use std::process::{Command, Stdio};

use crate::error::{ProvisError, ProvisResult};
use crate::models::Stage;

/// A stage's external command: program plus arguments.
///
/// The working directory is not part of the command; the pipeline owns
/// directory context via `WorkdirGuard`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl StageCommand {
    pub fn new<P, I, S>(program: P, args: I) -> Self
    where
        P: Into<String>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Single-line rendering for plans and progress output
    pub fn rendered(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }

    /// Run the command to completion, mapping failure onto `stage`.
    ///
    /// With `quiet` set (JSON output mode) child stdout is discarded so the
    /// report stream stays machine-readable; stderr always reaches the
    /// terminal.
    pub fn run(&self, stage: Stage, quiet: bool) -> ProvisResult<()> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).stdin(Stdio::inherit());

        if quiet {
            cmd.stdout(Stdio::null()).stderr(Stdio::inherit());
        } else {
            cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());
        }

        let status = cmd.status().map_err(|e| ProvisError::StageSpawn {
            stage,
            program: self.program.clone(),
            source: e,
        })?;

        if !status.success() {
            return Err(ProvisError::StageFailed {
                stage,
                code: status.code(),
            });
        }

        Ok(())
    }
}

/// Check whether `program` is installed and answers `--version`.
///
/// Used by preflight checks; stdio is discarded.
pub fn probe(program: &str) -> bool {
    Command::new(program)
        .arg("--version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}
