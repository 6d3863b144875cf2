//! Preflight checks
//!
//! `provis check` validates the host before a run without mutating it:
//! manifests present, package managers on PATH, collaborator script in
//! place. The container engine is the collaborator script's dependency, so
//! its absence is only a warning here.

use std::path::Path;

use crate::config::Config;
use crate::exec::probe;

/// Outcome of a single preflight check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warning,
    Error,
}

/// A single preflight check result
#[derive(Debug, Clone)]
pub struct Check {
    pub name: &'static str,
    pub status: CheckStatus,
    pub message: String,
    pub recommendation: Option<String>,
}

impl Check {
    fn pass(name: &'static str, message: impl Into<String>) -> Self {
        Self {
            name,
            status: CheckStatus::Pass,
            message: message.into(),
            recommendation: None,
        }
    }

    fn warning(
        name: &'static str,
        message: impl Into<String>,
        recommendation: impl Into<String>,
    ) -> Self {
        Self {
            name,
            status: CheckStatus::Warning,
            message: message.into(),
            recommendation: Some(recommendation.into()),
        }
    }

    fn error(
        name: &'static str,
        message: impl Into<String>,
        recommendation: impl Into<String>,
    ) -> Self {
        Self {
            name,
            status: CheckStatus::Error,
            message: message.into(),
            recommendation: Some(recommendation.into()),
        }
    }
}

/// Collected preflight results
#[derive(Debug, Clone, Default)]
pub struct PreflightReport {
    pub checks: Vec<Check>,
}

impl PreflightReport {
    pub fn passes(&self) -> usize {
        self.count(CheckStatus::Pass)
    }

    pub fn warnings(&self) -> usize {
        self.count(CheckStatus::Warning)
    }

    pub fn errors(&self) -> usize {
        self.count(CheckStatus::Error)
    }

    /// True when no check errored (warnings are acceptable)
    pub fn is_success(&self) -> bool {
        self.errors() == 0
    }

    fn count(&self, status: CheckStatus) -> usize {
        self.checks.iter().filter(|c| c.status == status).count()
    }
}

/// Run every preflight check against `root` with the given configuration.
pub fn run_preflight(root: &Path, config: &Config) -> PreflightReport {
    let mut checks = Vec::new();

    let frontend_dir = root.join(&config.frontend_dir);
    if frontend_dir.is_dir() {
        checks.push(Check::pass(
            "frontend directory",
            format!("{} exists", config.frontend_dir.display()),
        ));

        let manifest = frontend_dir.join("package.json");
        if manifest.is_file() {
            checks.push(Check::pass("frontend manifest", "package.json found"));
        } else {
            checks.push(Check::error(
                "frontend manifest",
                format!("no package.json in {}", config.frontend_dir.display()),
                "the frontend install stage will fail without a manifest",
            ));
        }
    } else {
        checks.push(Check::error(
            "frontend directory",
            format!("{} not found", config.frontend_dir.display()),
            "run provis from the project root, or set frontend_dir in provision.toml",
        ));
    }

    if probe(&config.tools.npm) {
        checks.push(Check::pass(
            "frontend package manager",
            format!("'{}' is on PATH", config.tools.npm),
        ));
    } else {
        checks.push(Check::error(
            "frontend package manager",
            format!("'{}' not found on PATH", config.tools.npm),
            "install it, or point tools.npm in provision.toml at an equivalent",
        ));
    }

    if probe(&config.tools.pip) {
        checks.push(Check::pass(
            "backend package installer",
            format!("'{}' is on PATH", config.tools.pip),
        ));
    } else {
        checks.push(Check::error(
            "backend package installer",
            format!("'{}' not found on PATH", config.tools.pip),
            "install it, or point tools.pip in provision.toml at an equivalent",
        ));
    }

    let script = if config.image_script.is_absolute() {
        config.image_script.clone()
    } else {
        root.join(&config.image_script)
    };
    if script.is_file() {
        if is_executable(&script) {
            checks.push(Check::pass(
                "image script",
                format!("{} is present and executable", config.image_script.display()),
            ));
        } else {
            checks.push(Check::warning(
                "image script",
                format!("{} is not executable", config.image_script.display()),
                "chmod +x it before provisioning",
            ));
        }
    } else {
        checks.push(Check::error(
            "image script",
            format!("{} not found", config.image_script.display()),
            "the image acquisition stage delegates to this script",
        ));
    }

    if probe("docker") {
        checks.push(Check::pass("container engine", "'docker' is on PATH"));
    } else {
        checks.push(Check::warning(
            "container engine",
            "'docker' not found on PATH",
            "the image script decides what it needs; this may be fine",
        ));
    }

    PreflightReport { checks }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(_path: &Path) -> bool {
    true
}
