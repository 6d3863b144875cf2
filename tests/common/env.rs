//! Test environment builder for isolated Provis testing.
//!
//! Provisioning runs external tools; tests substitute them with shell stubs
//! that record their invocation (arguments and working directory) into a
//! log file, so ordering, fail-fast, and directory-restoration behavior can
//! be asserted without npm, pip, or docker installed.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Result of running a Provis CLI command
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    /// Combine stdout and stderr
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }
}

/// Isolated test environment.
///
/// Provides:
/// - A temp project root (frontend dir, manifest, image script)
/// - A temp bin directory prepended to PATH for tool stubs
/// - CLI execution helpers and the stub invocation log
pub struct TestEnv {
    /// Temporary directory for the project
    pub project_root: TempDir,
    /// Temporary directory holding stub tool binaries
    pub bin_dir: TempDir,
    /// Path to the provis binary under test
    provis_bin: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            project_root: TempDir::new().expect("failed to create project tempdir"),
            bin_dir: TempDir::new().expect("failed to create bin tempdir"),
            provis_bin: PathBuf::from(env!("CARGO_BIN_EXE_provis")),
        }
    }

    /// Get path relative to project root
    pub fn project_path(&self, relative: &str) -> PathBuf {
        self.project_root.path().join(relative)
    }

    /// Canonicalized project root, for comparing against stub-reported cwds
    pub fn canonical_root(&self) -> PathBuf {
        fs::canonicalize(self.project_root.path()).expect("failed to canonicalize project root")
    }

    /// The stub invocation log
    pub fn log_path(&self) -> PathBuf {
        self.project_path("provis-test.log")
    }

    /// Lines the stubs appended, in invocation order
    pub fn log_lines(&self) -> Vec<String> {
        match fs::read_to_string(self.log_path()) {
            Ok(content) => content.lines().map(str::to_string).collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Install an executable stub into the bin directory
    pub fn install_stub(&self, name: &str, body: &str) {
        let path = self.bin_dir.path().join(name);
        write_executable(&path, body);
    }

    /// Write the frontend manifest the install stage expects
    pub fn write_frontend_manifest(&self) {
        let dir = self.project_path("frontend");
        fs::create_dir_all(&dir).expect("failed to create frontend dir");
        fs::write(dir.join("package.json"), "{\"name\": \"frontend\"}\n")
            .expect("failed to write package.json");
    }

    /// Write the collaborator image script into the project root
    pub fn write_image_script(&self, body: &str) {
        write_executable(&self.project_path("get_docker_images.sh"), body);
    }

    /// Run provis in this environment from the project root
    pub fn run(&self, args: &[&str]) -> TestResult {
        self.run_with_env(args, &[])
    }

    /// Run provis from the project root with extra env vars
    pub fn run_with_env(&self, args: &[&str], env_vars: &[(&str, &str)]) -> TestResult {
        let path = format!(
            "{}:{}",
            self.bin_dir.path().display(),
            std::env::var("PATH").unwrap_or_default()
        );

        let mut cmd = Command::new(&self.provis_bin);
        cmd.current_dir(self.project_root.path())
            .args(args)
            .env("PATH", path)
            .env("PROVIS_NO_COLOR", "1")
            .env("PROVIS_TEST_LOG", self.log_path());

        for (key, value) in env_vars {
            cmd.env(key, value);
        }

        let output = cmd.output().expect("failed to execute provis");
        output_to_result(output)
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

fn output_to_result(output: Output) -> TestResult {
    TestResult {
        success: output.status.success(),
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    }
}

fn write_executable(path: &Path, body: &str) {
    fs::write(path, body).expect("failed to write stub");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o755))
            .expect("failed to chmod stub");
    }
}
