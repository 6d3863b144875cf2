//! Provis - sequential host-provisioning pipeline
//!
//! Provis prepares a host to run the application: it installs the frontend
//! package set, installs the fixed backend package list, and delegates
//! container-image pulls to a collaborator script. Stages run strictly in
//! order with fail-fast propagation; a failing stage aborts the run and
//! later stages never execute.

pub mod config;
pub mod error;
pub mod exec;
pub mod models;
pub mod pipeline;
pub mod preflight;
pub mod ui;
pub mod workdir;

// Re-exports for convenience
pub use config::{Config, ToolsConfig, CONFIG_FILE};
pub use error::{ProvisError, ProvisResult};
pub use exec::{probe, StageCommand};
pub use models::{
    PipelineReport, Stage, StageReport, StageStatus, BACKEND_PACKAGES,
};
pub use pipeline::{Pipeline, PipelineEvent, ProvisionOptions, LOCK_FILE};
pub use preflight::{run_preflight, Check, CheckStatus, PreflightReport};
pub use workdir::WorkdirGuard;
