//! Configuration module for Provis
//!
//! An optional `provision.toml` at the project root overrides
//! host-incidental locations (frontend directory, collaborator script,
//! package-manager binaries). The package lists themselves are compiled in
//! and cannot be configured; a bare `provis` run on a stock checkout uses
//! the built-in defaults throughout.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ProvisError, ProvisResult};

/// Name of the optional configuration file, looked up in the project root
pub const CONFIG_FILE: &str = "provision.toml";

/// Tool name overrides
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Frontend package manager binary
    #[serde(default = "default_npm")]
    pub npm: String,

    /// Backend package installer binary
    #[serde(default = "default_pip")]
    pub pip: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            npm: default_npm(),
            pip: default_pip(),
        }
    }
}

fn default_npm() -> String {
    "npm".to_string()
}

fn default_pip() -> String {
    "pip".to_string()
}

/// Provis configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the frontend dependency manifest
    #[serde(default = "default_frontend_dir")]
    pub frontend_dir: PathBuf,

    /// Collaborator script that pulls the container images
    #[serde(default = "default_image_script")]
    pub image_script: PathBuf,

    #[serde(default)]
    pub tools: ToolsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            frontend_dir: default_frontend_dir(),
            image_script: default_image_script(),
            tools: ToolsConfig::default(),
        }
    }
}

fn default_frontend_dir() -> PathBuf {
    PathBuf::from("frontend")
}

fn default_image_script() -> PathBuf {
    PathBuf::from("./get_docker_images.sh")
}

impl Config {
    /// Load configuration from `path`.
    ///
    /// A missing file yields the defaults; a file that exists but does not
    /// parse is an error rather than a silent fallback.
    pub fn load(path: &Path) -> ProvisResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|e| ProvisError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}
