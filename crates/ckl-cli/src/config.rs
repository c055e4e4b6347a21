//! # CLI Configuration
//!
//! Optional YAML file passed with `--config`:
//!
//! ```yaml
//! state_dir: /var/lib/ckl/checklists
//! schema:
//!   - { order: 1, label: "Tasks Worked", key: tasksWorked, kind: numeric }
//!   - { order: 2, label: "Clock In", key: clockIn, kind: binary }
//! ```
//!
//! Resolution of the state directory: `CKL_STATE_DIR`, then `state_dir` from
//! the file (relative paths are taken from the config file's directory),
//! then `.ckl/checklists` under the working directory.
//!
//! Without a `schema` entry the built-in daily report registry is used.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use ckl_core::Schema;

/// Environment variable overriding the state directory.
pub const STATE_DIR_ENV: &str = "CKL_STATE_DIR";

/// Default state directory, relative to the working directory.
pub const DEFAULT_STATE_DIR: &str = ".ckl/checklists";

/// Contents of a `--config` file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    /// Directory holding one JSON file per checklist.
    #[serde(default)]
    pub state_dir: Option<PathBuf>,
    /// Custom field registry.
    #[serde(default)]
    pub schema: Option<Schema>,
}

impl CliConfig {
    /// Parse a config file. An empty file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let mut config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("invalid config file: {}", path.display()))?;
        if let (Some(dir), Some(parent)) = (&config.state_dir, path.parent()) {
            if dir.is_relative() {
                config.state_dir = Some(parent.join(dir));
            }
        }
        Ok(config)
    }
}

/// Resolved settings every subcommand runs with.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Directory backing the file store.
    pub state_dir: PathBuf,
    /// Field registry used to open and submit checklists.
    pub schema: Schema,
}

impl Settings {
    /// Resolve settings from an optional config file, the environment, and
    /// the working directory.
    pub fn resolve(config_path: Option<&Path>, cwd: &Path) -> Result<Self> {
        let config = match config_path {
            Some(path) => CliConfig::load(path)?,
            None => CliConfig::default(),
        };
        let env_dir = std::env::var_os(STATE_DIR_ENV).map(PathBuf::from);
        Ok(Self::from_parts(config, env_dir, cwd))
    }

    fn from_parts(config: CliConfig, env_dir: Option<PathBuf>, cwd: &Path) -> Self {
        let state_dir = env_dir
            .filter(|d| !d.as_os_str().is_empty())
            .or(config.state_dir)
            .unwrap_or_else(|| cwd.join(DEFAULT_STATE_DIR));
        let schema = config.schema.unwrap_or_else(Schema::daily_report);
        tracing::debug!(
            state_dir = %state_dir.display(),
            fields = schema.len(),
            "resolved settings"
        );
        Self { state_dir, schema }
    }
}
