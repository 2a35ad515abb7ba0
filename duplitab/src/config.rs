//! Configuration for invoking duplicity.
//!
//! Loads configuration from a TOML file, or from the environment (with `.env`
//! support) for callers that have no file.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::{DuplitabError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub duplicity: DuplicityConfig,

    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicityConfig {
    /// Executable to run (default: `duplicity` from PATH)
    #[serde(default = "default_program")]
    pub program: PathBuf,

    /// Arguments placed before every command, e.g. `--archive-dir`
    #[serde(default)]
    pub global_args: Vec<String>,

    /// Extra environment for the process, e.g. `PASSPHRASE`
    #[serde(default)]
    pub env: BTreeMap<String, String>,

    /// Default `--timeout` in seconds when a call does not pass one
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_program() -> PathBuf {
    PathBuf::from("duplicity")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for DuplicityConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            global_args: Vec::new(),
            env: BTreeMap::new(),
            timeout_seconds: None,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| DuplitabError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| DuplitabError::Config(e.to_string()))
    }

    /// Defaults overridden by `DUPLITAB_DUPLICITY`, `DUPLITAB_TIMEOUT` and
    /// `DUPLITAB_LOG_LEVEL`, reading `.env` first if present.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides looked up by variable name. Unparsable values are ignored.
    pub fn with_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(program) = var("DUPLITAB_DUPLICITY").filter(|v| !v.is_empty()) {
            self.duplicity.program = PathBuf::from(program);
        }
        if let Some(seconds) = var("DUPLITAB_TIMEOUT").and_then(|v| v.trim().parse().ok()) {
            self.duplicity.timeout_seconds = Some(seconds);
        }
        if let Some(level) = var("DUPLITAB_LOG_LEVEL").filter(|v| !v.is_empty()) {
            self.log.level = level;
        }
        self
    }
}
