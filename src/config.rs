//! Configuration loaded from a TOML file.
//!
//! ```toml
//! debounce_ms = 120
//! max_results = 50
//! log_format = "json"
//! index_paths = ["~/docs/imagingbook/javadoc"]
//! ```

use crate::error::Result;
use crate::session::SessionOptions;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

/// Settings for the lookup server and CLI.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LookupConfig {
    /// Quiet period after a keystroke before a query runs.
    pub debounce_ms: u64,
    /// Cap on presented results per query; unset or 0 means unlimited.
    pub max_results: Option<usize>,
    pub log_format: LogFormat,
    /// Search-index files or javadoc directories loaded at startup.
    pub index_paths: Vec<PathBuf>,
}

impl LookupConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("Invalid docsearch configuration")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("In config file {}", path.display()))
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            debounce: Duration::from_millis(self.debounce_ms),
            max_results: self.max_results.filter(|&limit| limit > 0),
        }
    }

    /// Index paths with `~` expanded.
    pub fn resolved_index_paths(&self) -> Vec<PathBuf> {
        self.index_paths
            .iter()
            .map(|path| PathBuf::from(expand_tilde(&path.to_string_lossy()).into_owned()))
            .collect()
    }
}

/// Expands tilde (`~`) in a path to the user's home directory.
///
/// - `~/foo` becomes `/home/user/foo`
/// - `~` becomes `/home/user`
/// - Other paths are returned unchanged
pub fn expand_tilde(path: &str) -> Cow<'_, str> {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return Cow::Owned(home.join(stripped).display().to_string());
        }
    } else if path == "~"
        && let Some(home) = dirs::home_dir()
    {
        return Cow::Owned(home.display().to_string());
    }
    Cow::Borrowed(path)
}
