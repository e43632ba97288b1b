//! The sync configuration value.
//!
//! All path fields use `PathBuf`. The value is serializable via serde + serde_yaml
//! and is passed explicitly into every sync routine; nothing reads it globally.

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{invalid, ConfigError};

/// Commit message prefix; the message is `"<prefix> at <timestamp>"`.
pub const DEFAULT_MESSAGE_PREFIX: &str = "Auto-update files";

/// Polling interval used when neither the file nor the environment sets one.
pub const DEFAULT_INTERVAL_SECS: u64 = 60;

pub const DEFAULT_GIT_PROGRAM: &str = "git";

fn default_message_prefix() -> String {
    DEFAULT_MESSAGE_PREFIX.to_string()
}

fn default_git_program() -> PathBuf {
    PathBuf::from(DEFAULT_GIT_PROGRAM)
}

fn default_interval_secs() -> u64 {
    DEFAULT_INTERVAL_SECS
}

/// Everything one sync attempt needs to know.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Directory the playout application writes its status files into.
    pub source_dir: PathBuf,
    /// Git working tree the files are mirrored into.
    pub repo_dir: PathBuf,
    /// Filenames to mirror, copied in this order.
    pub files: Vec<String>,
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Push target remote; git's configured upstream when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<String>,
    /// Push target branch; only meaningful together with `remote`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(default = "default_message_prefix")]
    pub message_prefix: String,
    #[serde(default = "default_git_program")]
    pub git_program: PathBuf,
}

impl SyncConfig {
    pub fn new(
        source_dir: impl Into<PathBuf>,
        repo_dir: impl Into<PathBuf>,
        files: Vec<String>,
        interval_secs: u64,
    ) -> Self {
        Self {
            source_dir: source_dir.into(),
            repo_dir: repo_dir.into(),
            files,
            interval_secs,
            remote: None,
            branch: None,
            message_prefix: default_message_prefix(),
            git_program: default_git_program(),
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// `<source_dir>/<file>`
    pub fn source_path(&self, file: &str) -> PathBuf {
        self.source_dir.join(file)
    }

    /// `<repo_dir>/<file>`
    pub fn dest_path(&self, file: &str) -> PathBuf {
        self.repo_dir.join(file)
    }

    /// Check every invariant a sync attempt relies on.
    ///
    /// Filenames must stay inside both directories and match what `git status`
    /// prints: relative, no `.` or `..` components.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source_dir.as_os_str().is_empty() {
            return Err(invalid("source_dir", "must not be empty"));
        }
        if self.repo_dir.as_os_str().is_empty() {
            return Err(invalid("repo_dir", "must not be empty"));
        }
        if self.files.is_empty() {
            return Err(invalid("files", "at least one filename is required"));
        }

        let mut seen = HashSet::new();
        for file in &self.files {
            validate_filename(file)?;
            if !seen.insert(file.as_str()) {
                return Err(invalid("files", format!("duplicate entry '{file}'")));
            }
        }

        if self.interval_secs == 0 {
            return Err(invalid("interval_secs", "must be greater than zero"));
        }
        if let Some(remote) = &self.remote {
            if remote.trim().is_empty() {
                return Err(invalid("remote", "must not be blank"));
            }
        }
        if let Some(branch) = &self.branch {
            if branch.trim().is_empty() {
                return Err(invalid("branch", "must not be blank"));
            }
            if self.remote.is_none() {
                return Err(invalid("branch", "requires `remote` to be set"));
            }
        }
        if self.git_program.as_os_str().is_empty() {
            return Err(invalid("git_program", "must not be empty"));
        }
        Ok(())
    }
}

fn validate_filename(file: &str) -> Result<(), ConfigError> {
    if file.trim().is_empty() {
        return Err(invalid("files", "filenames must not be blank"));
    }
    let path = Path::new(file);
    if path.is_absolute() || path.has_root() {
        return Err(invalid("files", format!("'{file}' must be relative")));
    }
    let escapes = path
        .components()
        .any(|c| !matches!(c, Component::Normal(_)));
    if escapes {
        return Err(invalid(
            "files",
            format!("'{file}' must be a plain relative path without '.' or '..'"),
        ));
    }
    Ok(())
}
