//! Error types for playsync-sync.

use std::path::PathBuf;

use thiserror::Error;

/// Failures that abort a sync attempt.
///
/// A git step that exits non-zero is *not* one of these: it is logged and the
/// attempt carries on, see [`crate::AttemptOutcome::PublishedWithErrors`].
#[derive(Debug, Error)]
pub enum SyncError {
    /// Copying a mirrored file failed (missing source, permission denied, …).
    #[error("failed to copy {from} to {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The copy succeeded but its timestamps could not be refreshed.
    #[error("failed to refresh timestamps on {path}: {source}")]
    Touch {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Creating a nested destination directory failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The git executable could not be launched at all.
    #[error("failed to run `{program} {command}`: {source}")]
    Spawn {
        program: PathBuf,
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// `git status` failed, so there is no way to tell whether anything changed.
    #[error("`git status` failed in {repo}: {diagnostic}")]
    Status { repo: PathBuf, diagnostic: String },
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
