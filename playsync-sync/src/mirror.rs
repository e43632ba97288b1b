//! Copy the configured files from the source directory into the repository.
//!
//! Files are copied one at a time, in configuration order. The first failure
//! aborts the remaining copies; files copied before it stay in place.

use std::path::{Path, PathBuf};

use filetime::FileTime;

use playsync_core::SyncConfig;

use crate::error::{io_err, SyncError};

/// Copy `from` over `to`, keeping content and permission bits, then set the
/// destination's access and modification times to now.
///
/// The timestamp refresh happens even when the bytes are identical, so the
/// file always reads as freshly touched.
pub fn mirror_file(from: &Path, to: &Path) -> Result<(), SyncError> {
    std::fs::copy(from, to).map_err(|e| SyncError::Copy {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source: e,
    })?;

    let now = FileTime::now();
    filetime::set_file_times(to, now, now).map_err(|e| SyncError::Touch {
        path: to.to_path_buf(),
        source: e,
    })?;
    Ok(())
}

/// Mirror every configured file. Returns the destination paths written.
///
/// Nested filenames (`logs/now.json`) get their parent directories created
/// under `repo_dir`, but `repo_dir` itself is never created: a missing
/// repository surfaces as a copy failure.
pub fn mirror_files(config: &SyncConfig) -> Result<Vec<PathBuf>, SyncError> {
    let mut copied = Vec::with_capacity(config.files.len());

    for file in &config.files {
        let from = config.source_path(file);
        let to = config.dest_path(file);

        if let Some(parent) = to.parent() {
            if parent != config.repo_dir && config.repo_dir.is_dir() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
            }
        }

        mirror_file(&from, &to)?;
        tracing::info!(file = %file, "copied from source to repo");
        copied.push(to);
    }

    Ok(copied)
}
