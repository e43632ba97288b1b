//! Blocking wrappers around the system `git` binary.
//!
//! [`GitRunner`] is the seam between a sync attempt and git: [`GitCli`] shells
//! out for real, tests substitute a scripted runner. A runner only reports what
//! happened; deciding whether a non-zero exit matters is [`classify`]'s job.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use playsync_core::{SyncConfig, DEFAULT_GIT_PROGRAM};

use crate::error::SyncError;

/// Diagnostic text git prints when a commit has nothing staged.
pub const NOTHING_TO_COMMIT: &str = "nothing to commit";

/// Captured result of one git invocation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GitOutput {
    /// Exit code; `None` when the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl GitOutput {
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Git writes "nothing to commit" to stdout for `commit`, stderr elsewhere.
    pub fn is_nothing_to_commit(&self) -> bool {
        self.stderr.contains(NOTHING_TO_COMMIT) || self.stdout.contains(NOTHING_TO_COMMIT)
    }

    /// Best human-readable explanation of a failure.
    pub fn diagnostic(&self) -> &str {
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            self.stdout.trim()
        } else {
            stderr
        }
    }
}

/// Runs git with `repo` as the working directory and blocks until it exits.
pub trait GitRunner {
    fn run(&self, repo: &Path, args: &[&str]) -> Result<GitOutput, SyncError>;
}

impl<T: GitRunner + ?Sized> GitRunner for &T {
    fn run(&self, repo: &Path, args: &[&str]) -> Result<GitOutput, SyncError> {
        (**self).run(repo, args)
    }
}

/// [`GitRunner`] backed by `std::process::Command`.
///
/// Stdin is closed and `GIT_TERMINAL_PROMPT=0` is set, so a push that needs
/// credentials fails instead of waiting on a prompt nobody will answer.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: PathBuf,
}

impl GitCli {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn from_config(config: &SyncConfig) -> Self {
        Self::new(&config.git_program)
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new(DEFAULT_GIT_PROGRAM)
    }
}

impl GitRunner for GitCli {
    fn run(&self, repo: &Path, args: &[&str]) -> Result<GitOutput, SyncError> {
        tracing::debug!(repo = %repo.display(), args = ?args, "running git");

        let output = Command::new(&self.program)
            .args(args)
            .current_dir(repo)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| SyncError::Spawn {
                program: self.program.clone(),
                command: args.join(" "),
                source: e,
            })?;

        Ok(GitOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// The git invocations a sync attempt makes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitStep {
    Status,
    Add(String),
    StagedCheck,
    Commit,
    Push,
}

impl fmt::Display for GitStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GitStep::Status => f.write_str("git status"),
            GitStep::Add(file) => write!(f, "git add {file}"),
            GitStep::StagedCheck => f.write_str("git diff --cached"),
            GitStep::Commit => f.write_str("git commit"),
            GitStep::Push => f.write_str("git push"),
        }
    }
}

/// How a finished git step should be treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Succeeded,
    /// Non-zero exit that only said "nothing to commit".
    Tolerated,
    Failed,
}

pub fn classify(output: &GitOutput) -> StepStatus {
    if output.success() {
        StepStatus::Succeeded
    } else if output.is_nothing_to_commit() {
        StepStatus::Tolerated
    } else {
        StepStatus::Failed
    }
}

/// Run one step and log it according to [`classify`].
///
/// Only failing to launch git is an `Err`; a failing exit code is returned as
/// [`StepStatus::Failed`] after being logged with git's diagnostic.
pub fn run_step<G: GitRunner + ?Sized>(
    git: &G,
    repo: &Path,
    step: &GitStep,
    args: &[&str],
) -> Result<(StepStatus, GitOutput), SyncError> {
    let output = git.run(repo, args)?;
    let status = classify(&output);
    match status {
        StepStatus::Succeeded => {}
        StepStatus::Tolerated => {
            tracing::debug!(step = %step, "nothing to commit");
        }
        StepStatus::Failed => {
            tracing::error!(
                step = %step,
                code = ?output.code,
                diagnostic = %output.diagnostic(),
                "git command failed",
            );
        }
    }
    Ok((status, output))
}

/// `git status --porcelain` arguments.
///
/// Untracked files are listed individually so a new file inside a new
/// directory shows up by its full path. `-z` keeps paths unquoted, so
/// non-ASCII names appear verbatim instead of as C-escaped octets.
pub const STATUS_ARGS: &[&str] = &["status", "--porcelain", "-z", "--untracked-files=all"];

/// `git diff --cached --quiet`: exit 0 when the index matches HEAD.
pub const STAGED_CHECK_ARGS: &[&str] = &["diff", "--cached", "--quiet"];

pub fn add_args(file: &str) -> [&str; 3] {
    ["add", "--", file]
}

pub fn commit_args(message: &str) -> [&str; 3] {
    ["commit", "-m", message]
}

/// `push --force [<remote> [<branch>]]`
pub fn push_args<'a>(remote: Option<&'a str>, branch: Option<&'a str>) -> Vec<&'a str> {
    let mut args = vec!["push", "--force"];
    if let Some(remote) = remote {
        args.push(remote);
        if let Some(branch) = branch {
            args.push(branch);
        }
    }
    args
}
