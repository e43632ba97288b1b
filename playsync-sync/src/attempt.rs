//! One sync attempt: mirror, check status, publish.
//!
//! ## `run_once` step protocol
//!
//! 1. Mirror every configured file into the repo (abort on first failure).
//! 2. `git status --porcelain -z`.
//! 3. No configured filename in the output → [`AttemptOutcome::NoChanges`].
//! 4. `git add -- <file>` for every configured file.
//! 5. `git diff --cached --quiet` → exit 0 means [`AttemptOutcome::NothingStaged`].
//! 6. `git commit -m "<prefix> at <YYYY-MM-DD HH:MM:SS>"`; "nothing to commit"
//!    also ends in [`AttemptOutcome::NothingStaged`].
//! 7. `git push --force [<remote> [<branch>]]`.
//!
//! Steps 4, 6 and 7 never abort: a failing exit is logged and recorded, and the
//! next step still runs.

use std::path::PathBuf;
use std::time::Instant;

use chrono::{DateTime, Local};
use serde::Serialize;

use playsync_core::SyncConfig;

use crate::error::SyncError;
use crate::git::{
    add_args, commit_args, push_args, run_step, GitRunner, GitStep, StepStatus,
    STAGED_CHECK_ARGS, STATUS_ARGS,
};
use crate::mirror;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// How an attempt that got past the copy step ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AttemptOutcome {
    /// `git status` mentioned none of the configured files.
    NoChanges,
    /// Files were staged but the index matched HEAD, or commit reported
    /// "nothing to commit"; no push.
    NothingStaged,
    /// Committed and force-pushed.
    Published { timestamp: String },
    /// Commit/push ran, but at least one git step exited non-zero.
    PublishedWithErrors {
        timestamp: String,
        failed_steps: Vec<String>,
    },
}

impl AttemptOutcome {
    pub fn is_clean(&self) -> bool {
        !matches!(self, AttemptOutcome::PublishedWithErrors { .. })
    }
}

/// Summary of a completed attempt.
#[derive(Debug, Clone, Serialize)]
pub struct AttemptReport {
    pub copied: Vec<PathBuf>,
    /// Configured filenames that appeared in `git status`.
    pub changed: Vec<String>,
    pub outcome: AttemptOutcome,
    pub duration_ms: u128,
}

/// Run one attempt against the local clock.
pub fn run_once<G: GitRunner + ?Sized>(
    config: &SyncConfig,
    git: &G,
) -> Result<AttemptReport, SyncError> {
    run_once_with_clock(config, git, Local::now)
}

/// Run one attempt, logging and swallowing any failure.
///
/// This is the unit the scheduler repeats: nothing an attempt does can stop
/// the next one from running.
pub fn run_attempt<G: GitRunner + ?Sized>(config: &SyncConfig, git: &G) -> Option<AttemptReport> {
    match run_once(config, git) {
        Ok(report) => Some(report),
        Err(err) => {
            tracing::error!(error = %err, "sync attempt failed");
            None
        }
    }
}

pub(crate) fn run_once_with_clock<G, C>(
    config: &SyncConfig,
    git: &G,
    now: C,
) -> Result<AttemptReport, SyncError>
where
    G: GitRunner + ?Sized,
    C: Fn() -> DateTime<Local>,
{
    let started = Instant::now();
    let repo = config.repo_dir.as_path();

    // Step 1: mirror.
    let copied = mirror::mirror_files(config)?;

    // Steps 2–3: gate on status.
    let status = git.run(repo, STATUS_ARGS)?;
    if !status.success() {
        return Err(SyncError::Status {
            repo: repo.to_path_buf(),
            diagnostic: status.diagnostic().to_string(),
        });
    }
    let changed = changed_files(&config.files, &status.stdout);
    if changed.is_empty() {
        tracing::info!("no changes detected, skipping commit");
        return Ok(report(copied, changed, AttemptOutcome::NoChanges, started));
    }

    let mut failed_steps = Vec::new();

    // Step 4: stage each file individually.
    for file in &config.files {
        let step = GitStep::Add(file.clone());
        let (result, _) = run_step(git, repo, &step, &add_args(file))?;
        if result == StepStatus::Failed {
            failed_steps.push(step.to_string());
        }
    }

    // Step 5: skip the commit when staging produced no diff.
    if !has_staged_changes(git, config)? {
        tracing::info!("nothing staged after add, skipping commit");
        return Ok(report(copied, changed, AttemptOutcome::NothingStaged, started));
    }

    // Step 6: commit.
    let timestamp = now().format(TIMESTAMP_FORMAT).to_string();
    let message = commit_message(&config.message_prefix, &timestamp);
    let (result, _) = run_step(git, repo, &GitStep::Commit, &commit_args(&message))?;
    match result {
        StepStatus::Succeeded => {}
        StepStatus::Tolerated => {
            tracing::info!("nothing to commit, skipping push");
            return Ok(report(copied, changed, AttemptOutcome::NothingStaged, started));
        }
        StepStatus::Failed => failed_steps.push(GitStep::Commit.to_string()),
    }

    // Step 7: force-push.
    let push = push_args(config.remote.as_deref(), config.branch.as_deref());
    let (result, _) = run_step(git, repo, &GitStep::Push, &push)?;
    if result == StepStatus::Failed {
        failed_steps.push(GitStep::Push.to_string());
    }

    let outcome = if failed_steps.is_empty() {
        tracing::info!(timestamp = %timestamp, files = changed.len(), "pushed update");
        AttemptOutcome::Published { timestamp }
    } else {
        tracing::warn!(
            timestamp = %timestamp,
            failed = ?failed_steps,
            "update attempted with git errors",
        );
        AttemptOutcome::PublishedWithErrors {
            timestamp,
            failed_steps,
        }
    };

    Ok(report(copied, changed, outcome, started))
}

/// Configured filenames that occur as a literal substring of `status`.
pub fn changed_files(files: &[String], status: &str) -> Vec<String> {
    files
        .iter()
        .filter(|file| status.contains(file.as_str()))
        .cloned()
        .collect()
}

/// `"<prefix> at <timestamp>"`
pub fn commit_message(prefix: &str, timestamp: &str) -> String {
    format!("{prefix} at {timestamp}")
}

/// Ask git whether the index differs from HEAD.
///
/// Exit 1 means staged changes, exit 0 means none. Anything else is ambiguous:
/// it is logged and treated as "staged", leaving the commit step (and its
/// "nothing to commit" tolerance) to decide.
fn has_staged_changes<G: GitRunner + ?Sized>(
    git: &G,
    config: &SyncConfig,
) -> Result<bool, SyncError> {
    let output = git.run(&config.repo_dir, STAGED_CHECK_ARGS)?;
    match output.code {
        Some(0) => Ok(false),
        Some(1) => Ok(true),
        _ => {
            tracing::warn!(
                step = %GitStep::StagedCheck,
                code = ?output.code,
                diagnostic = %output.diagnostic(),
                "could not determine staged changes, committing anyway",
            );
            Ok(true)
        }
    }
}

fn report(
    copied: Vec<PathBuf>,
    changed: Vec<String>,
    outcome: AttemptOutcome,
    started: Instant,
) -> AttemptReport {
    AttemptReport {
        copied,
        changed,
        outcome,
        duration_ms: started.elapsed().as_millis(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
