//! # playsync-sync
//!
//! File mirroring and git publication for one sync attempt.
//!
//! Call [`run_once`] to copy the configured files into the repository and
//! publish them if `git status` reports a change, or [`run_attempt`] to do the
//! same with every failure logged and swallowed.

pub mod attempt;
pub mod error;
pub mod git;
pub mod mirror;

pub use attempt::{run_attempt, run_once, AttemptOutcome, AttemptReport};
pub use error::SyncError;
pub use git::{GitCli, GitOutput, GitRunner};
