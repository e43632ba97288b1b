//! playsync core library: the config value and how it is loaded and saved.
//!
//! Public API surface:
//! - [`types`]: [`SyncConfig`] and its defaults
//! - [`error`]: [`ConfigError`]
//! - [`config`]: load / save / env overrides

pub mod config;
pub mod error;
pub mod types;

pub use error::ConfigError;
pub use types::{SyncConfig, DEFAULT_GIT_PROGRAM, DEFAULT_INTERVAL_SECS, DEFAULT_MESSAGE_PREFIX};
