//! `playsync run`: continuous mode in the foreground.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use playsync_daemon::start_blocking;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Config file to use instead of ~/.playsync/config.yaml.
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Seconds between attempts; overrides `interval_secs` from the config.
    #[arg(long, value_name = "SECS")]
    pub interval: Option<u64>,
}

impl RunArgs {
    pub fn run(self) -> Result<()> {
        let mut config = playsync_core::config::load(self.config.as_deref())
            .context("failed to load config; run `playsync config init` first")?;
        if let Some(interval) = self.interval {
            config.interval_secs = interval;
        }
        config.validate().context("invalid --interval")?;

        start_blocking(config).context("sync loop exited with error")
    }
}
