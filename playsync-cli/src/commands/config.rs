//! `playsync config init|show|path`

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use playsync_core::{config, SyncConfig, DEFAULT_INTERVAL_SECS};

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Write a new config file.
    Init(InitArgs),
    /// Print the effective config (file plus PLAYSYNC_* overrides) as YAML.
    Show {
        /// Config file to use instead of ~/.playsync/config.yaml.
        #[arg(long, short = 'c', value_name = "PATH")]
        config: Option<PathBuf>,
    },
    /// Print the default config file location.
    Path,
}

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory the playout application writes into.
    #[arg(long, value_name = "DIR")]
    pub source: PathBuf,

    /// Git working tree to mirror into.
    #[arg(long, value_name = "DIR")]
    pub repo: PathBuf,

    /// Filename to mirror; repeat for several, order is kept.
    #[arg(long = "file", short = 'f', value_name = "NAME", required = true)]
    pub files: Vec<String>,

    /// Seconds between attempts in `playsync run`.
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_INTERVAL_SECS)]
    pub interval: u64,

    /// Remote to force-push to (default: the branch's upstream).
    #[arg(long)]
    pub remote: Option<String>,

    /// Branch to push; requires --remote.
    #[arg(long, requires = "remote")]
    pub branch: Option<String>,

    /// Write here instead of ~/.playsync/config.yaml.
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Replace an existing config file.
    #[arg(long)]
    pub force: bool,
}

pub fn run(command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Init(args) => init(args),
        ConfigCommand::Show { config: explicit } => {
            let config = config::load(explicit.as_deref()).context("failed to load config")?;
            let yaml = serde_yaml::to_string(&config).context("failed to render config YAML")?;
            print!("{yaml}");
            Ok(())
        }
        ConfigCommand::Path => {
            let path = config::config_path().context("could not determine config location")?;
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn init(args: InitArgs) -> Result<()> {
    let cwd = std::env::current_dir().context("could not determine current directory")?;

    let mut sync_config = SyncConfig::new(
        absolute(&cwd, args.source),
        absolute(&cwd, args.repo),
        args.files,
        args.interval,
    );
    sync_config.remote = args.remote;
    sync_config.branch = args.branch;
    sync_config.validate().context("refusing to write invalid config")?;

    let path = match args.config {
        Some(path) => {
            let path = absolute(&cwd, path);
            config::save_to(&path, &sync_config, args.force)
                .with_context(|| format!("failed to write {}", path.display()))?;
            path
        }
        None => config::save(&sync_config, args.force).context("failed to write config")?,
    };

    println!("wrote {}", path.display());
    Ok(())
}

fn absolute(cwd: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        cwd.join(path)
    }
}
