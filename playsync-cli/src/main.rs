//! playsync: mirror playout status files into a git repository.
//!
//! # Usage
//!
//! ```text
//! playsync once [--config PATH] [--json]
//! playsync run [--config PATH] [--interval SECS]
//! playsync config init --source DIR --repo DIR --file NAME... [--interval SECS]
//!                      [--remote R] [--branch B] [--force]
//! playsync config show [--config PATH]
//! playsync config path
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{config::ConfigCommand, once::OnceArgs, run::RunArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "playsync",
    version,
    about = "Copy playout status files into a git repository and force-push them",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a single sync attempt and exit.
    Once(OnceArgs),

    /// Repeat sync attempts on an interval until interrupted.
    Run(RunArgs),

    /// Create or inspect the config file.
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Once(args) => args.run(),
        Commands::Run(args) => args.run(),
        Commands::Config { command } => commands::config::run(command),
    }
}
