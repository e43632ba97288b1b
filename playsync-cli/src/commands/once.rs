//! `playsync once`: one attempt, then exit.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use playsync_daemon::init_tracing;
use playsync_sync::{run_attempt, AttemptOutcome, AttemptReport, GitCli};

#[derive(Args, Debug)]
pub struct OnceArgs {
    /// Config file to use instead of ~/.playsync/config.yaml.
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print the attempt report as JSON.
    #[arg(long)]
    pub json: bool,
}

impl OnceArgs {
    /// A failed attempt is logged and still exits 0; only config errors fail.
    pub fn run(self) -> Result<()> {
        init_tracing();

        let config = playsync_core::config::load(self.config.as_deref())
            .context("failed to load config; run `playsync config init` first")?;
        let git = GitCli::from_config(&config);

        let report = run_attempt(&config, &git);

        if self.json {
            let rendered = match &report {
                Some(report) => serde_json::to_string_pretty(report),
                None => serde_json::to_string_pretty(&serde_json::json!({ "status": "failed" })),
            }
            .context("failed to render attempt JSON")?;
            println!("{rendered}");
        } else {
            print_summary(report.as_ref());
        }
        Ok(())
    }
}

fn print_summary(report: Option<&AttemptReport>) {
    let Some(report) = report else {
        println!("{} sync attempt failed (see log)", "■".red().bold());
        return;
    };

    match &report.outcome {
        AttemptOutcome::NoChanges => {
            println!("{} no changes ({} files copied)", "■".dimmed(), report.copied.len());
        }
        AttemptOutcome::NothingStaged => {
            println!("{} nothing staged", "■".dimmed());
        }
        AttemptOutcome::Published { timestamp } => {
            println!(
                "{} published {} at {timestamp}",
                "■".green().bold(),
                report.changed.join(", ")
            );
        }
        AttemptOutcome::PublishedWithErrors {
            timestamp,
            failed_steps,
        } => {
            println!(
                "{} published {} at {timestamp} with failures: {}",
                "■".yellow().bold(),
                report.changed.join(", "),
                failed_steps.join(", ")
            );
        }
    }
}
