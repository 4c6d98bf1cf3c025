//! Main entry point for Darah Report.

use anyhow::Context;
use clap::Parser;
use darah_bot::{Pipeline, RunOptions, RunOutcome};
use darah_config::{ConfigLoader, OutputMode};
use std::path::PathBuf;
use tracing::{error, info};

/// Chart Malaysian blood donation statistics and post them to Telegram
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level, overrides the configured one
    #[arg(short, long)]
    log_level: Option<String>,

    /// Use the files already in the data directory
    #[arg(long)]
    skip_fetch: bool,

    /// Skip the run when the upstream data has not changed
    #[arg(long)]
    check_updates: bool,

    /// Where rendered charts go: directory or memory
    #[arg(long)]
    output: Option<OutputMode>,

    /// Log the messages instead of sending them
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = ConfigLoader::load(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }
    if let Some(mode) = args.output {
        config.report.output_mode = mode;
    }
    config
        .validate_all()
        .context("Invalid command line overrides")?;

    darah_common::init_logging(config.logging.to_logging_config())
        .map_err(|e| anyhow::anyhow!("Failed to initialise logging: {}", e))?;

    info!("Starting Darah Report v{}", env!("CARGO_PKG_VERSION"));

    let options = RunOptions {
        skip_fetch: args.skip_fetch,
        check_updates: args.check_updates,
        dry_run: args.dry_run,
    };

    let pipeline = Pipeline::from_config(config, &options)?;
    match pipeline.run(&options).await {
        Ok(RunOutcome::UpToDate { hash }) => info!(%hash, "Upstream unchanged, nothing sent"),
        Ok(RunOutcome::Delivered { charts }) => info!(charts, "Report sent"),
        Err(e) => {
            error!("Report run failed: {:#}", anyhow::Error::from(e));
            std::process::exit(1);
        }
    }

    Ok(())
}
