//! Beatstream CLI - Command-line interface
//!
//! Runs the audio API server or prints library pages from the terminal.

mod commands;

use std::path::PathBuf;

use anyhow::Context;
use beatstream_core::tracing_setup::{CliLogLevel, init_tracing};
use clap::Parser;

#[derive(Parser)]
#[command(name = "beatstream")]
#[command(about = "Audio library streaming server")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: commands::Commands,

    /// Console log level (RUST_LOG takes precedence)
    #[arg(long, value_enum, default_value_t = CliLogLevel::Info, global = true)]
    log_level: CliLogLevel,

    /// Directory for the full trace log of this run
    #[arg(long, global = true)]
    logs_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.log_level.as_tracing_level(), cli.logs_dir.as_deref())
        .map_err(|e| anyhow::anyhow!(e))
        .context("failed to initialize logging")?;

    commands::handle_command(cli.command).await
}
