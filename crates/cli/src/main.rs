//! Command-line entry point for inspecting and editing character sheets.
mod commands;
mod config;
mod edit;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{EditSheet, Show};
use config::CliConfig;
use std::path::PathBuf;

/// Inspect and edit character sheet stats
#[derive(Parser)]
#[command(name = "stat-cli")]
#[command(about = "Inspect and edit character sheet stats", long_about = None)]
#[command(version)]
struct Cli {
    /// Sheet file (RON). Falls back to STAT_SHEET_PATH
    #[arg(long, global = true)]
    sheet: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print stats and totals
    Show(Show),

    /// Apply edits, then print stats and totals
    Edit(EditSheet),
}

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = CliConfig::from_env().with_overrides(cli.sheet, None, None, None)?;

    match cli.command {
        Command::Show(cmd) => cmd.execute(&config),
        Command::Edit(cmd) => cmd.execute(config),
    }
}
