//! CLI application for bank payment email extraction.

mod commands;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{batch, config, extract};

/// Bank payment extraction - pull the amount and sender out of bank alert emails
#[derive(Parser)]
#[command(name = "payex")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a payment from a single email
    ///
    /// Bodies larger than `extraction.max_body_bytes` (32 MiB by default) are
    /// rejected as an extraction exception and the command exits with 1.
    Extract(extract::ExtractArgs),

    /// Extract payments from many request files
    ///
    /// Files whose bodies exceed `extraction.max_body_bytes` (32 MiB by
    /// default) are reported with status `error`.
    Batch(batch::BatchArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    // Logs go to stderr; stdout carries the extraction output.
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Extract(args) => extract::run(args, cli.config.as_deref()).await,
        Commands::Batch(args) => batch::run(args, cli.config.as_deref())
            .await
            .map(|()| ExitCode::SUCCESS),
        Commands::Config(args) => config::run(args, cli.config.as_deref())
            .await
            .map(|()| ExitCode::SUCCESS),
    }
}
