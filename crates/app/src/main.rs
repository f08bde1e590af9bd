use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

/// Turn receipt photos into structured records
#[derive(Parser)]
#[command(name = "slipscan")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recognize a receipt image and print the structured record
    Scan(commands::ScanArgs),

    /// Recognize an image and print its transcript
    Text(commands::TextArgs),

    /// Build a receipt record from an existing transcript
    Parse(commands::ParseArgs),

    /// Manage configuration
    Config(commands::ConfigArgs),
}

fn default_config_path() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("com", "slipscan", "SlipScan")
        .context("Failed to determine config directory")?;
    Ok(dirs.config_dir().join("config.toml"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let config_path = match cli.config {
        Some(path) => path,
        None => default_config_path()?,
    };

    match cli.command {
        Commands::Scan(args) => commands::scan(args, &config_path).await,
        Commands::Text(args) => commands::text(args, &config_path).await,
        Commands::Parse(args) => commands::parse(args),
        Commands::Config(args) => commands::config(args, &config_path),
    }
}
