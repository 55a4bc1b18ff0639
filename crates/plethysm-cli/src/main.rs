//! Plethysm CLI - PPG signal quality scoring from the command line.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "plethysm")]
#[command(author, version, about = "PPG signal quality index scoring", long_about = None)]
struct Cli {
    /// Settings file (TOML); built-in defaults when omitted
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a single PPG log
    Score(commands::score::ScoreArgs),

    /// Score every recording under a data directory and write reports
    Batch(commands::batch::BatchArgs),

    /// Generate a synthetic PPG log
    Generate(commands::generate::GenerateArgs),

    /// Print or write the effective settings
    Config(commands::config::ConfigArgs),
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = commands::load_settings(cli.config.as_deref())?;

    match cli.command {
        Commands::Score(args) => commands::score::run(args, settings),
        Commands::Batch(args) => commands::batch::run(args, settings),
        Commands::Generate(args) => commands::generate::run(args),
        Commands::Config(args) => commands::config::run(args, &settings),
    }
}
