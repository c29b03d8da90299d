// ABOUTME: CLI entry point for mysql-log-tail
// ABOUTME: Parses commands and routes to the poll, config, and watermark handlers

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use mysql_log_tail::{commands, state};

#[derive(Parser)]
#[command(name = "mysql-log-tail")]
#[command(about = "Incremental MySQL general-log viewer", long_about = None)]
#[command(version)]
struct Cli {
    /// Set the log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    log: String,
    /// Path to the persisted record (defaults to ~/.mysql-log-tail/state.json)
    #[arg(long = "state-file", env = "MYSQL_LOG_TAIL_STATE_FILE", global = true)]
    state_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch and print log entries recorded since the last poll
    Poll(commands::poll::PollArgs),
    /// Inspect the persisted connection and filter values
    Config(commands::config::ConfigArgs),
    /// Inspect or adjust the watermark that bounds the next poll
    Watermark(commands::watermark::WatermarkArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // 1. RUST_LOG environment variable has highest precedence
    // 2. --log flag is used if RUST_LOG is not set
    // 3. Default to "info" if neither are provided
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(cli.log.clone()));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let state_path = match cli.state_file {
        Some(path) => path,
        None => state::default_path()?,
    };

    match cli.command {
        Commands::Poll(args) => commands::poll::command(args, state_path).await,
        Commands::Config(args) => commands::config::command(args, state_path).await,
        Commands::Watermark(args) => commands::watermark::command(args, state_path).await,
    }
}
