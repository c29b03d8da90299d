use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use crate::state::StoredRecord;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommands,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the persisted connection and filter values
    Show,
}

pub async fn command(args: ConfigArgs, state_path: PathBuf) -> Result<()> {
    match args.command {
        ConfigCommands::Show => {
            let record = StoredRecord::load(&state_path)
                .context("Failed to load the persisted record")?;
            if record == StoredRecord::default() {
                println!("No persisted configuration yet.");
                return Ok(());
            }
            let masked = record
                .password
                .as_deref()
                .map(|p| if p.is_empty() { "" } else { "***" });
            print_field("username", record.username.as_deref());
            print_field("password", masked);
            print_field("host", record.host.as_deref());
            print_field("port", record.port.as_deref());
            print_field("query_username", record.query_username.as_deref());
            print_field("query_host", record.query_host.as_deref());
            print_field("event_time", record.event_time.as_deref());
            print_field("last_event_time", record.last_event_time.as_deref());
        }
    }
    Ok(())
}

fn print_field(key: &str, value: Option<&str>) {
    match value {
        Some(value) => println!("{}: {}", key, value),
        None => println!("{}: (not set)", key),
    }
}
