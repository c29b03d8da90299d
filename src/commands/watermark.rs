use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use crate::state;
use crate::utils::{format_event_time, parse_event_time};

#[derive(Args)]
pub struct WatermarkArgs {
    #[command(subcommand)]
    command: WatermarkCommands,
}

#[derive(Subcommand)]
enum WatermarkCommands {
    /// Set the watermark to an explicit event time
    Set {
        /// `YYYY-MM-DD HH:MM:SS[.ffffff]`
        event_time: String,
    },
    /// Remove the watermark, keeping the rest of the record
    Clear,
    /// Show the current watermark
    Get,
}

pub async fn command(args: WatermarkArgs, state_path: PathBuf) -> Result<()> {
    match args.command {
        WatermarkCommands::Set { event_time } => {
            let parsed = parse_event_time(&event_time)?;
            state::write_watermark(&state_path, parsed).context("Failed to save the watermark")?;
            println!("Watermark set to: {}", format_event_time(parsed));
        }
        WatermarkCommands::Clear => {
            state::clear_watermark(&state_path).context("Failed to save the watermark")?;
            println!("Watermark cleared.");
        }
        WatermarkCommands::Get => {
            let watermark =
                state::read_watermark(&state_path).context("Failed to load the watermark")?;
            match watermark {
                Some(watermark) => {
                    println!("Current watermark: {}", format_event_time(watermark))
                }
                None => println!("Watermark is not set."),
            }
        }
    }
    Ok(())
}
