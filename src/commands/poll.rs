// ABOUTME: The poll command: one complete fetch-and-render cycle
// ABOUTME: Renders entries as plain text; truncation is presentation-only

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::config::FieldValues;
use crate::poll::{poll, PollResult};
use crate::utils::format_event_time;

const MAX_STATEMENT_CHARS: usize = 1000;

#[derive(Args)]
pub struct PollArgs {
    /// MySQL username for the connection
    #[arg(long)]
    username: Option<String>,
    /// MySQL password for the connection
    #[arg(long)]
    password: Option<String>,
    /// Host IP of the log source
    #[arg(long)]
    host: Option<String>,
    /// Port of the log source
    #[arg(long)]
    port: Option<String>,
    /// Username whose audited statements to retrieve
    #[arg(long)]
    query_username: Option<String>,
    /// Host the audited session connected from
    #[arg(long)]
    query_host: Option<String>,
    /// Earliest event time to include, exclusive (`YYYY-MM-DD HH:MM:SS[.ffffff]`)
    #[arg(long)]
    event_time: Option<String>,
    /// Print statements in full instead of truncating long ones
    #[arg(long)]
    full: bool,
}

pub async fn command(args: PollArgs, state_path: PathBuf) -> Result<()> {
    let fields = FieldValues {
        username: args.username.unwrap_or_default(),
        password: args.password.unwrap_or_default(),
        host: args.host.unwrap_or_default(),
        port: args.port.unwrap_or_default(),
        query_username: args.query_username.unwrap_or_default(),
        query_host: args.query_host.unwrap_or_default(),
        event_time: args.event_time.unwrap_or_default(),
    };

    let result = poll(&fields, &state_path).await?;
    render(&result, args.full);
    Ok(())
}

fn render(result: &PollResult, full: bool) {
    if result.entries.is_empty() {
        println!("No new log entries.");
        return;
    }
    for entry in &result.entries {
        println!(
            "{}  {}",
            format_event_time(entry.event_time),
            display_statement(&entry.statement, full)
        );
    }
    if let Some(watermark) = &result.updated_watermark_display {
        println!();
        println!("Watermark advanced to: {}", watermark);
    }
}

fn display_statement(statement: &str, full: bool) -> String {
    if statement.is_empty() {
        return "(empty statement)".to_string();
    }
    if !full && statement.chars().count() > MAX_STATEMENT_CHARS {
        let truncated: String = statement.chars().take(MAX_STATEMENT_CHARS).collect();
        return format!("{}...", truncated);
    }
    statement.to_string()
}
