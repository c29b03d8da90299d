// ABOUTME: Poll orchestrator: resolve config, fetch new rows, advance the watermark
// ABOUTME: One poll is a single synchronous unit; a failed poll leaves the watermark untouched

use std::path::Path;

use crate::config::{self, FieldValues};
use crate::error::PollError;
use crate::mysql::{fetch_entries, LogEntry};
use crate::state;
use crate::utils::format_event_time;

/// Outcome of one poll, handed to the presentation layer.
#[derive(Debug)]
pub struct PollResult {
    pub entries: Vec<LogEntry>,
    /// The effective watermark after the poll, formatted for display, when
    /// the poll returned at least one row.
    pub updated_watermark_display: Option<String>,
}

/// The composite session identity as the general log records it.
///
/// The shape, including the double space before the bracketed host, must
/// match the server's own `user_host` column byte for byte; any deviation
/// silently yields zero rows.
pub fn user_host_identifier(query_user: &str, query_host: &str) -> String {
    format!("{user}[{user}] @  [{host}]", user = query_user, host = query_host)
}

/// Run one complete poll: resolve the effective config, fetch entries past
/// the lower bound, and advance the persisted watermark from the result set.
pub async fn poll(fields: &FieldValues, state_path: &Path) -> Result<PollResult, PollError> {
    let effective = config::resolve(fields, state_path)?;

    let lower_bound = effective_lower_bound(&effective.event_time, state_path)?;
    let user_host = user_host_identifier(&effective.query_username, &effective.query_host);
    tracing::debug!(%lower_bound, %user_host, "polling general log");

    let entries = fetch_entries(&effective, &user_host, &lower_bound).await?;
    tracing::debug!(count = entries.len(), "fetched log entries");

    let updated_watermark_display = match entries.iter().map(|entry| entry.event_time).max() {
        Some(candidate) => {
            let watermark = state::advance_watermark(state_path, candidate)?;
            Some(format_event_time(watermark))
        }
        None => None,
    };

    Ok(PollResult {
        entries,
        updated_watermark_display,
    })
}

/// Resolution guarantees a non-empty event time; should that ever fail to
/// hold, fall back to the stored watermark, then the environment default.
fn effective_lower_bound(resolved: &str, state_path: &Path) -> Result<String, PollError> {
    if !resolved.trim().is_empty() {
        return Ok(resolved.trim().to_string());
    }
    match state::read_watermark(state_path)? {
        Some(watermark) => Ok(format_event_time(watermark)),
        None => Ok(config::default_event_time()),
    }
}
