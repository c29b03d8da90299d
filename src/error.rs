// ABOUTME: Typed error for the polling core
// ABOUTME: Four kinds: config, connection, fetch, persistence

use std::path::PathBuf;

/// Everything that can go wrong during one poll. Each variant renders as a
/// single human-readable message; none are retried automatically.
#[derive(Debug, thiserror::Error)]
pub enum PollError {
    /// Malformed persisted record or invalid field value.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Cannot reach or authenticate to the log source.
    #[error("cannot connect to {host}:{port}: {source}")]
    Connection {
        host: String,
        port: u16,
        #[source]
        source: mysql_async::Error,
    },

    /// Query execution or statement decode failure.
    #[error("fetching log entries failed: {0}")]
    Fetch(String),

    /// Cannot write the persisted record.
    #[error("cannot persist state to {}: {message}", .path.display())]
    Persistence { path: PathBuf, message: String },
}
