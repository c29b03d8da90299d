// ABOUTME: Three-layer config resolution: caller overrides, persisted record, environment defaults
// ABOUTME: Persists the merged result so the next run starts from the last-used values

use std::env;
use std::net::ToSocketAddrs;
use std::path::Path;

use chrono::{Duration, Local};

use crate::error::PollError;
use crate::state::StoredRecord;
use crate::utils::EVENT_TIME_FORMAT;

pub const DEFAULT_PORT: &str = "3306";

/// Raw caller-supplied field values for one poll. Empty fields fall back to
/// the persisted record, then to environment-derived defaults.
///
/// This is the explicit parameter struct handed to the orchestrator; the core
/// never reaches into the presentation layer for input.
#[derive(Debug, Clone, Default)]
pub struct FieldValues {
    pub username: String,
    pub password: String,
    pub host: String,
    pub port: String,
    pub query_username: String,
    pub query_host: String,
    pub event_time: String,
}

/// Fully resolved configuration for one poll. Every field except `password`
/// is guaranteed non-empty.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveConfig {
    pub username: String,
    pub password: String,
    pub host: String,
    pub port: String,
    pub query_username: String,
    pub query_host: String,
    pub event_time: String,
}

/// Resolve the effective configuration for one poll.
///
/// Precedence per field, highest first: the trimmed caller value when
/// non-empty, the persisted record value, the environment default. The merged
/// result is persisted back immediately so a later cold start sees the
/// last-used values as its defaults; the watermark field is left untouched.
pub fn resolve(fields: &FieldValues, state_path: &Path) -> Result<EffectiveConfig, PollError> {
    let mut record = StoredRecord::load(state_path)?;

    let username = pick(&fields.username, record.username.as_deref(), default_username);
    // The password is the one field without a non-empty default; an empty
    // password is a valid credential.
    let password = pick(&fields.password, record.password.as_deref(), String::new);
    let host = pick(&fields.host, record.host.as_deref(), default_host);
    let port = pick(&fields.port, record.port.as_deref(), || {
        DEFAULT_PORT.to_string()
    });
    let query_username = pick(
        &fields.query_username,
        record.query_username.as_deref(),
        default_username,
    );
    let query_host = pick(&fields.query_host, record.query_host.as_deref(), default_host);
    let event_time = pick(
        &fields.event_time,
        record.event_time.as_deref(),
        default_event_time,
    );

    record.username = Some(username.clone());
    record.password = Some(password.clone());
    record.host = Some(host.clone());
    record.port = Some(port.clone());
    record.query_username = Some(query_username.clone());
    record.query_host = Some(query_host.clone());
    record.event_time = Some(event_time.clone());
    record.save(state_path)?;

    Ok(EffectiveConfig {
        username,
        password,
        host,
        port,
        query_username,
        query_host,
        event_time,
    })
}

fn pick(explicit: &str, stored: Option<&str>, default: impl FnOnce() -> String) -> String {
    let trimmed = explicit.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }
    match stored {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => default(),
    }
}

/// The current OS user.
pub fn default_username() -> String {
    env::var("USER")
        .or_else(|_| env::var("USERNAME"))
        .unwrap_or_else(|_| "root".to_string())
}

/// The local machine's resolved IPv4 address, as the log source would record
/// a session connecting from this host.
pub fn default_host() -> String {
    hostname::get()
        .ok()
        .and_then(|name| name.into_string().ok())
        .and_then(|name| (name.as_str(), 0u16).to_socket_addrs().ok())
        .and_then(|mut addrs| addrs.find(|addr| addr.is_ipv4()))
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "127.0.0.1".to_string())
}

/// Ten minutes ago in local time, second precision.
pub fn default_event_time() -> String {
    (Local::now() - Duration::minutes(10))
        .format(EVENT_TIME_FORMAT)
        .to_string()
}
