// ABOUTME: Reads rows from mysql.general_log past a lower-bound event time
// ABOUTME: The connection is always closed before a result or error propagates

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use mysql_async::prelude::Queryable;
use mysql_async::{Conn, OptsBuilder, Row, Value};

use crate::config::EffectiveConfig;
use crate::error::PollError;
use crate::utils::parse_event_time;

/// One row from the general query log.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub event_time: NaiveDateTime,
    /// The raw statement text, empty when the log row carries none.
    pub statement: String,
}

/// Ascending order: the last row is the newest, and its event time becomes
/// the watermark candidate.
const GENERAL_LOG_QUERY: &str = "SELECT event_time, argument FROM mysql.general_log \
     WHERE event_time > ? AND user_host = ? ORDER BY event_time ASC";

/// Fetch log entries recorded strictly after `lower_bound` for the given
/// session identity.
///
/// Zero matching rows is a normal outcome and returns an empty vector.
pub async fn fetch_entries(
    config: &EffectiveConfig,
    user_host: &str,
    lower_bound: &str,
) -> Result<Vec<LogEntry>, PollError> {
    let port: u16 = config
        .port
        .trim()
        .parse()
        .map_err(|_| PollError::Config(format!("invalid port {:?}", config.port)))?;

    let opts = OptsBuilder::default()
        .ip_or_hostname(config.host.clone())
        .tcp_port(port)
        .user(Some(config.username.clone()))
        .pass(Some(config.password.clone()))
        .db_name(Some("mysql".to_string()));

    let mut conn = Conn::new(opts)
        .await
        .map_err(|source| PollError::Connection {
            host: config.host.clone(),
            port,
            source,
        })?;

    let outcome = run_query(&mut conn, user_host, lower_bound).await;

    // Close before propagating either way. A disconnect failure after a
    // successful fetch is not worth losing the rows over.
    if let Err(e) = conn.disconnect().await {
        tracing::warn!("failed to close the log source connection: {}", e);
    }

    outcome
}

async fn run_query(
    conn: &mut Conn,
    user_host: &str,
    lower_bound: &str,
) -> Result<Vec<LogEntry>, PollError> {
    let rows: Vec<Row> = conn
        .exec(GENERAL_LOG_QUERY, (lower_bound, user_host))
        .await
        .map_err(|e| PollError::Fetch(format!("general_log query failed: {}", e)))?;

    let mut entries = Vec::with_capacity(rows.len());
    for row in rows {
        entries.push(decode_row(&row)?);
    }
    Ok(entries)
}

fn decode_row(row: &Row) -> Result<LogEntry, PollError> {
    let raw_time: Value = row
        .get(0)
        .ok_or_else(|| PollError::Fetch("log row is missing the event_time column".to_string()))?;
    let raw_statement: Value = row
        .get(1)
        .ok_or_else(|| PollError::Fetch("log row is missing the argument column".to_string()))?;

    Ok(LogEntry {
        event_time: decode_event_time(raw_time)?,
        statement: decode_statement(raw_statement)?,
    })
}

fn decode_event_time(value: Value) -> Result<NaiveDateTime, PollError> {
    match value {
        Value::Date(year, month, day, hour, minute, second, micros) => {
            let date = NaiveDate::from_ymd_opt(i32::from(year), u32::from(month), u32::from(day));
            let time = NaiveTime::from_hms_micro_opt(
                u32::from(hour),
                u32::from(minute),
                u32::from(second),
                micros,
            );
            match (date, time) {
                (Some(date), Some(time)) => Ok(NaiveDateTime::new(date, time)),
                _ => Err(PollError::Fetch(
                    "log row carries an out-of-range event_time".to_string(),
                )),
            }
        }
        // Text-protocol servers hand timestamps back as bytes.
        Value::Bytes(raw) => {
            let text = String::from_utf8(raw)
                .map_err(|e| PollError::Fetch(format!("event_time is not valid UTF-8: {}", e)))?;
            parse_event_time(&text)
                .map_err(|_| PollError::Fetch(format!("unparseable event_time {:?}", text)))
        }
        other => Err(PollError::Fetch(format!(
            "unexpected event_time value: {:?}",
            other
        ))),
    }
}

fn decode_statement(value: Value) -> Result<String, PollError> {
    match value {
        Value::Bytes(raw) => String::from_utf8(raw)
            .map_err(|e| PollError::Fetch(format!("statement text is not valid UTF-8: {}", e))),
        Value::NULL => Ok(String::new()),
        other => Err(PollError::Fetch(format!(
            "unexpected statement value: {:?}",
            other
        ))),
    }
}
