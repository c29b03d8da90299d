// ABOUTME: Live-database poll tests against a general_log-enabled MySQL server
// ABOUTME: Gated on TEST_MYSQL_* environment variables; run with --ignored

use std::env;

use mysql_log_tail::config::FieldValues;
use mysql_log_tail::error::PollError;
use mysql_log_tail::poll::poll;
use mysql_log_tail::state;
use tempfile::tempdir;

/// Helper to get connection fields from the environment
fn get_test_fields() -> Option<FieldValues> {
    let host = env::var("TEST_MYSQL_HOST").ok()?;
    let username = env::var("TEST_MYSQL_USER").ok()?;
    let password = env::var("TEST_MYSQL_PASSWORD").unwrap_or_default();
    let port = env::var("TEST_MYSQL_PORT").unwrap_or_else(|_| "3306".to_string());
    Some(FieldValues {
        username,
        password,
        host,
        port,
        ..Default::default()
    })
}

/// Test: a poll against a session with no matching entries is a normal,
/// empty outcome that leaves the watermark unset
#[tokio::test]
#[ignore]
async fn test_poll_with_no_matching_entries_is_not_an_error() {
    let mut fields = get_test_fields().expect("TEST_MYSQL_HOST and TEST_MYSQL_USER must be set");
    fields.query_username = "no_such_audited_user".to_string();
    fields.query_host = "203.0.113.9".to_string();

    let temp = tempdir().unwrap();
    let state_path = temp.path().join("state.json");

    let result = poll(&fields, &state_path).await.expect("poll failed");
    assert!(result.entries.is_empty());
    assert!(result.updated_watermark_display.is_none());
    assert!(state::read_watermark(&state_path).unwrap().is_none());
}

/// Test: a poll for the connecting session itself returns decoded statements
/// and advances the watermark to the newest entry
#[tokio::test]
#[ignore]
async fn test_poll_advances_watermark_from_result_set() {
    let mut fields = get_test_fields().expect("TEST_MYSQL_HOST and TEST_MYSQL_USER must be set");
    fields.query_username =
        env::var("TEST_MYSQL_QUERY_USER").expect("TEST_MYSQL_QUERY_USER must be set");
    fields.query_host =
        env::var("TEST_MYSQL_QUERY_HOST").expect("TEST_MYSQL_QUERY_HOST must be set");
    // Look far enough back to catch the audited session's recent statements.
    fields.event_time = "2000-01-01 00:00:00".to_string();

    let temp = tempdir().unwrap();
    let state_path = temp.path().join("state.json");

    let result = poll(&fields, &state_path).await.expect("poll failed");
    assert!(!result.entries.is_empty(), "expected audited statements");

    let newest = result
        .entries
        .iter()
        .map(|entry| entry.event_time)
        .max()
        .unwrap();
    assert_eq!(state::read_watermark(&state_path).unwrap(), Some(newest));
    assert!(result.updated_watermark_display.is_some());

    // Resuming from the reflected watermark only returns newer rows, and the
    // watermark itself never moves backward.
    fields.event_time = result.updated_watermark_display.clone().unwrap();
    let second = poll(&fields, &state_path).await.expect("second poll failed");
    assert!(second.entries.iter().all(|entry| entry.event_time > newest));
    let after = state::read_watermark(&state_path).unwrap().unwrap();
    assert!(after >= newest);
}

/// Test: bad credentials surface as a connection error and leave no watermark
#[tokio::test]
#[ignore]
async fn test_poll_with_bad_credentials_is_a_connection_error() {
    let mut fields = get_test_fields().expect("TEST_MYSQL_HOST and TEST_MYSQL_USER must be set");
    fields.username = "no_such_user_xyz".to_string();
    fields.password = "definitely-wrong".to_string();

    let temp = tempdir().unwrap();
    let state_path = temp.path().join("state.json");

    let err = poll(&fields, &state_path).await.unwrap_err();
    assert!(matches!(err, PollError::Connection { .. }));
    assert!(state::read_watermark(&state_path).unwrap().is_none());
}
