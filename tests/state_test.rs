use std::fs;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn test_watermark_command() {
    let temp_dir = tempdir().unwrap();
    let home_dir = temp_dir.path();
    let state_file = home_dir.join(".mysql-log-tail").join("state.json");

    let bin_path = env!("CARGO_BIN_EXE_mysql-log-tail");

    // `watermark get` before anything is persisted
    let output = Command::new(bin_path)
        .arg("watermark")
        .arg("get")
        .env("HOME", home_dir)
        .output()
        .expect("Failed to execute command");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Watermark is not set."));

    // `watermark set` on a pristine install creates the record
    let output = Command::new(bin_path)
        .arg("watermark")
        .arg("set")
        .arg("2024-01-01 10:00:00")
        .env("HOME", home_dir)
        .output()
        .expect("Failed to execute command");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Watermark set to: 2024-01-01 10:00:00"));

    // Verify state file content: only the watermark was written
    let state_content = fs::read_to_string(&state_file).unwrap();
    assert!(state_content.contains("last_event_time"));
    assert!(!state_content.contains("username"));

    // `watermark get` when the watermark is set
    let output = Command::new(bin_path)
        .arg("watermark")
        .arg("get")
        .env("HOME", home_dir)
        .output()
        .expect("Failed to execute command");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Current watermark: 2024-01-01 10:00:00"));

    // `watermark clear`
    let output = Command::new(bin_path)
        .arg("watermark")
        .arg("clear")
        .env("HOME", home_dir)
        .output()
        .expect("Failed to execute command");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Watermark cleared."));

    let state_content = fs::read_to_string(&state_file).unwrap();
    assert!(!state_content.contains("last_event_time"));
}

#[test]
fn test_watermark_set_rejects_invalid_timestamp() {
    let temp_dir = tempdir().unwrap();
    let home_dir = temp_dir.path();

    let bin_path = env!("CARGO_BIN_EXE_mysql-log-tail");

    let output = Command::new(bin_path)
        .arg("watermark")
        .arg("set")
        .arg("not a timestamp")
        .env("HOME", home_dir)
        .output()
        .expect("Failed to execute command");
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid event time"));

    // A rejected set must not create the record
    let state_file = home_dir.join(".mysql-log-tail").join("state.json");
    assert!(!state_file.exists());
}

#[test]
fn test_config_show_empty() {
    let temp_dir = tempdir().unwrap();
    let home_dir = temp_dir.path();

    let bin_path = env!("CARGO_BIN_EXE_mysql-log-tail");

    let output = Command::new(bin_path)
        .arg("config")
        .arg("show")
        .env("HOME", home_dir)
        .output()
        .expect("Failed to execute command");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No persisted configuration yet."));
}

#[test]
fn test_config_show_masks_password() {
    let temp_dir = tempdir().unwrap();
    let home_dir = temp_dir.path();
    let state_dir = home_dir.join(".mysql-log-tail");
    fs::create_dir_all(&state_dir).unwrap();
    fs::write(
        state_dir.join("state.json"),
        r#"{"username":"alice","password":"hunter2","host":"10.0.0.1"}"#,
    )
    .unwrap();

    let bin_path = env!("CARGO_BIN_EXE_mysql-log-tail");

    let output = Command::new(bin_path)
        .arg("config")
        .arg("show")
        .env("HOME", home_dir)
        .output()
        .expect("Failed to execute command");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("username: alice"));
    assert!(stdout.contains("password: ***"));
    assert!(!stdout.contains("hunter2"));
    assert!(stdout.contains("host: 10.0.0.1"));
    assert!(stdout.contains("port: (not set)"));
}

#[test]
fn test_state_file_flag_overrides_default_location() {
    let temp_dir = tempdir().unwrap();
    let state_file = temp_dir.path().join("elsewhere.json");

    let bin_path = env!("CARGO_BIN_EXE_mysql-log-tail");

    let output = Command::new(bin_path)
        .arg("watermark")
        .arg("set")
        .arg("2024-01-01 10:00:00")
        .arg("--state-file")
        .arg(&state_file)
        .env("HOME", temp_dir.path())
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success());

    assert!(state_file.exists());
    assert!(!temp_dir.path().join(".mysql-log-tail").exists());
}
