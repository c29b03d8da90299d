// ABOUTME: Persisted record and watermark store
// ABOUTME: One flat JSON record; merge-writes keep unrelated fields intact

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::PollError;
use crate::utils::{format_event_time, parse_event_time};

/// The single persisted record shared by the config resolver and the
/// watermark store.
///
/// `event_time` is the last-used filter input (user-facing, editable);
/// `last_event_time` is the watermark advanced automatically by successful
/// polls. Absent fields stay absent on disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_event_time: Option<String>,
}

impl StoredRecord {
    /// Load the record. A missing file is a normal bootstrap state and yields
    /// the default (all-empty) record.
    pub fn load(path: &Path) -> Result<Self, PollError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path).map_err(|e| PollError::Persistence {
            path: path.to_path_buf(),
            message: format!("failed to read record: {}", e),
        })?;
        serde_json::from_str(&contents).map_err(|e| {
            PollError::Config(format!("malformed record at {}: {}", path.display(), e))
        })
    }

    /// Overwrite the record atomically: write a sibling temp file, then
    /// rename it over the record.
    pub fn save(&self, path: &Path) -> Result<(), PollError> {
        let persist = |message: String| PollError::Persistence {
            path: path.to_path_buf(),
            message,
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| persist(format!("failed to create {}: {}", parent.display(), e)))?;
            }
        }
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| persist(format!("failed to serialize record: {}", e)))?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, contents)
            .map_err(|e| persist(format!("failed to write record: {}", e)))?;
        fs::rename(&tmp, path)
            .map_err(|e| persist(format!("failed to replace record: {}", e)))?;
        Ok(())
    }
}

/// Default location of the persisted record.
pub fn default_path() -> Result<PathBuf, PollError> {
    let home_dir = dirs::home_dir()
        .ok_or_else(|| PollError::Config("could not find home directory".to_string()))?;
    Ok(home_dir.join(".mysql-log-tail").join("state.json"))
}

/// Read the persisted watermark. An absent record or absent field yields
/// `None`, never an error.
pub fn read_watermark(path: &Path) -> Result<Option<NaiveDateTime>, PollError> {
    let record = StoredRecord::load(path)?;
    match record.last_event_time {
        Some(raw) => Ok(Some(parse_event_time(&raw)?)),
        None => Ok(None),
    }
}

/// Merge-write the watermark into the record, preserving every other field.
/// On a pristine installation this creates the record with only the
/// watermark populated.
pub fn write_watermark(path: &Path, watermark: NaiveDateTime) -> Result<(), PollError> {
    let mut record = StoredRecord::load(path)?;
    record.last_event_time = Some(format_event_time(watermark));
    record.save(path)
}

/// Advance the watermark monotonically: the record is only written when
/// `candidate` is strictly newer than the stored value. Returns the effective
/// watermark either way.
pub fn advance_watermark(path: &Path, candidate: NaiveDateTime) -> Result<NaiveDateTime, PollError> {
    match read_watermark(path)? {
        Some(current) if current >= candidate => Ok(current),
        _ => {
            write_watermark(path, candidate)?;
            Ok(candidate)
        }
    }
}

/// Remove the watermark, keeping the rest of the record.
pub fn clear_watermark(path: &Path) -> Result<(), PollError> {
    let mut record = StoredRecord::load(path)?;
    record.last_event_time = None;
    record.save(path)
}
