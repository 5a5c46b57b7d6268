use crate::core::error::StorageError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

/// On-disk record holding the last issued Pass ID value.
///
/// Canonical format is the JSON object form `{"lastPassId": n}`; the legacy
/// raw-integer text form is not supported.
#[derive(Debug, Serialize, Deserialize)]
struct CounterRecord {
    #[serde(rename = "lastPassId")]
    last_pass_id: u64,
}

/// Durable single-integer counter backing Pass ID allocation.
///
/// Provides no synchronization of its own; the allocator serializes all
/// read-modify-write cycles through a single lock.
pub struct CounterStore {
    path: PathBuf,
}

impl CounterStore {
    pub fn open(path: PathBuf) -> Self {
        Self { path }
    }

    /// Read the persisted counter value.
    ///
    /// A missing file is normal first-run state and reads as 0. Any other
    /// read failure, or unparseable content, is surfaced to the caller.
    pub fn load(&self) -> Result<u64, StorageError> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(StorageError::Read(e)),
        };

        let record: CounterRecord = serde_json::from_str(&data)?;
        Ok(record.last_pass_id)
    }

    /// Durably persist a new counter value, creating the file if absent.
    ///
    /// Writes a sibling temp file and renames it into place, so a crash
    /// mid-write can never leave a torn counter file behind.
    pub fn save(&self, value: u64) -> Result<(), StorageError> {
        let record = CounterRecord {
            last_pass_id: value,
        };
        let data = serde_json::to_string(&record)?;

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, data).map_err(StorageError::Write)?;
        fs::rename(&tmp, &self.path).map_err(StorageError::Write)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_file_is_zero() {
        let temp_dir = TempDir::new().unwrap();
        let store = CounterStore::open(temp_dir.path().join("counter.json"));

        assert_eq!(store.load().unwrap(), 0);
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let store = CounterStore::open(temp_dir.path().join("counter.json"));

        store.save(42).unwrap();
        assert_eq!(store.load().unwrap(), 42);
    }

    #[test]
    fn test_persisted_format_is_json_object() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("counter.json");
        let store = CounterStore::open(path.clone());

        store.save(7).unwrap();

        let data = fs::read_to_string(&path).unwrap();
        assert_eq!(data, r#"{"lastPassId":7}"#);
    }

    #[test]
    fn test_save_replaces_the_file_without_leaving_a_temp() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("counter.json");
        let store = CounterStore::open(path.clone());

        store.save(1).unwrap();
        store.save(2).unwrap();

        assert_eq!(store.load().unwrap(), 2);
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("counter.json");
        fs::write(&path, "not json").unwrap();

        let store = CounterStore::open(path);
        assert!(matches!(store.load(), Err(StorageError::Corrupt(_))));
    }

    #[test]
    fn test_raw_integer_form_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("counter.json");
        fs::write(&path, "42").unwrap();

        let store = CounterStore::open(path);
        assert!(store.load().is_err());
    }
}
