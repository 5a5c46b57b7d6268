use crate::core::error::StorageError;
use crate::store::counter::CounterStore;
use std::fmt;
use std::path::PathBuf;
use tokio::sync::Mutex;

/// A sequential, zero-padded registrant identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PassId(u64);

impl PassId {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for PassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Padding stops constraining past 9999 ("10000"); no rollover
        // policy is defined upstream, so IDs simply keep growing.
        write!(f, "{:04}", self.0)
    }
}

struct CounterState {
    store: CounterStore,
    last: u64,
}

/// Mints Pass IDs from the durable counter.
///
/// All read-modify-write cycles go through a single async mutex, so two
/// overlapping allocation requests can never observe the same base value
/// and mint a duplicate ID.
pub struct PassIdAllocator {
    state: Mutex<CounterState>,
}

impl PassIdAllocator {
    /// Bind to the counter file and load the last issued value.
    pub fn open(path: PathBuf) -> Result<Self, StorageError> {
        let store = CounterStore::open(path);
        let last = store.load()?;

        Ok(Self {
            state: Mutex::new(CounterState { store, last }),
        })
    }

    /// Mint the next Pass ID.
    ///
    /// The incremented value is persisted before the in-memory counter
    /// advances, so a failed write never leaks an unsaved ID into a later
    /// response. Every successful call returns a new, distinct ID.
    pub async fn allocate(&self) -> Result<PassId, StorageError> {
        let mut state = self.state.lock().await;

        let next = state.last + 1;
        state.store.save(next)?;
        state.last = next;

        Ok(PassId(next))
    }

    /// Last issued counter value, 0 if nothing has been issued yet.
    pub async fn last_issued(&self) -> u64 {
        self.state.lock().await.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_sequential_ids_are_padded_and_increasing() {
        let temp_dir = TempDir::new().unwrap();
        let allocator = PassIdAllocator::open(temp_dir.path().join("counter.json")).unwrap();

        let mut issued = Vec::new();
        for _ in 0..5 {
            issued.push(allocator.allocate().await.unwrap().to_string());
        }

        assert_eq!(issued, vec!["0001", "0002", "0003", "0004", "0005"]);
    }

    #[tokio::test]
    async fn test_counter_survives_restart() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("counter.json");

        let allocator = PassIdAllocator::open(path.clone()).unwrap();
        allocator.allocate().await.unwrap();
        allocator.allocate().await.unwrap();
        drop(allocator);

        // A fresh allocator over the same file resumes where it left off
        let reopened = PassIdAllocator::open(path).unwrap();
        assert_eq!(reopened.last_issued().await, 2);
        assert_eq!(reopened.allocate().await.unwrap().to_string(), "0003");
    }

    #[tokio::test]
    async fn test_concurrent_allocations_are_distinct() {
        let temp_dir = TempDir::new().unwrap();
        let allocator =
            Arc::new(PassIdAllocator::open(temp_dir.path().join("counter.json")).unwrap());

        let mut handles = Vec::new();
        for _ in 0..16 {
            let allocator = Arc::clone(&allocator);
            handles.push(tokio::spawn(
                async move { allocator.allocate().await.unwrap() },
            ));
        }

        let mut seen = HashSet::new();
        for handle in handles {
            seen.insert(handle.await.unwrap().value());
        }

        // No duplicates, no gaps
        assert_eq!(seen.len(), 16);
        assert_eq!(seen, (1..=16).collect::<HashSet<u64>>());
    }

    #[tokio::test]
    async fn test_failed_persist_does_not_consume_an_id() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("counter.json");

        let allocator = PassIdAllocator::open(path.clone()).unwrap();
        allocator.allocate().await.unwrap();

        // Replace the counter file with a directory so the next save fails
        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();

        assert!(allocator.allocate().await.is_err());

        // The in-memory counter did not advance past the failed write
        assert_eq!(allocator.last_issued().await, 1);

        fs::remove_dir(&path).unwrap();
        assert_eq!(allocator.allocate().await.unwrap().to_string(), "0002");
    }

    #[tokio::test]
    async fn test_padding_stops_constraining_past_9999() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("counter.json");

        let store = CounterStore::open(path.clone());
        store.save(9999).unwrap();

        let allocator = PassIdAllocator::open(path).unwrap();
        assert_eq!(allocator.allocate().await.unwrap().to_string(), "10000");
    }

    #[test]
    fn test_pass_id_display_zero_pads_to_four_digits() {
        assert_eq!(PassId(1).to_string(), "0001");
        assert_eq!(PassId(42).to_string(), "0042");
        assert_eq!(PassId(9999).to_string(), "9999");
    }
}
