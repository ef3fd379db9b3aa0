//! In-memory record store with optional JSON snapshot persistence.

use dashmap::DashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::models::Record;
use crate::store::{RecordStore, StoreError};

/// A thread-safe record store backed by a `DashMap`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<DashMap<u64, Record>>,
    /// Last id handed out. Ids start at 1 and are never reused.
    last_id: Arc<AtomicU64>,
    snapshot_path: Option<PathBuf>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new(snapshot_path: Option<PathBuf>) -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            last_id: Arc::new(AtomicU64::new(0)),
            snapshot_path,
        }
    }

    /// Load from a snapshot file if it exists; otherwise start empty.
    ///
    /// The id counter resumes after the highest restored id.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let store = Self::new(Some(path.to_path_buf()));
        if path.exists() {
            let reader = BufReader::new(File::open(path)?);
            let records: Vec<Record> = serde_json::from_reader(reader)?;

            let max_id = records.iter().map(|r| r.id).max().unwrap_or(0);
            for record in records {
                store.inner.insert(record.id, record);
            }
            store.last_id.store(max_id, Ordering::SeqCst);
            tracing::info!(
                path = %path.display(),
                records = store.inner.len(),
                "Loaded records from snapshot"
            );
        }
        Ok(store)
    }

    /// Write all records to the snapshot file, if one is configured.
    pub fn save_to_file(&self) -> Result<(), StoreError> {
        if let Some(path) = &self.snapshot_path {
            let records = self.all();
            let writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(writer, &records)?;
            tracing::info!(
                path = %path.display(),
                records = records.len(),
                "Saved records to snapshot"
            );
        }
        Ok(())
    }

    pub fn snapshot_path(&self) -> Option<&Path> {
        self.snapshot_path.as_deref()
    }
}

impl RecordStore for MemoryStore {
    fn insert(&self, name: &str) -> Result<Record, StoreError> {
        let id = self.last_id.fetch_add(1, Ordering::SeqCst) + 1;
        let record = Record {
            id,
            name: name.to_string(),
        };
        self.inner.insert(id, record.clone());
        tracing::debug!(record_id = id, name = %name, "Record inserted");
        Ok(record)
    }

    fn get(&self, id: u64) -> Option<Record> {
        self.inner.get(&id).map(|r| r.value().clone())
    }

    fn all(&self) -> Vec<Record> {
        let mut records: Vec<Record> = self.inner.iter().map(|r| r.value().clone()).collect();
        records.sort_by_key(|r| r.id);
        records
    }

    fn count(&self) -> usize {
        self.inner.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::thread;

    #[test]
    fn test_insert_assigns_increasing_ids() {
        let store = MemoryStore::new(None);
        let a = store.insert("Test").unwrap();
        let b = store.insert("Other").unwrap();

        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(store.get(1).unwrap().name, "Test");
        assert!(store.get(3).is_none());
        assert_eq!(store.count(), 2);
    }

    #[test]
    fn test_concurrent_inserts_get_distinct_ids() {
        let store = MemoryStore::new(None);
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                thread::spawn(move || {
                    (0..25)
                        .map(|_| store.insert("Test").unwrap().id)
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let ids: HashSet<u64> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        assert_eq!(ids.len(), 200);
        assert_eq!(store.count(), 200);
        assert_eq!(store.all().last().unwrap().id, 200);
    }

    #[test]
    fn test_snapshot_round_trip_resumes_ids() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.json");

        let store = MemoryStore::new(Some(path.clone()));
        store.insert("Test").unwrap();
        store.insert("Test").unwrap();
        store.save_to_file().unwrap();

        let loaded = MemoryStore::load_from_file(&path).unwrap();
        assert_eq!(loaded.all(), store.all());

        let next = loaded.insert("Test").unwrap();
        assert_eq!(next.id, 3);
    }

    #[test]
    fn test_missing_snapshot_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemoryStore::load_from_file(dir.path().join("absent.json")).unwrap();
        assert_eq!(store.count(), 0);
        assert!(store.snapshot_path().is_some());
    }

    #[test]
    fn test_corrupt_snapshot_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = MemoryStore::load_from_file(&path).unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
    }
}
