//! Record storage.
//!
//! The store owns records for their whole lifetime. It assigns ids and
//! knows nothing about signals; notification happens one layer up in
//! [`crate::models::RecordManager`].

pub mod memory;

use thiserror::Error;

use crate::models::Record;

pub use memory::MemoryStore;

/// Errors raised by a record store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("snapshot io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Storage backend for records.
pub trait RecordStore: Send + Sync {
    /// Insert a new record and return it with its assigned id.
    fn insert(&self, name: &str) -> Result<Record, StoreError>;

    /// Look up a record by id.
    fn get(&self, id: u64) -> Option<Record>;

    /// All records, ordered by id.
    fn all(&self) -> Vec<Record>;

    /// Number of stored records.
    fn count(&self) -> usize;
}
