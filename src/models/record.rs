//! The persisted record type.

use serde::{Deserialize, Serialize};

/// A stored record. `id` is assigned by the store on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: u64,
    pub name: String,
}

/// Event sent after a record has been written to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostSave {
    /// The record as stored.
    pub record: Record,
    /// True when the save inserted a new record.
    pub created: bool,
}

impl PostSave {
    pub fn created(record: Record) -> Self {
        Self {
            record,
            created: true,
        }
    }
}
