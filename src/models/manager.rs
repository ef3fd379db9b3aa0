//! Record manager: the single write path for records.

use std::sync::Arc;
use thiserror::Error;

use crate::models::{PostSave, Record};
use crate::observability::metrics;
use crate::signals::{Signal, SignalError};
use crate::store::{RecordStore, StoreError};

/// Errors raised while creating a record.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("post_save dispatch failed: {0}")]
    Signal(#[from] SignalError),
}

/// Owns the record store and the post-save signal fired by every insert.
pub struct RecordManager {
    store: Arc<dyn RecordStore>,
    post_save: Signal<PostSave>,
}

impl RecordManager {
    pub fn new(store: Arc<dyn RecordStore>, post_save: Signal<PostSave>) -> Self {
        Self { store, post_save }
    }

    /// Insert a record, then send `post_save` for it.
    ///
    /// The record stays stored if a receiver fails.
    pub fn create(&self, name: &str) -> Result<Record, RecordError> {
        let record = self.store.insert(name)?;
        metrics::record_created();

        self.post_save.send(&PostSave::created(record.clone()))?;
        Ok(record)
    }

    pub fn all(&self) -> Vec<Record> {
        self.store.all()
    }

    pub fn count(&self) -> usize {
        self.store.count()
    }

    pub fn post_save(&self) -> &Signal<PostSave> {
        &self.post_save
    }
}
