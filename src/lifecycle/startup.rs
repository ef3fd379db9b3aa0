//! Startup orchestration.
//!
//! # Responsibilities
//! - Open the record store (restoring a snapshot if configured)
//! - Build the post-save signal and connect its receivers
//!
//! # Design Decisions
//! - Fail fast: a corrupt snapshot is a startup error
//! - Receivers are connected before the signal is shared, never after

use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::{PostSave, RecordManager};
use crate::signals::{Signal, SlowReceiver};
use crate::store::{MemoryStore, RecordStore, StoreError};

/// `dispatch_uid` of the built-in slow receiver.
pub const SLOW_RECEIVER_UID: &str = "slow_post_save";

/// Everything the HTTP layer needs, wired from configuration.
pub struct Services {
    pub records: Arc<RecordManager>,
    pub handler: Arc<SlowReceiver>,
    pub store: MemoryStore,
}

/// Wire services with only the built-in receiver.
pub fn build_services(config: &AppConfig) -> Result<Services, StoreError> {
    build_services_with(config, |_| {})
}

/// Wire services, letting `connect` add receivers after the built-in one.
pub fn build_services_with<F>(config: &AppConfig, connect: F) -> Result<Services, StoreError>
where
    F: FnOnce(&mut Signal<PostSave>),
{
    let store = match &config.store.snapshot_path {
        Some(path) => MemoryStore::load_from_file(path)?,
        None => MemoryStore::new(None),
    };

    let handler = Arc::new(SlowReceiver::new(config.signals.handler_delay()));
    let mut post_save: Signal<PostSave> = Signal::new("post_save", config.signals.dispatch);
    post_save.connect_unique(SLOW_RECEIVER_UID, handler.clone());
    connect(&mut post_save);

    tracing::info!(
        dispatch = %config.signals.dispatch,
        receivers = post_save.receiver_count(),
        records = store.count(),
        "Services initialized"
    );

    let records = Arc::new(RecordManager::new(Arc::new(store.clone()), post_save));
    Ok(Services {
        records,
        handler,
        store,
    })
}
