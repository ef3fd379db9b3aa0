//! Structured logging.
//!
//! # Responsibilities
//! - Initialize logging subsystem
//! - Describe the current thread for log fields
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - JSON format for production, pretty format for development
//! - `RUST_LOG` overrides the configured level

use std::thread;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, ObservabilityConfig};

/// Install the global subscriber. Later calls are ignored.
pub fn init(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "post_save_demo={level},tower_http={level}",
            level = config.log_level.to_ascii_lowercase()
        )
        .into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    let result = match config.log_format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).try_init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
    };

    if result.is_err() {
        tracing::debug!("Global subscriber already installed");
    }
}

/// Name and id of a thread, as shown in logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadLabel {
    pub name: String,
    pub id: String,
}

impl ThreadLabel {
    pub fn current() -> Self {
        let current = thread::current();
        Self {
            name: current.name().unwrap_or("<unnamed>").to_string(),
            id: format!("{:?}", current.id()),
        }
    }
}
