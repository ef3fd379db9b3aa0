//! Model signals.
//!
//! # Data Flow
//! ```text
//! RecordManager::create
//!     → store insert
//!     → Signal<PostSave>::send
//!         inline:     each receiver runs on the caller's thread, in order
//!         background: each receiver runs on a spawned signal-worker thread
//! ```
//!
//! # Design Decisions
//! - No global registry: the owner of a `Signal` connects its receivers
//! - Sender filtering is the event type itself
//! - Dispatch mode is configuration, defaulting to inline

pub mod dispatcher;
pub mod receivers;

use thiserror::Error;

pub use dispatcher::{ReceiverId, Signal};
pub use receivers::SlowReceiver;

/// Errors raised while dispatching a signal.
#[derive(Debug, Error)]
pub enum SignalError {
    #[error("receiver {receiver} failed: {message}")]
    Receiver { receiver: String, message: String },

    #[error("failed to spawn signal worker: {0}")]
    Spawn(#[source] std::io::Error),
}

impl SignalError {
    pub fn receiver(receiver: impl Into<String>, message: impl Into<String>) -> Self {
        SignalError::Receiver {
            receiver: receiver.into(),
            message: message.into(),
        }
    }
}

/// A callback connected to a [`Signal`].
pub trait Receiver<E>: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Handle one event.
    fn receive(&self, event: &E) -> Result<(), SignalError>;
}

/// Adapts a closure into a [`Receiver`].
pub struct FnReceiver<F> {
    name: String,
    f: F,
}

impl<F> FnReceiver<F> {
    pub fn new<E>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&E) -> Result<(), SignalError> + Send + Sync,
    {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<E, F> Receiver<E> for FnReceiver<F>
where
    F: Fn(&E) -> Result<(), SignalError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn receive(&self, event: &E) -> Result<(), SignalError> {
        (self.f)(event)
    }
}
