//! Signal: an explicit, owned list of receivers for one event type.

use std::sync::Arc;
use std::thread;
use std::time::Instant;

use crate::config::DispatchMode;
use crate::observability::metrics;
use crate::signals::{Receiver, SignalError};

/// Handle returned by [`Signal::connect`], used to disconnect later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReceiverId(u64);

struct Connection<E> {
    id: ReceiverId,
    uid: Option<String>,
    receiver: Arc<dyn Receiver<E>>,
}

/// A signal for events of type `E`.
///
/// Receivers are connected while the owner is being built and called in
/// connection order on every [`send`](Signal::send).
pub struct Signal<E> {
    name: &'static str,
    mode: DispatchMode,
    connections: Vec<Connection<E>>,
    next_id: u64,
}

impl<E> Signal<E>
where
    E: Clone + Send + Sync + 'static,
{
    pub fn new(name: &'static str, mode: DispatchMode) -> Self {
        Self {
            name,
            mode,
            connections: Vec::new(),
            next_id: 0,
        }
    }

    pub fn mode(&self) -> DispatchMode {
        self.mode
    }

    pub fn receiver_count(&self) -> usize {
        self.connections.len()
    }

    /// Append a receiver.
    pub fn connect(&mut self, receiver: Arc<dyn Receiver<E>>) -> ReceiverId {
        self.push(None, receiver)
    }

    /// Append a receiver unless one is already connected under `uid`.
    ///
    /// Returns the id of the existing connection in that case.
    pub fn connect_unique(
        &mut self,
        uid: impl Into<String>,
        receiver: Arc<dyn Receiver<E>>,
    ) -> ReceiverId {
        let uid = uid.into();
        if let Some(existing) = self
            .connections
            .iter()
            .find(|c| c.uid.as_deref() == Some(uid.as_str()))
        {
            tracing::debug!(signal = self.name, uid = %uid, "Receiver already connected");
            return existing.id;
        }
        self.push(Some(uid), receiver)
    }

    fn push(&mut self, uid: Option<String>, receiver: Arc<dyn Receiver<E>>) -> ReceiverId {
        self.next_id += 1;
        let id = ReceiverId(self.next_id);
        tracing::debug!(
            signal = self.name,
            receiver = receiver.name(),
            "Receiver connected"
        );
        self.connections.push(Connection { id, uid, receiver });
        id
    }

    /// Remove a receiver. Returns false if it was not connected.
    pub fn disconnect(&mut self, id: ReceiverId) -> bool {
        let before = self.connections.len();
        self.connections.retain(|c| c.id != id);
        before != self.connections.len()
    }

    /// Dispatch `event` to every receiver.
    ///
    /// Inline: receivers run on the calling thread, in order, and the first
    /// error stops dispatch and is returned. Background: each receiver gets
    /// its own worker thread and errors are only logged.
    ///
    /// Returns the number of receivers the event was handed to.
    pub fn send(&self, event: &E) -> Result<usize, SignalError> {
        let start = Instant::now();
        let result = match self.mode {
            DispatchMode::Inline => self.send_inline(event),
            DispatchMode::Background => self.send_background(event),
        };
        metrics::record_signal_dispatch(self.mode.as_str(), start);
        result
    }

    fn send_inline(&self, event: &E) -> Result<usize, SignalError> {
        for conn in &self.connections {
            conn.receiver.receive(event).map_err(|e| {
                tracing::error!(
                    signal = self.name,
                    receiver = conn.receiver.name(),
                    error = %e,
                    "Receiver failed"
                );
                e
            })?;
        }
        Ok(self.connections.len())
    }

    fn send_background(&self, event: &E) -> Result<usize, SignalError> {
        for conn in &self.connections {
            let receiver = conn.receiver.clone();
            let event = event.clone();
            let signal = self.name;
            thread::Builder::new()
                .name("signal-worker".to_string())
                .spawn(move || {
                    if let Err(e) = receiver.receive(&event) {
                        tracing::error!(
                            signal,
                            receiver = receiver.name(),
                            error = %e,
                            "Background receiver failed"
                        );
                    }
                })
                .map_err(SignalError::Spawn)?;
        }
        Ok(self.connections.len())
    }
}
