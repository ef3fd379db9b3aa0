//! Built-in receivers.

use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::Duration;

use crate::models::PostSave;
use crate::observability::{logging, metrics};
use crate::signals::{Receiver, SignalError};

/// Post-save receiver that blocks its thread for a fixed delay.
///
/// Stands in for expensive post-processing. Logs the thread it was called
/// on so a reader can compare it with the thread that saved the record.
#[derive(Debug)]
pub struct SlowReceiver {
    delay: Duration,
    invocations: AtomicU64,
}

impl SlowReceiver {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            invocations: AtomicU64::new(0),
        }
    }

    /// Completed and in-flight calls so far.
    pub fn invocations(&self) -> u64 {
        self.invocations.load(Ordering::SeqCst)
    }
}

impl Receiver<PostSave> for SlowReceiver {
    fn name(&self) -> &str {
        "slow_post_save"
    }

    fn receive(&self, event: &PostSave) -> Result<(), SignalError> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        metrics::record_handler_invocation();

        let current = logging::ThreadLabel::current();
        tracing::info!(
            thread = %current.name,
            thread_id = %current.id,
            record_id = event.record.id,
            created = event.created,
            "Signal received"
        );

        thread::sleep(self.delay);

        tracing::info!(record_id = event.record.id, "Signal handler finished");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Record;
    use std::time::Instant;

    #[test]
    fn test_blocks_for_delay_and_counts() {
        let receiver = SlowReceiver::new(Duration::from_millis(50));
        let event = PostSave::created(Record {
            id: 1,
            name: "Test".into(),
        });

        let start = Instant::now();
        receiver.receive(&event).unwrap();
        receiver.receive(&event).unwrap();

        assert!(start.elapsed() >= Duration::from_millis(100));
        assert_eq!(receiver.invocations(), 2);
    }
}
