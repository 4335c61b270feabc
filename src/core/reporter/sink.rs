//! Event sinks

use super::events::BulkEvent;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::debug;

/// Destination for job events
pub trait EventSink: Send + Sync {
    fn emit(&self, event: BulkEvent);
}

/// Forwards events into an unbounded channel, e.g. a control connection
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<BulkEvent>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::UnboundedSender<BulkEvent>) -> Self {
        Self { tx }
    }

    pub fn channel() -> (Self, mpsc::UnboundedReceiver<BulkEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl EventSink for ChannelSink {
    fn emit(&self, event: BulkEvent) {
        if self.tx.send(event).is_err() {
            debug!("Event receiver dropped, discarding event");
        }
    }
}

/// Keeps every event in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<BulkEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<BulkEvent> {
        self.events.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl EventSink for MemorySink {
    fn emit(&self, event: BulkEvent) {
        self.events.lock().push(event);
    }
}
