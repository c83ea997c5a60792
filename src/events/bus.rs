//! Broadcast bus for publishing monitoring events to subscribed listeners.
//!
//! Delivery is best-effort and unordered across listeners: a slow receiver
//! drops the oldest buffered events rather than stalling the pipeline.

use tokio::sync::broadcast;

use super::errors::EventBusError;
use super::types::MonitorEvent;

/// Event bus for publishing and subscribing to monitoring events
#[derive(Debug)]
pub struct MonitorEventBus {
    sender: broadcast::Sender<MonitorEvent>,
}

impl MonitorEventBus {
    /// Create a new event bus buffering up to `capacity` events per receiver.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all subscribers.
    ///
    /// Returns the number of receivers the event reached. Publishing with no
    /// subscribers is reported as `NoSubscribers` so callers can ignore it —
    /// the pipeline treats delivery as best-effort.
    pub fn publish(&self, event: MonitorEvent) -> Result<usize, EventBusError> {
        self.sender
            .send(event)
            .map_err(|_| EventBusError::NoSubscribers)
    }

    /// Subscribe to events published after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<MonitorEvent> {
        self.sender.subscribe()
    }

    /// Number of currently attached receivers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    #[must_use]
    pub fn has_subscribers(&self) -> bool {
        self.subscriber_count() > 0
    }
}

impl Default for MonitorEventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

/// Map a broadcast receive error into the bus error type.
#[must_use]
pub fn map_recv_error(err: broadcast::error::RecvError) -> EventBusError {
    match err {
        broadcast::error::RecvError::Closed => EventBusError::Shutdown,
        broadcast::error::RecvError::Lagged(n) => EventBusError::ReceiverLagged(n),
    }
}
