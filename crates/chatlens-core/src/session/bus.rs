//! Broadcast bus distributing `SessionState` snapshots to push subscribers.
//!
//! Built on `tokio::sync::broadcast`. Delivery is fire-and-forget: publishing
//! with no subscribers is a no-op, and a subscriber that disconnects or lags
//! simply misses messages.

use chatlens_types::session::SessionState;
use tokio::sync::broadcast;

/// Multi-consumer bus for session state transitions.
///
/// Cloning the bus clones the sender, so every clone publishes to the same
/// subscriber set.
pub struct SessionBus {
    sender: broadcast::Sender<SessionState>,
}

impl SessionBus {
    /// Create a new bus with the given channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Create a receiver for all future transitions.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionState> {
        self.sender.subscribe()
    }

    /// Publish a state to all current subscribers.
    pub fn publish(&self, state: SessionState) {
        let _ = self.sender.send(state);
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for SessionBus {
    fn default() -> Self {
        Self::new(64)
    }
}

impl Clone for SessionBus {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl std::fmt::Debug for SessionBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionBus")
            .field("receiver_count", &self.sender.receiver_count())
            .finish()
    }
}

/// A connected push subscriber.
///
/// `snapshot` is the state at connect time; `receiver` yields every later
/// transition. Dropping the subscription disconnects it.
#[derive(Debug)]
pub struct Subscription {
    pub snapshot: SessionState,
    pub receiver: broadcast::Receiver<SessionState>,
}
