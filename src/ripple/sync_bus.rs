//! Typed publish/subscribe bus for cross-subsystem state propagation.
//!
//! The social-state cache and the live-room feature must not import each
//! other; facts like "user went online" or "follow status changed" travel
//! over this bus instead. Publishing is fire-and-forget: with no subscribers
//! it is a no-op, and a lagging subscriber never blocks the publisher.
//! Handlers must be idempotent and must not assume delivery order relative
//! to other event kinds.

use tokio::sync::broadcast;

/// Events queued per subscriber before the slowest one starts losing the
/// oldest entries.
const CHANNEL_CAPACITY: usize = 100;

/// A fact published on the sync bus. Payload shapes are compile-time checked
/// against this enum rather than carried in an untyped key-value bag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    UserOnlineChanged { user_id: i64, is_online: bool },
    FollowStatusChanged { user_id: i64, is_following: bool },
}

pub struct SyncBus {
    sender: broadcast::Sender<SyncEvent>,
}

impl SyncBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.sender.subscribe()
    }

    /// Fire-and-forget publish. `send` only errors when nobody is
    /// listening, in which case the event is simply dropped.
    pub fn publish(&self, event: SyncEvent) {
        if self.sender.send(event).is_err() {
            tracing::trace!(target: "ripple::sync_bus", "Sync event dropped, no subscribers");
        }
    }
}

impl Default for SyncBus {
    fn default() -> Self {
        Self::new()
    }
}
