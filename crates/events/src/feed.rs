//! In-process lead change feed backed by a `tokio::sync::broadcast` channel.
//!
//! [`ChangeFeed`] is the publish/subscribe hub for [`LeadChange`] events.
//! Lead mutation handlers publish a change after every row update; any
//! number of subscribers (one [`AssignmentWatcher`](crate::AssignmentWatcher)
//! per connected user) independently receive every event. It is designed to
//! be shared via `Arc<ChangeFeed>` across the application.

use chrono::Utc;
use serde::Serialize;
use tokio::sync::broadcast;

use leadline_core::types::Timestamp;
use leadline_db::models::lead::Lead;

// ---------------------------------------------------------------------------
// LeadChange
// ---------------------------------------------------------------------------

/// An update to a lead row, carrying the before and after snapshots.
///
/// Consumers compare `old` and `new` to decide whether the change is
/// relevant to them; the feed itself does no filtering.
#[derive(Debug, Clone, Serialize)]
pub struct LeadChange {
    /// Row state before the update.
    pub old: Lead,
    /// Row state after the update.
    pub new: Lead,
    /// When the change was published (UTC).
    pub occurred_at: Timestamp,
}

impl LeadChange {
    /// Create a change event from before/after snapshots, stamped now.
    pub fn new(old: Lead, new: Lead) -> Self {
        Self {
            old,
            new,
            occurred_at: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// ChangeFeed
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out feed of lead changes.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`LeadChange`].
pub struct ChangeFeed {
    sender: broadcast::Sender<LeadChange>,
}

impl ChangeFeed {
    /// Create a feed with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish a change to all current subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped;
    /// nothing durable depends on feed delivery.
    pub fn publish(&self, change: LeadChange) {
        // Ignore the SendError — it only means there are zero receivers.
        let _ = self.sender.send(change);
    }

    /// Subscribe to all changes published on this feed.
    pub fn subscribe(&self) -> broadcast::Receiver<LeadChange> {
        self.sender.subscribe()
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::watcher::test_support::assignment_change;

    #[tokio::test]
    async fn publish_and_receive_single_subscriber() {
        let feed = ChangeFeed::default();
        let mut rx = feed.subscribe();

        let user = uuid::Uuid::new_v4();
        feed.publish(assignment_change("Asha Rao", None, Some(user)));

        let received = rx.recv().await.expect("should receive the change");
        assert_eq!(received.old.id, received.new.id);
        assert!(received.old.assigned_to.is_none());
        assert_eq!(received.new.assigned_to, Some(user));
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_change() {
        let feed = ChangeFeed::default();
        let mut rx1 = feed.subscribe();
        let mut rx2 = feed.subscribe();

        feed.publish(assignment_change(
            "Ravi Kumar",
            None,
            Some(uuid::Uuid::new_v4()),
        ));

        let c1 = rx1.recv().await.expect("subscriber 1 should receive");
        let c2 = rx2.recv().await.expect("subscriber 2 should receive");

        assert_eq!(c1.new.name, "Ravi Kumar");
        assert_eq!(c2.new.name, "Ravi Kumar");
    }

    #[test]
    fn publish_with_no_subscribers_does_not_panic() {
        let feed = ChangeFeed::default();
        // No subscribers — this must not panic.
        feed.publish(assignment_change("Orphan", None, None));
    }
}
