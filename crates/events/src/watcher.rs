//! Realtime assignment watcher.
//!
//! [`AssignmentWatcher`] subscribes to the [`ChangeFeed`](crate::ChangeFeed)
//! on behalf of a single user and fires the notification dispatch flow when
//! a lead is assigned to that user for the first time. Detection and
//! delivery are decoupled through [`AssignmentSink`], and each subscription
//! is an owned [`WatcherHandle`] with an explicit close operation.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use leadline_core::assignment::AssignmentNotification;
use leadline_core::types::DbId;

use crate::feed::LeadChange;

// ---------------------------------------------------------------------------
// AssignmentSink
// ---------------------------------------------------------------------------

/// Receiver of detected assignments.
///
/// Implementations must not fail observably; delivery problems are handled
/// (and logged) internally so the watcher can stay fire-and-forget.
#[async_trait]
pub trait AssignmentSink: Send + Sync {
    /// Run the dispatch flow for one detected assignment.
    async fn dispatch(&self, notification: AssignmentNotification);
}

// ---------------------------------------------------------------------------
// AssignmentWatcher
// ---------------------------------------------------------------------------

/// Watches the change feed for first-time assignments to one user.
///
/// A transition counts only when the previous assignee was empty AND the new
/// assignee equals the watched user. Reassignments away from another user and
/// unrelated field updates do not fire.
pub struct AssignmentWatcher {
    user_id: DbId,
    sink: Arc<dyn AssignmentSink>,
}

impl AssignmentWatcher {
    /// Create a watcher for the given user, delivering into `sink`.
    pub fn new(user_id: DbId, sink: Arc<dyn AssignmentSink>) -> Self {
        Self { user_id, sink }
    }

    /// Start the watch loop on a background task.
    ///
    /// The returned [`WatcherHandle`] owns the subscription: call
    /// [`close`](WatcherHandle::close) (or drop the handle) to tear it down.
    pub fn spawn(self, receiver: broadcast::Receiver<LeadChange>) -> WatcherHandle {
        let cancel = CancellationToken::new();
        let task = tokio::spawn(self.run(receiver, cancel.clone()));
        WatcherHandle {
            cancel,
            task: Some(task),
        }
    }

    /// Consume change events until cancelled or the feed closes.
    async fn run(self, mut receiver: broadcast::Receiver<LeadChange>, cancel: CancellationToken) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!(user_id = %self.user_id, "Assignment watcher closed");
                    break;
                }
                result = receiver.recv() => match result {
                    Ok(change) => self.handle_change(change),
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(
                            skipped = n,
                            user_id = %self.user_id,
                            "Assignment watcher lagged, some changes were not examined"
                        );
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        tracing::info!(
                            user_id = %self.user_id,
                            "Change feed closed, assignment watcher shutting down"
                        );
                        break;
                    }
                }
            }
        }
    }

    /// Fire the dispatch flow if the change is a first-time assignment to
    /// the watched user.
    ///
    /// Dispatch is fire-and-forget on its own task: the sink never fails
    /// observably and must not block the watch loop, so multiple detected
    /// transitions may be in flight concurrently.
    fn handle_change(&self, change: LeadChange) {
        if !is_first_assignment(&change, self.user_id) {
            return;
        }

        // The guard above ensures the new snapshot carries an assignee.
        let Some(notification) = change.new.assignment_notification() else {
            return;
        };
        tracing::info!(
            lead_id = %notification.lead_id,
            user_id = %self.user_id,
            "Lead assignment detected"
        );

        let sink = Arc::clone(&self.sink);
        tokio::spawn(async move {
            sink.dispatch(notification).await;
        });
    }
}

/// A first-time assignment: previous assignee empty, new assignee equal to
/// the watched user. Reassignment from another user intentionally does not
/// count.
fn is_first_assignment(change: &LeadChange, user_id: DbId) -> bool {
    change.old.assigned_to.is_none() && change.new.assigned_to == Some(user_id)
}

// ---------------------------------------------------------------------------
// WatcherHandle
// ---------------------------------------------------------------------------

/// Owned handle to a running [`AssignmentWatcher`] subscription.
pub struct WatcherHandle {
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl WatcherHandle {
    /// Stop watching and wait for the loop to exit.
    pub async fn close(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for WatcherHandle {
    fn drop(&mut self) {
        // Dropping the handle still tears the subscription down; close()
        // only adds the deterministic wait for loop exit.
        self.cancel.cancel();
    }
}

// ---------------------------------------------------------------------------
// Test support
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::Utc;
    use uuid::Uuid;

    use leadline_core::types::DbId;
    use leadline_db::models::lead::Lead;

    use crate::feed::LeadChange;

    pub fn lead_row(name: &str, assigned_to: Option<DbId>) -> Lead {
        Lead {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: None,
            phone: "9876543210".to_string(),
            company: None,
            status: "new".to_string(),
            priority: Some("medium".to_string()),
            source: None,
            notes: None,
            loan_amount: None,
            loan_type: None,
            assigned_to,
            assigned_at: assigned_to.map(|_| Utc::now()),
            assigned_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    /// A change event where only the assignee differs between snapshots.
    pub fn assignment_change(name: &str, from: Option<DbId>, to: Option<DbId>) -> LeadChange {
        let old = lead_row(name, from);
        let mut new = old.clone();
        new.assigned_to = to;
        new.assigned_at = to.map(|_| Utc::now());
        LeadChange::new(old, new)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::sync::mpsc;
    use tokio::time::timeout;
    use uuid::Uuid;

    use super::test_support::assignment_change;
    use super::*;
    use crate::feed::ChangeFeed;

    struct RecordingSink {
        tx: mpsc::UnboundedSender<AssignmentNotification>,
    }

    #[async_trait]
    impl AssignmentSink for RecordingSink {
        async fn dispatch(&self, notification: AssignmentNotification) {
            let _ = self.tx.send(notification);
        }
    }

    fn recording_sink() -> (
        Arc<RecordingSink>,
        mpsc::UnboundedReceiver<AssignmentNotification>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(RecordingSink { tx }), rx)
    }

    #[tokio::test]
    async fn first_assignment_dispatches_exactly_once() {
        let feed = ChangeFeed::default();
        let user = Uuid::new_v4();
        let (sink, mut rx) = recording_sink();

        let handle = AssignmentWatcher::new(user, sink).spawn(feed.subscribe());

        feed.publish(assignment_change("Asha Rao", None, Some(user)));

        let notification = timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("dispatch should fire")
            .expect("sink channel open");
        assert_eq!(notification.assigned_to, user);
        assert_eq!(notification.lead_name, "Asha Rao");

        // No second dispatch for a single change event.
        assert!(timeout(Duration::from_millis(100), rx.recv()).await.is_err());

        handle.close().await;
    }

    #[tokio::test]
    async fn reassignment_from_another_user_is_ignored() {
        let feed = ChangeFeed::default();
        let user = Uuid::new_v4();
        let previous = Uuid::new_v4();
        let (sink, mut rx) = recording_sink();

        let handle = AssignmentWatcher::new(user, sink).spawn(feed.subscribe());

        feed.publish(assignment_change("Ravi Kumar", Some(previous), Some(user)));

        assert!(timeout(Duration::from_millis(100), rx.recv()).await.is_err());

        handle.close().await;
    }

    #[tokio::test]
    async fn assignment_to_another_user_is_ignored() {
        let feed = ChangeFeed::default();
        let user = Uuid::new_v4();
        let other = Uuid::new_v4();
        let (sink, mut rx) = recording_sink();

        let handle = AssignmentWatcher::new(user, sink).spawn(feed.subscribe());

        feed.publish(assignment_change("Ravi Kumar", None, Some(other)));

        assert!(timeout(Duration::from_millis(100), rx.recv()).await.is_err());

        handle.close().await;
    }

    #[tokio::test]
    async fn unrelated_update_is_ignored() {
        let feed = ChangeFeed::default();
        let user = Uuid::new_v4();
        let (sink, mut rx) = recording_sink();

        let handle = AssignmentWatcher::new(user, sink).spawn(feed.subscribe());

        // Assignee unchanged on both sides of the update.
        feed.publish(assignment_change("Ravi Kumar", Some(user), Some(user)));

        assert!(timeout(Duration::from_millis(100), rx.recv()).await.is_err());

        handle.close().await;
    }

    #[tokio::test]
    async fn closed_watcher_stops_dispatching() {
        let feed = ChangeFeed::default();
        let user = Uuid::new_v4();
        let (sink, mut rx) = recording_sink();

        let handle = AssignmentWatcher::new(user, sink).spawn(feed.subscribe());
        handle.close().await;

        feed.publish(assignment_change("Asha Rao", None, Some(user)));

        assert!(timeout(Duration::from_millis(100), rx.recv()).await.is_err());
    }

    #[tokio::test]
    async fn payload_carries_lead_details() {
        let feed = ChangeFeed::default();
        let user = Uuid::new_v4();
        let (sink, mut rx) = recording_sink();

        let handle = AssignmentWatcher::new(user, sink).spawn(feed.subscribe());

        let mut change = assignment_change("Asha Rao", None, Some(user));
        change.new.priority = Some("high".to_string());
        change.new.loan_amount = Some(200_000);
        change.new.loan_type = Some("Personal".to_string());
        let lead_id = change.new.id;
        feed.publish(change);

        let notification = timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("dispatch should fire")
            .expect("sink channel open");
        assert_eq!(notification.lead_id, lead_id);
        assert_eq!(notification.priority.as_deref(), Some("high"));
        assert_eq!(notification.loan_amount, Some(200_000));
        assert_eq!(notification.loan_type.as_deref(), Some("Personal"));

        handle.close().await;
    }
}
