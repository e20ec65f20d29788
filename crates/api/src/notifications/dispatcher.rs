//! The lead-assignment notification dispatcher.
//!
//! [`AssignmentNotifier`] is constructed once at startup and injected into
//! consumers (the realtime watchers and the bulk-assign handler). Per
//! dispatch it resolves the assignee's notification profile, formats the
//! message, attempts delivery on the alert, toast, and push channels, and
//! records a history row.
//!
//! Failure semantics: every channel catches and logs its own failure so a
//! broken channel never blocks its siblings, and the dispatch operations
//! never fail observably to the caller — they return a [`DispatchReport`]
//! the caller may inspect for telemetry but is free to drop.

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::ws::Message;
use chrono::Utc;
use serde_json::json;

use leadline_core::assignment::{assignment_notifications_enabled, AssignmentNotification};
use leadline_core::channels::{
    CHANNEL_ALERT, CHANNEL_PUSH, CHANNEL_TOAST, KIND_BULK_LEAD_ASSIGNMENT, KIND_LEAD_ASSIGNMENT,
};
use leadline_core::format::{
    assignment_body, assignment_message, assignment_tag, bulk_assignment_body,
    bulk_assignment_tag, bulk_assignment_title, ASSIGNMENT_HISTORY_TITLE, ASSIGNMENT_TITLE,
};
use leadline_core::links::{lead_detail_path, lead_list_path};
use leadline_core::roles::ROLE_TELECALLER;
use leadline_core::types::DbId;
use leadline_db::models::user::NotificationProfile;
use leadline_db::repositories::{NotificationHistoryRepo, UserRepo};
use leadline_db::DbPool;
use leadline_events::AssignmentSink;

use crate::notifications::push::{PushDelivery, PushError};
use crate::ws::WsManager;

/// How long the toast stays visible on the client, in milliseconds.
const TOAST_DURATION_MS: u64 = 8_000;

// ---------------------------------------------------------------------------
// DispatchReport
// ---------------------------------------------------------------------------

/// Why a dispatch ended the way it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The preference gate passed and every channel was attempted.
    Attempted,
    /// The assignee has assignment notifications disabled; nothing was sent.
    PreferencesDisabled,
    /// The assignee's profile could not be loaded; nothing was sent.
    RecipientUnavailable,
}

/// Result of one delivery attempt on one channel.
#[derive(Debug, Clone)]
pub struct ChannelAttempt {
    pub channel: &'static str,
    pub ok: bool,
    pub error: Option<String>,
}

impl ChannelAttempt {
    fn succeeded(channel: &'static str) -> Self {
        Self {
            channel,
            ok: true,
            error: None,
        }
    }

    fn failed(channel: &'static str, error: String) -> Self {
        Self {
            channel,
            ok: false,
            error: Some(error),
        }
    }
}

/// Telemetry record of one dispatch.
///
/// Inspecting the report is optional; the dispatch flow has already logged
/// everything worth logging by the time it returns.
#[derive(Debug, Clone)]
pub struct DispatchReport {
    pub outcome: DispatchOutcome,
    /// One entry per attempted channel, in attempt order.
    pub channels: Vec<ChannelAttempt>,
    /// Whether the history row was written.
    pub history_recorded: bool,
}

impl DispatchReport {
    fn skipped(outcome: DispatchOutcome) -> Self {
        Self {
            outcome,
            channels: Vec::new(),
            history_recorded: false,
        }
    }
}

// ---------------------------------------------------------------------------
// AssignmentNotifier
// ---------------------------------------------------------------------------

/// Dispatches lead-assignment notifications across all channels.
pub struct AssignmentNotifier {
    pool: DbPool,
    ws_manager: Arc<WsManager>,
    push: PushDelivery,
}

impl AssignmentNotifier {
    /// Create a new dispatcher with the given database pool, WebSocket
    /// manager, and push client.
    pub fn new(pool: DbPool, ws_manager: Arc<WsManager>, push: PushDelivery) -> Self {
        Self {
            pool,
            ws_manager,
            push,
        }
    }

    /// Run the full dispatch flow for one assignment.
    ///
    /// Never fails observably: lookup failures and disabled preferences
    /// abort quietly, channel failures are isolated, and the outcome is
    /// reported for optional inspection.
    pub async fn notify_assignment(&self, notification: &AssignmentNotification) -> DispatchReport {
        if let Err(outcome) = self.resolve_recipient(notification.assigned_to).await {
            return DispatchReport::skipped(outcome);
        }

        let user_id = notification.assigned_to;
        let body = assignment_body(notification);
        let url = lead_detail_path(ROLE_TELECALLER, notification.lead_id);
        let tag = assignment_tag(notification.lead_id);

        let mut channels = Vec::with_capacity(3);
        channels.push(
            self.send_alert(user_id, ASSIGNMENT_TITLE, &body, &tag)
                .await,
        );
        channels.push(
            self.send_toast(user_id, ASSIGNMENT_TITLE, &body, "View Lead", &url)
                .await,
        );
        channels.push(
            self.send_push(user_id, ASSIGNMENT_TITLE, &body, &url, push_data(notification))
                .await,
        );

        let history_recorded = self.record_history(notification).await;

        DispatchReport {
            outcome: DispatchOutcome::Attempted,
            channels,
            history_recorded,
        }
    }

    /// Run the dispatch flow for a batch of assignments to one user.
    ///
    /// Sends a single summary notification with a deep link to the lead
    /// list; per-lead details are intentionally not formatted in the bulk
    /// path, and no history row is written for the summary.
    pub async fn notify_bulk_assignment(
        &self,
        assignments: &[AssignmentNotification],
        assigned_to: DbId,
    ) -> DispatchReport {
        if let Err(outcome) = self.resolve_recipient(assigned_to).await {
            return DispatchReport::skipped(outcome);
        }

        let count = assignments.len();
        let title = bulk_assignment_title(count);
        let body = bulk_assignment_body(count);
        let url = lead_list_path(ROLE_TELECALLER);
        let tag = bulk_assignment_tag(Utc::now().timestamp_millis());

        let mut channels = Vec::with_capacity(3);
        channels.push(self.send_alert(assigned_to, &title, &body, &tag).await);
        channels.push(
            self.send_toast(assigned_to, &title, &body, "View Leads", &url)
                .await,
        );
        channels.push(
            self.send_push(assigned_to, &title, &body, &url, bulk_push_data(assignments))
                .await,
        );

        DispatchReport {
            outcome: DispatchOutcome::Attempted,
            channels,
            history_recorded: false,
        }
    }

    /// Fetch the assignee's notification profile and apply the preference
    /// gate.
    ///
    /// Returns the skip outcome when dispatch must not proceed: the profile
    /// fetch failed, the user does not exist, or assignment notifications
    /// are explicitly disabled. All three cases only log.
    async fn resolve_recipient(
        &self,
        user_id: DbId,
    ) -> Result<NotificationProfile, DispatchOutcome> {
        let profile = match UserRepo::notification_profile(&self.pool, user_id).await {
            Ok(Some(profile)) => profile,
            Ok(None) => {
                tracing::error!(user_id = %user_id, "Assigned user not found, dropping notification");
                return Err(DispatchOutcome::RecipientUnavailable);
            }
            Err(e) => {
                tracing::error!(
                    user_id = %user_id,
                    error = %e,
                    "Failed to fetch assigned user, dropping notification"
                );
                return Err(DispatchOutcome::RecipientUnavailable);
            }
        };

        if !assignment_notifications_enabled(&profile.notification_preferences) {
            tracing::debug!(user_id = %user_id, "Assignment notifications disabled by preference");
            return Err(DispatchOutcome::PreferencesDisabled);
        }

        Ok(profile)
    }

    /// Deliver the device-level alert over WebSocket.
    ///
    /// The browser client renders this as a system notification; the tag
    /// collapses repeated alerts for the same lead, and the interaction
    /// flag keeps it visible until dismissed.
    async fn send_alert(
        &self,
        user_id: DbId,
        title: &str,
        body: &str,
        tag: &str,
    ) -> ChannelAttempt {
        let payload = json!({
            "type": "alert",
            "title": title,
            "body": body,
            "tag": tag,
            "require_interaction": true,
        });
        let sent = self
            .ws_manager
            .send_to_user(user_id, Message::Text(payload.to_string().into()))
            .await;
        tracing::debug!(user_id = %user_id, connections = sent, "Alert dispatched");
        ChannelAttempt::succeeded(CHANNEL_ALERT)
    }

    /// Deliver the in-app toast over WebSocket, with an action that opens
    /// the linked view in a new context.
    async fn send_toast(
        &self,
        user_id: DbId,
        title: &str,
        body: &str,
        action_label: &str,
        action_url: &str,
    ) -> ChannelAttempt {
        let payload = json!({
            "type": "toast",
            "style": "success",
            "title": title,
            "body": body,
            "action": {
                "label": action_label,
                "url": action_url,
            },
            "duration_ms": TOAST_DURATION_MS,
        });
        let sent = self
            .ws_manager
            .send_to_user(user_id, Message::Text(payload.to_string().into()))
            .await;
        tracing::debug!(user_id = %user_id, connections = sent, "Toast dispatched");
        ChannelAttempt::succeeded(CHANNEL_TOAST)
    }

    /// Deliver the remote push. A failed or unconfigured push is logged and
    /// reported in the channel attempt; it is never retried.
    async fn send_push(
        &self,
        user_id: DbId,
        title: &str,
        body: &str,
        url: &str,
        data: serde_json::Value,
    ) -> ChannelAttempt {
        match self.push.send(user_id, title, body, url, data).await {
            Ok(()) => ChannelAttempt::succeeded(CHANNEL_PUSH),
            Err(PushError::NotConfigured) => {
                tracing::debug!(user_id = %user_id, "Push endpoint not configured, skipping push");
                ChannelAttempt::failed(CHANNEL_PUSH, PushError::NotConfigured.to_string())
            }
            Err(e) => {
                tracing::error!(user_id = %user_id, error = %e, "Failed to send push notification");
                ChannelAttempt::failed(CHANNEL_PUSH, e.to_string())
            }
        }
    }

    /// Persist the history row. Runs after all channel attempts; failure is
    /// logged and reported but rolls nothing back.
    async fn record_history(&self, notification: &AssignmentNotification) -> bool {
        let result = NotificationHistoryRepo::insert(
            &self.pool,
            notification.assigned_to,
            KIND_LEAD_ASSIGNMENT,
            ASSIGNMENT_HISTORY_TITLE,
            &assignment_message(notification),
            &history_data(notification),
        )
        .await;

        match result {
            Ok(_) => true,
            Err(e) => {
                tracing::error!(
                    user_id = %notification.assigned_to,
                    lead_id = %notification.lead_id,
                    error = %e,
                    "Failed to store notification history"
                );
                false
            }
        }
    }
}

#[async_trait]
impl AssignmentSink for AssignmentNotifier {
    async fn dispatch(&self, notification: AssignmentNotification) {
        let report = self.notify_assignment(&notification).await;
        tracing::debug!(
            lead_id = %notification.lead_id,
            user_id = %notification.assigned_to,
            outcome = ?report.outcome,
            "Assignment dispatch finished"
        );
    }
}

// ---------------------------------------------------------------------------
// Payload builders
// ---------------------------------------------------------------------------

/// Structured data carried by a single-assignment push.
fn push_data(notification: &AssignmentNotification) -> serde_json::Value {
    json!({
        "type": KIND_LEAD_ASSIGNMENT,
        "leadId": notification.lead_id,
        "leadName": notification.lead_name,
        "leadPhone": notification.lead_phone,
        "priority": notification.priority,
    })
}

/// Structured data carried by a bulk-assignment push: the batch size and
/// every lead id in the batch.
fn bulk_push_data(assignments: &[AssignmentNotification]) -> serde_json::Value {
    let lead_ids: Vec<DbId> = assignments.iter().map(|a| a.lead_id).collect();
    json!({
        "type": KIND_BULK_LEAD_ASSIGNMENT,
        "count": assignments.len(),
        "leadIds": lead_ids,
    })
}

/// Payload snapshot stored in the history row.
fn history_data(notification: &AssignmentNotification) -> serde_json::Value {
    json!({
        "leadId": notification.lead_id,
        "leadName": notification.lead_name,
        "leadPhone": notification.lead_phone,
        "assignedBy": notification.assigned_by,
        "priority": notification.priority,
        "loanAmount": notification.loan_amount,
        "loanType": notification.loan_type,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;

    fn notification(name: &str) -> AssignmentNotification {
        AssignmentNotification {
            lead_id: Uuid::new_v4(),
            lead_name: name.to_string(),
            lead_phone: "9876543210".to_string(),
            lead_email: None,
            assigned_to: Uuid::new_v4(),
            assigned_by: Some(Uuid::new_v4()),
            assigned_at: Utc::now(),
            priority: Some("high".to_string()),
            loan_amount: Some(200_000),
            loan_type: Some("Personal".to_string()),
        }
    }

    #[test]
    fn push_data_carries_lead_fields() {
        let n = notification("Asha Rao");
        let data = push_data(&n);

        assert_eq!(data["type"], KIND_LEAD_ASSIGNMENT);
        assert_eq!(data["leadId"], json!(n.lead_id));
        assert_eq!(data["leadName"], "Asha Rao");
        assert_eq!(data["leadPhone"], "9876543210");
        assert_eq!(data["priority"], "high");
    }

    #[test]
    fn bulk_push_data_carries_count_and_all_ids() {
        let batch = vec![notification("A"), notification("B"), notification("C")];
        let data = bulk_push_data(&batch);

        assert_eq!(data["type"], KIND_BULK_LEAD_ASSIGNMENT);
        assert_eq!(data["count"], 3);
        let ids = data["leadIds"].as_array().expect("leadIds is an array");
        assert_eq!(ids.len(), 3);
        for (value, n) in ids.iter().zip(&batch) {
            assert_eq!(*value, json!(n.lead_id));
        }
    }

    #[test]
    fn history_data_snapshots_the_payload() {
        let n = notification("Asha Rao");
        let data = history_data(&n);

        assert_eq!(data["leadId"], json!(n.lead_id));
        assert_eq!(data["assignedBy"], json!(n.assigned_by));
        assert_eq!(data["loanAmount"], 200_000);
        assert_eq!(data["loanType"], "Personal");
    }
}
