//! Integration tests for the dispatch flow's abort path.
//!
//! The pool points at an unreachable address, so the recipient lookup that
//! opens every dispatch fails. Per the delivery contract the flow must
//! swallow the failure: no panic, no channel invocations, no history write,
//! just a report the caller may inspect.

mod common;

use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::Utc;
use uuid::Uuid;

use leadline_api::notifications::{AssignmentNotifier, DispatchOutcome, PushDelivery};
use leadline_api::ws::WsManager;
use leadline_core::assignment::AssignmentNotification;

fn notification(assigned_to: Uuid) -> AssignmentNotification {
    AssignmentNotification {
        lead_id: Uuid::new_v4(),
        lead_name: "Asha Rao".to_string(),
        lead_phone: "9876543210".to_string(),
        lead_email: None,
        assigned_to,
        assigned_by: Some(Uuid::new_v4()),
        assigned_at: Utc::now(),
        priority: Some("high".to_string()),
        loan_amount: Some(200_000),
        loan_type: Some("Personal".to_string()),
    }
}

#[tokio::test]
async fn lookup_failure_aborts_without_channel_sends() {
    let ws_manager = Arc::new(WsManager::new());
    let notifier = AssignmentNotifier::new(
        common::unreachable_pool(),
        Arc::clone(&ws_manager),
        PushDelivery::new(None),
    );

    let user = Uuid::new_v4();
    // A live connection for the would-be recipient: it must stay silent.
    let mut rx = ws_manager.add("conn-1".to_string(), user).await;

    let report = notifier.notify_assignment(&notification(user)).await;

    assert_matches!(report.outcome, DispatchOutcome::RecipientUnavailable);
    assert!(report.channels.is_empty());
    assert!(!report.history_recorded);
    assert!(rx.try_recv().is_err(), "no channel message expected");
}

#[tokio::test]
async fn bulk_lookup_failure_aborts_without_channel_sends() {
    let ws_manager = Arc::new(WsManager::new());
    let notifier = AssignmentNotifier::new(
        common::unreachable_pool(),
        Arc::clone(&ws_manager),
        PushDelivery::new(None),
    );

    let user = Uuid::new_v4();
    let mut rx = ws_manager.add("conn-1".to_string(), user).await;

    let batch = vec![notification(user), notification(user), notification(user)];
    let report = notifier.notify_bulk_assignment(&batch, user).await;

    assert_matches!(report.outcome, DispatchOutcome::RecipientUnavailable);
    assert!(report.channels.is_empty());
    assert!(!report.history_recorded);
    assert!(rx.try_recv().is_err(), "no channel message expected");
}
