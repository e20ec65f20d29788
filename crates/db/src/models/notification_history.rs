//! Notification history entity model.

use serde::Serialize;
use sqlx::FromRow;

use leadline_core::types::{DbId, Timestamp};

/// A row from the `notification_history` table: the persisted audit entry
/// of one attempted notification.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct NotificationHistory {
    pub id: DbId,
    pub user_id: DbId,
    /// Notification kind, e.g. `"lead_assignment"`.
    pub kind: String,
    pub title: String,
    pub message: String,
    /// Structured payload snapshot (lead id, name, phone, assigner,
    /// priority, loan details).
    pub data: serde_json::Value,
    pub is_read: bool,
    pub read_at: Option<Timestamp>,
    pub created_at: Timestamp,
}
