//! Lead assignment notification payload and preference gating.

use serde::{Deserialize, Serialize};

use crate::types::{DbId, Timestamp};

/// Everything the dispatch flow needs to know about one assignment.
///
/// Built transiently per dispatch call, either by the realtime watcher from
/// a lead row snapshot or by the bulk-assign handler. Never persisted as-is;
/// a derived history record is persisted instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentNotification {
    pub lead_id: DbId,
    pub lead_name: String,
    pub lead_phone: String,
    pub lead_email: Option<String>,
    /// The user the lead was assigned to.
    pub assigned_to: DbId,
    /// The user who performed the assignment, when known.
    pub assigned_by: Option<DbId>,
    pub assigned_at: Timestamp,
    pub priority: Option<String>,
    pub loan_amount: Option<i64>,
    pub loan_type: Option<String>,
}

/// Whether the user's preference object allows assignment notifications.
///
/// The flag gates dispatch only when it is explicitly set to `false`;
/// a missing flag, a non-boolean value, or an empty preference object
/// all mean enabled.
pub fn assignment_notifications_enabled(preferences: &serde_json::Value) -> bool {
    preferences
        .get("assignment_notifications")
        .and_then(|v| v.as_bool())
        .unwrap_or(true)
}
