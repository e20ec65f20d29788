//! User entity model and the dispatch-flow projection.

use serde::Serialize;
use sqlx::FromRow;

use leadline_core::types::{DbId, Timestamp};

/// Full user row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    /// Role name, e.g. `"admin"` or `"telecaller"`.
    pub role: String,
    pub is_active: bool,
    /// Free-form preference flag map; `assignment_notifications` gates the
    /// dispatch flow.
    pub notification_preferences: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// The subset of a user row the dispatch flow reads when resolving an
/// assignee: display name, contact email, and the preference flag map.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct NotificationProfile {
    pub full_name: String,
    pub email: String,
    pub notification_preferences: serde_json::Value,
}
