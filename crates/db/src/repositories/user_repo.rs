//! Repository for the `users` table.

use sqlx::PgPool;

use leadline_core::types::DbId;

use crate::models::user::{NotificationProfile, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, full_name, email, phone, role, is_active, \
                       notification_preferences, created_at, updated_at";

/// Provides read operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Fetch the dispatch-flow projection for an assignee: display name,
    /// email, and the notification preference flag map.
    pub async fn notification_profile(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<NotificationProfile>, sqlx::Error> {
        sqlx::query_as::<_, NotificationProfile>(
            "SELECT full_name, email, notification_preferences \
             FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }
}
