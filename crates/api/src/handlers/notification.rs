//! Handlers for the `/notifications` resource: the history read/mark
//! surface consumed by the notification bell UI.
//!
//! The target user is passed explicitly via `user_id` query parameter;
//! there is no session identity in this service.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use leadline_core::error::CoreError;
use leadline_core::types::DbId;
use leadline_db::models::notification_history::NotificationHistory;
use leadline_db::repositories::NotificationHistoryRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /notifications`.
#[derive(Debug, Deserialize)]
pub struct NotificationQuery {
    /// The user whose history to read.
    pub user_id: DbId,
    /// If `true`, return only unread records. Defaults to `false`.
    pub unread_only: Option<bool>,
    /// Maximum number of results. Defaults to 50, capped at 100.
    pub limit: Option<i64>,
    /// Number of results to skip. Defaults to 0.
    pub offset: Option<i64>,
}

/// Query parameter selecting the acting user.
#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub user_id: DbId,
}

/// Maximum page size for history listing.
const MAX_LIMIT: i64 = 100;

/// Default page size for history listing.
const DEFAULT_LIMIT: i64 = 50;

/// GET /api/v1/notifications
///
/// List a user's notification history with optional filtering.
pub async fn list_notifications(
    State(state): State<AppState>,
    Query(params): Query<NotificationQuery>,
) -> AppResult<Json<DataResponse<Vec<NotificationHistory>>>> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
    let offset = params.offset.unwrap_or(0);
    let unread_only = params.unread_only.unwrap_or(false);

    let notifications = NotificationHistoryRepo::list_for_user(
        &state.pool,
        params.user_id,
        unread_only,
        limit,
        offset,
    )
    .await?;

    Ok(Json(DataResponse {
        data: notifications,
    }))
}

/// POST /api/v1/notifications/{id}/read
///
/// Mark a single record as read. Returns 204 No Content on success, or 404
/// if the record does not belong to the given user.
pub async fn mark_read(
    State(state): State<AppState>,
    Path(notification_id): Path<DbId>,
    Query(params): Query<UserQuery>,
) -> AppResult<impl IntoResponse> {
    let found =
        NotificationHistoryRepo::mark_read(&state.pool, notification_id, params.user_id).await?;

    if !found {
        return Err(CoreError::NotFound {
            entity: "Notification",
            id: notification_id,
        }
        .into());
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Response body for `POST /notifications/read-all`.
#[derive(Debug, serde::Serialize)]
pub struct MarkAllReadResult {
    pub marked_read: u64,
}

/// POST /api/v1/notifications/read-all
///
/// Mark all of a user's records as read. Returns the number of records
/// that were marked.
pub async fn mark_all_read(
    State(state): State<AppState>,
    Query(params): Query<UserQuery>,
) -> AppResult<Json<DataResponse<MarkAllReadResult>>> {
    let count = NotificationHistoryRepo::mark_all_read(&state.pool, params.user_id).await?;

    Ok(Json(DataResponse {
        data: MarkAllReadResult { marked_read: count },
    }))
}

/// Response body for `GET /notifications/unread-count`.
#[derive(Debug, serde::Serialize)]
pub struct UnreadCountResult {
    pub count: i64,
}

/// GET /api/v1/notifications/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    Query(params): Query<UserQuery>,
) -> AppResult<Json<DataResponse<UnreadCountResult>>> {
    let count = NotificationHistoryRepo::unread_count(&state.pool, params.user_id).await?;

    Ok(Json(DataResponse {
        data: UnreadCountResult { count },
    }))
}
