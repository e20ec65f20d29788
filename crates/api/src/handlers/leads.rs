//! Handlers for the `/leads` resource.
//!
//! Lead mutations publish a [`LeadChange`] on the change feed so the
//! per-user assignment watchers can react; the bulk-assign path instead
//! dispatches one summary notification directly.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use leadline_core::assignment::AssignmentNotification;
use leadline_core::error::CoreError;
use leadline_core::roles::ROLE_ADMIN;
use leadline_core::types::DbId;
use leadline_db::models::lead::{AssignLead, BulkAssignLeads, Lead, UpdateLead};
use leadline_db::repositories::{LeadRepo, UserRepo};
use leadline_events::LeadChange;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /leads`.
#[derive(Debug, Deserialize)]
pub struct LeadQuery {
    /// Restrict the listing to one assignee.
    pub assigned_to: Option<DbId>,
    /// Maximum number of results. Defaults to 50, capped at 100.
    pub limit: Option<i64>,
    /// Number of results to skip. Defaults to 0.
    pub offset: Option<i64>,
}

/// Maximum page size for lead listing.
const MAX_LIMIT: i64 = 100;

/// Default page size for lead listing.
const DEFAULT_LIMIT: i64 = 50;

/// GET /api/v1/leads
///
/// List leads, optionally filtered to one assignee.
pub async fn list_leads(
    State(state): State<AppState>,
    Query(params): Query<LeadQuery>,
) -> AppResult<Json<DataResponse<Vec<Lead>>>> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
    let offset = params.offset.unwrap_or(0);

    let leads = LeadRepo::list(&state.pool, params.assigned_to, limit, offset).await?;

    Ok(Json(DataResponse { data: leads }))
}

/// GET /api/v1/leads/{id}
pub async fn get_lead(
    State(state): State<AppState>,
    Path(lead_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Lead>>> {
    let lead = LeadRepo::find_by_id(&state.pool, lead_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Lead",
            id: lead_id,
        })?;

    Ok(Json(DataResponse { data: lead }))
}

/// PUT /api/v1/leads/{id}
///
/// Apply the admin edit form and publish the row change on the feed.
pub async fn update_lead(
    State(state): State<AppState>,
    Path(lead_id): Path<DbId>,
    Json(input): Json<UpdateLead>,
) -> AppResult<Json<DataResponse<Lead>>> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let (old, new) = LeadRepo::update(&state.pool, lead_id, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Lead",
            id: lead_id,
        })?;

    state.change_feed.publish(LeadChange::new(old, new.clone()));

    Ok(Json(DataResponse { data: new }))
}

/// POST /api/v1/leads/{id}/assign
///
/// Assign a lead to a telecaller and publish the row change on the feed.
/// Notification dispatch is driven by the assignee's watcher, so it fires
/// only while the assignee is connected — the same scope the client's
/// notification surface has.
pub async fn assign_lead(
    State(state): State<AppState>,
    Path(lead_id): Path<DbId>,
    Json(input): Json<AssignLead>,
) -> AppResult<Json<DataResponse<Lead>>> {
    ensure_admin(&state, input.assigned_by).await?;
    ensure_active_assignee(&state, input.assigned_to).await?;

    let (old, new) = LeadRepo::assign(&state.pool, lead_id, input.assigned_to, input.assigned_by)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Lead",
            id: lead_id,
        })?;

    state.change_feed.publish(LeadChange::new(old, new.clone()));

    Ok(Json(DataResponse { data: new }))
}

/// Response body for `POST /leads/assign-bulk`.
#[derive(Debug, serde::Serialize)]
pub struct BulkAssignResult {
    pub assigned: usize,
}

/// POST /api/v1/leads/assign-bulk
///
/// Assign a batch of leads to one telecaller and dispatch a single summary
/// notification, fire-and-forget. Per-lead changes are not published on the
/// feed here: the summary replaces the individual notifications the
/// watchers would otherwise produce.
pub async fn assign_bulk(
    State(state): State<AppState>,
    Json(input): Json<BulkAssignLeads>,
) -> AppResult<Json<DataResponse<BulkAssignResult>>> {
    if input.lead_ids.is_empty() {
        return Err(AppError::BadRequest("lead_ids must not be empty".into()));
    }

    ensure_admin(&state, input.assigned_by).await?;
    ensure_active_assignee(&state, input.assigned_to).await?;

    let mut assignments: Vec<AssignmentNotification> = Vec::with_capacity(input.lead_ids.len());
    for lead_id in &input.lead_ids {
        match LeadRepo::assign(&state.pool, *lead_id, input.assigned_to, input.assigned_by).await? {
            Some((_old, new)) => assignments.extend(new.assignment_notification()),
            None => {
                tracing::warn!(lead_id = %lead_id, "Skipping unknown lead in bulk assignment");
            }
        }
    }

    let assigned = assignments.len();
    let notifier = Arc::clone(&state.notifier);
    let assigned_to = input.assigned_to;
    tokio::spawn(async move {
        notifier
            .notify_bulk_assignment(&assignments, assigned_to)
            .await;
    });

    Ok(Json(DataResponse {
        data: BulkAssignResult { assigned },
    }))
}

/// Reject the operation unless `user_id` is an active admin.
async fn ensure_admin(state: &AppState, user_id: DbId) -> AppResult<()> {
    let user = UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: user_id,
        })?;

    if !user.is_active || user.role != ROLE_ADMIN {
        return Err(CoreError::Forbidden("only admins can assign leads".into()).into());
    }
    Ok(())
}

/// Reject the operation unless the assignee exists and is active.
async fn ensure_active_assignee(state: &AppState, user_id: DbId) -> AppResult<()> {
    let user = UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: user_id,
        })?;

    if !user.is_active {
        return Err(CoreError::Validation("assignee is deactivated".into()).into());
    }
    Ok(())
}
