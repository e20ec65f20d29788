//! Lead entity model and DTOs.

use serde::Deserialize;
use serde::Serialize;
use sqlx::FromRow;
use validator::Validate;

use leadline_core::assignment::AssignmentNotification;
use leadline_core::types::{DbId, Timestamp};

/// Full lead row from the `leads` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Lead {
    pub id: DbId,
    pub name: String,
    pub email: Option<String>,
    pub phone: String,
    pub company: Option<String>,
    /// Pipeline status, e.g. `"new"`, `"contacted"`, `"closed"`.
    pub status: String,
    /// Priority label; `"medium"` is the default and is never surfaced in
    /// notification text.
    pub priority: Option<String>,
    pub source: Option<String>,
    pub notes: Option<String>,
    pub loan_amount: Option<i64>,
    pub loan_type: Option<String>,
    pub assigned_to: Option<DbId>,
    pub assigned_by: Option<DbId>,
    pub assigned_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Lead {
    /// Dispatch payload for this lead's current assignment, or `None` when
    /// the lead is unassigned.
    pub fn assignment_notification(&self) -> Option<AssignmentNotification> {
        let assigned_to = self.assigned_to?;
        Some(AssignmentNotification {
            lead_id: self.id,
            lead_name: self.name.clone(),
            lead_phone: self.phone.clone(),
            lead_email: self.email.clone(),
            assigned_to,
            assigned_by: self.assigned_by,
            assigned_at: self.assigned_at.unwrap_or(self.updated_at),
            priority: self.priority.clone(),
            loan_amount: self.loan_amount,
            loan_type: self.loan_type.clone(),
        })
    }
}

/// DTO for the admin lead-edit form. All fields are optional; only
/// non-`None` fields are applied.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateLead {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 4, max = 20))]
    pub phone: Option<String>,
    pub company: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub source: Option<String>,
    pub notes: Option<String>,
    #[validate(range(min = 0))]
    pub loan_amount: Option<i64>,
    pub loan_type: Option<String>,
}

/// DTO for assigning a single lead.
#[derive(Debug, Deserialize)]
pub struct AssignLead {
    pub assigned_to: DbId,
    pub assigned_by: DbId,
}

/// DTO for assigning a batch of leads to one user.
#[derive(Debug, Deserialize)]
pub struct BulkAssignLeads {
    pub lead_ids: Vec<DbId>,
    pub assigned_to: DbId,
    pub assigned_by: DbId,
}
