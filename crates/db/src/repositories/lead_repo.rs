//! Repository for the `leads` table.

use sqlx::PgPool;

use leadline_core::types::DbId;

use crate::models::lead::{Lead, UpdateLead};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, email, phone, company, status, priority, source, notes, \
                       loan_amount, loan_type, assigned_to, assigned_by, assigned_at, \
                       created_at, updated_at";

/// Provides CRUD operations for leads.
///
/// Mutations that change a row return `(old, new)` snapshots so callers can
/// publish change events carrying the before/after state.
pub struct LeadRepo;

impl LeadRepo {
    /// Find a lead by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Lead>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM leads WHERE id = $1");
        sqlx::query_as::<_, Lead>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List leads ordered by most recently created first, optionally
    /// filtered to one assignee.
    pub async fn list(
        pool: &PgPool,
        assigned_to: Option<DbId>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Lead>, sqlx::Error> {
        match assigned_to {
            Some(user_id) => {
                let query = format!(
                    "SELECT {COLUMNS} FROM leads \
                     WHERE assigned_to = $1 \
                     ORDER BY created_at DESC \
                     LIMIT $2 OFFSET $3"
                );
                sqlx::query_as::<_, Lead>(&query)
                    .bind(user_id)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(pool)
                    .await
            }
            None => {
                let query = format!(
                    "SELECT {COLUMNS} FROM leads \
                     ORDER BY created_at DESC \
                     LIMIT $1 OFFSET $2"
                );
                sqlx::query_as::<_, Lead>(&query)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(pool)
                    .await
            }
        }
    }

    /// Apply the admin edit form. Only non-`None` fields in `input` are
    /// applied.
    ///
    /// Returns `None` if no row with the given `id` exists, otherwise the
    /// `(old, new)` row snapshots.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateLead,
    ) -> Result<Option<(Lead, Lead)>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let select = format!("SELECT {COLUMNS} FROM leads WHERE id = $1 FOR UPDATE");
        let Some(old) = sqlx::query_as::<_, Lead>(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let update = format!(
            "UPDATE leads SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                phone = COALESCE($4, phone),
                company = COALESCE($5, company),
                status = COALESCE($6, status),
                priority = COALESCE($7, priority),
                source = COALESCE($8, source),
                notes = COALESCE($9, notes),
                loan_amount = COALESCE($10, loan_amount),
                loan_type = COALESCE($11, loan_type),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let new = sqlx::query_as::<_, Lead>(&update)
            .bind(id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.company)
            .bind(&input.status)
            .bind(&input.priority)
            .bind(&input.source)
            .bind(&input.notes)
            .bind(input.loan_amount)
            .bind(&input.loan_type)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some((old, new)))
    }

    /// Assign a lead to a user, stamping the assigner and the assignment
    /// time.
    ///
    /// Returns `None` if no row with the given `id` exists, otherwise the
    /// `(old, new)` row snapshots. Reassignment of an already-assigned lead
    /// is allowed; the change event consumers decide what counts as a
    /// first-time assignment.
    pub async fn assign(
        pool: &PgPool,
        id: DbId,
        assigned_to: DbId,
        assigned_by: DbId,
    ) -> Result<Option<(Lead, Lead)>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let select = format!("SELECT {COLUMNS} FROM leads WHERE id = $1 FOR UPDATE");
        let Some(old) = sqlx::query_as::<_, Lead>(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let update = format!(
            "UPDATE leads SET
                assigned_to = $2,
                assigned_by = $3,
                assigned_at = NOW(),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let new = sqlx::query_as::<_, Lead>(&update)
            .bind(id)
            .bind(assigned_to)
            .bind(assigned_by)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some((old, new)))
    }
}
