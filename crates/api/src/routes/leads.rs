//! Route definitions for the `/leads` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::leads;
use crate::state::AppState;

/// Routes mounted at `/leads`.
///
/// ```text
/// GET    /                  -> list_leads
/// POST   /assign-bulk       -> assign_bulk
/// GET    /{id}              -> get_lead
/// PUT    /{id}              -> update_lead
/// POST   /{id}/assign       -> assign_lead
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(leads::list_leads))
        .route("/assign-bulk", post(leads::assign_bulk))
        .route("/{id}", get(leads::get_lead).put(leads::update_lead))
        .route("/{id}/assign", post(leads::assign_lead))
}
