pub mod health;
pub mod leads;
pub mod notification;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws                              WebSocket (notification delivery + watcher)
///
/// /leads                           list (GET), assign-bulk (POST)
/// /leads/{id}                      get (GET), update (PUT)
/// /leads/{id}/assign               assign (POST)
///
/// /notifications                   list history (GET)
/// /notifications/read-all          mark all read (POST)
/// /notifications/unread-count      unread count (GET)
/// /notifications/{id}/read         mark read (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/ws", get(ws::ws_handler))
        .nest("/leads", leads::router())
        .nest("/notifications", notification::router())
}
