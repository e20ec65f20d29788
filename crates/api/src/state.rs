use std::sync::Arc;

use crate::config::ServerConfig;
use crate::notifications::AssignmentNotifier;
use crate::ws::WsManager;

use leadline_events::ChangeFeed;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: leadline_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// WebSocket connection manager (browser clients).
    pub ws_manager: Arc<WsManager>,
    /// In-process feed of lead row changes.
    pub change_feed: Arc<ChangeFeed>,
    /// The assignment notification dispatcher.
    pub notifier: Arc<AssignmentNotifier>,
}
