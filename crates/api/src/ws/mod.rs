//! WebSocket infrastructure for real-time notification delivery.
//!
//! Provides connection management, heartbeat monitoring, and the HTTP
//! upgrade handler used by Axum routes. Every connection is bound to a
//! user; the alert and toast channels deliver through
//! [`WsManager::send_to_user`].

mod handler;
mod heartbeat;
pub mod manager;

pub use handler::ws_handler;
pub use heartbeat::start_heartbeat;
pub use manager::WsManager;
