//! Unit tests for `WsManager`.
//!
//! These tests exercise the WebSocket connection manager directly, without
//! performing any HTTP upgrades. They verify add/remove semantics, per-user
//! delivery, and graceful shutdown behaviour.

use axum::extract::ws::Message;
use uuid::Uuid;

use leadline_api::ws::WsManager;

// ---------------------------------------------------------------------------
// Test: new manager starts with zero connections
// ---------------------------------------------------------------------------

#[tokio::test]
async fn new_manager_has_zero_connections() {
    let manager = WsManager::new();

    assert_eq!(manager.connection_count().await, 0);
}

// ---------------------------------------------------------------------------
// Test: add() increments the connection count
// ---------------------------------------------------------------------------

#[tokio::test]
async fn add_increments_connection_count() {
    let manager = WsManager::new();

    let _rx = manager.add("conn-1".to_string(), Uuid::new_v4()).await;

    assert_eq!(manager.connection_count().await, 1);
}

// ---------------------------------------------------------------------------
// Test: remove() decrements the connection count
// ---------------------------------------------------------------------------

#[tokio::test]
async fn remove_decrements_connection_count() {
    let manager = WsManager::new();

    let _rx = manager.add("conn-1".to_string(), Uuid::new_v4()).await;
    assert_eq!(manager.connection_count().await, 1);

    manager.remove("conn-1").await;
    assert_eq!(manager.connection_count().await, 0);
}

// ---------------------------------------------------------------------------
// Test: remove() with unknown ID is a no-op
// ---------------------------------------------------------------------------

#[tokio::test]
async fn remove_unknown_id_is_noop() {
    let manager = WsManager::new();

    let _rx = manager.add("conn-1".to_string(), Uuid::new_v4()).await;
    manager.remove("nonexistent").await;

    assert_eq!(manager.connection_count().await, 1);
}

// ---------------------------------------------------------------------------
// Test: send_to_user() targets only that user's connections
// ---------------------------------------------------------------------------

#[tokio::test]
async fn send_to_user_targets_only_that_user() {
    let manager = WsManager::new();
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    let mut alice_rx1 = manager.add("conn-1".to_string(), alice).await;
    let mut alice_rx2 = manager.add("conn-2".to_string(), alice).await;
    let mut bob_rx = manager.add("conn-3".to_string(), bob).await;

    let sent = manager
        .send_to_user(alice, Message::Text("hello".into()))
        .await;

    assert_eq!(sent, 2);
    assert!(alice_rx1.try_recv().is_ok());
    assert!(alice_rx2.try_recv().is_ok());
    assert!(bob_rx.try_recv().is_err());
}

// ---------------------------------------------------------------------------
// Test: shutdown_all() sends Close and clears all connections
// ---------------------------------------------------------------------------

#[tokio::test]
async fn shutdown_all_sends_close_and_clears() {
    let manager = WsManager::new();

    let mut rx1 = manager.add("conn-1".to_string(), Uuid::new_v4()).await;
    let mut rx2 = manager.add("conn-2".to_string(), Uuid::new_v4()).await;
    assert_eq!(manager.connection_count().await, 2);

    manager.shutdown_all().await;

    // Connection count should be zero after shutdown.
    assert_eq!(manager.connection_count().await, 0);

    // Both receivers should have received a Close message.
    assert!(matches!(rx1.try_recv(), Ok(Message::Close(_))));
    assert!(matches!(rx2.try_recv(), Ok(Message::Close(_))));
}
