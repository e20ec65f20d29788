//! Leadline realtime change infrastructure.
//!
//! This crate provides the in-process building blocks that connect lead
//! mutations to the notification dispatch flow:
//!
//! - [`ChangeFeed`] — publish/subscribe hub for lead row changes, backed by
//!   `tokio::sync::broadcast`.
//! - [`LeadChange`] — an update event carrying `{old, new}` row snapshots.
//! - [`AssignmentWatcher`] — per-user subscriber that detects first-time
//!   assignment transitions and fires the dispatch flow.
//! - [`AssignmentSink`] — the seam between detection and delivery, so the
//!   watcher can be exercised without a real dispatcher.

pub mod feed;
pub mod watcher;

pub use feed::{ChangeFeed, LeadChange};
pub use watcher::{AssignmentSink, AssignmentWatcher, WatcherHandle};
