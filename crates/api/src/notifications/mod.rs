//! Lead-assignment notification dispatch.
//!
//! [`AssignmentNotifier`] runs the end-to-end dispatch flow: preference
//! gate, message formatting, best-effort delivery on the alert, toast, and
//! push channels, and the history write. [`PushDelivery`] is the HTTP
//! client for the remote push channel.

mod dispatcher;
mod push;

pub use dispatcher::{AssignmentNotifier, ChannelAttempt, DispatchOutcome, DispatchReport};
pub use push::{PushDelivery, PushError};
