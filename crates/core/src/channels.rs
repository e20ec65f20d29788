//! Well-known notification channel and kind constants.
//!
//! Channel names identify the delivery mechanism in dispatch reports and
//! logs. Kind names match the values stored in `notification_history.kind`
//! and carried in push payload `data.type` fields.

/// Device-level alert, delivered to the browser client over WebSocket.
pub const CHANNEL_ALERT: &str = "alert";

/// In-app toast, delivered to the browser client over WebSocket.
pub const CHANNEL_TOAST: &str = "toast";

/// Remote push, delivered via the configured push-delivery endpoint.
pub const CHANNEL_PUSH: &str = "push";

/// A single lead assigned to a user.
pub const KIND_LEAD_ASSIGNMENT: &str = "lead_assignment";

/// A batch of leads assigned to a user in one operation.
pub const KIND_BULK_LEAD_ASSIGNMENT: &str = "bulk_lead_assignment";
