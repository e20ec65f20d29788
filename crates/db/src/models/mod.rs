//! Entity models and DTOs, one module per table.

pub mod lead;
pub mod notification_history;
pub mod user;
