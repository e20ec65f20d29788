//! Well-known role name constants.
//!
//! These must match the values stored in the `users.role` column. Admins
//! manage and assign leads; telecallers work the leads assigned to them.

/// Administrator: manages the lead pool and performs assignments.
pub const ROLE_ADMIN: &str = "admin";

/// Telecaller: receives lead assignments and works them.
pub const ROLE_TELECALLER: &str = "telecaller";
