//! Deep-link URL paths into the dashboard frontend.
//!
//! The dispatch flow only constructs these paths; rendering the views is
//! the frontend's concern.

use crate::types::DbId;

/// Detail view for a single lead, e.g. `/telecaller/leads/<id>`.
pub fn lead_detail_path(role: &str, lead_id: DbId) -> String {
    format!("/{role}/leads/{lead_id}")
}

/// Lead list view for a role, e.g. `/telecaller/leads`.
pub fn lead_list_path(role: &str) -> String {
    format!("/{role}/leads")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::ROLE_TELECALLER;
    use uuid::Uuid;

    #[test]
    fn paths_embed_role_and_id() {
        let id = Uuid::new_v4();
        assert_eq!(
            lead_detail_path(ROLE_TELECALLER, id),
            format!("/telecaller/leads/{id}")
        );
        assert_eq!(lead_list_path(ROLE_TELECALLER), "/telecaller/leads");
    }
}
