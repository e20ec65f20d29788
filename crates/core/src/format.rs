//! Notification message formatting.
//!
//! All functions here are pure and deterministic: identical input always
//! yields identical output. The dispatcher and the history recorder both
//! format through this module so every channel shows the same text.

use crate::assignment::AssignmentNotification;
use crate::types::DbId;

/// Title shown on alert/toast/push for a single assignment.
pub const ASSIGNMENT_TITLE: &str = "🎯 New Lead Assigned";

/// Title stored in the history record (no emoji marker).
pub const ASSIGNMENT_HISTORY_TITLE: &str = "New Lead Assigned";

/// Priority value that is considered the default and never shown.
const PRIORITY_DEFAULT: &str = "medium";

/// Title for a bulk assignment summary.
pub fn bulk_assignment_title(count: usize) -> String {
    format!("🎯 {count} New Leads Assigned")
}

/// Body for a single assignment, including the optional detail suffix.
pub fn assignment_body(notification: &AssignmentNotification) -> String {
    format!(
        "{}{}",
        assignment_message(notification),
        lead_detail_suffix(notification)
    )
}

/// Plain message without the detail suffix, as stored in history records.
pub fn assignment_message(notification: &AssignmentNotification) -> String {
    format!("{} has been assigned to you", notification.lead_name)
}

/// Body for a bulk assignment summary. Per-lead details are intentionally
/// omitted in the bulk path.
pub fn bulk_assignment_body(count: usize) -> String {
    format!("{count} leads have been assigned to you")
}

/// Deduplication tag for a single-assignment alert. Repeated assignment
/// events for the same lead collapse to one visible alert per tag.
pub fn assignment_tag(lead_id: DbId) -> String {
    format!("lead-assignment-{lead_id}")
}

/// Deduplication tag for a bulk-assignment alert, unique per batch.
pub fn bulk_assignment_tag(millis: i64) -> String {
    format!("bulk-assignment-{millis}")
}

/// Optional parenthetical detail suffix for a single assignment.
///
/// Appends, in order and only when present and non-default:
/// priority (uppercased, suppressed when `"medium"`), loan amount
/// (rupee-grouped), and loan type. Zero details yield the empty string.
pub fn lead_detail_suffix(notification: &AssignmentNotification) -> String {
    let mut details = Vec::new();

    if let Some(priority) = &notification.priority {
        if !priority.is_empty() && priority != PRIORITY_DEFAULT {
            details.push(format!("Priority: {}", priority.to_uppercase()));
        }
    }

    if let Some(amount) = notification.loan_amount {
        if amount != 0 {
            details.push(format!("Amount: ₹{}", group_rupees(amount)));
        }
    }

    if let Some(loan_type) = &notification.loan_type {
        if !loan_type.is_empty() {
            details.push(format!("Type: {loan_type}"));
        }
    }

    if details.is_empty() {
        String::new()
    } else {
        format!(" ({})", details.join(", "))
    }
}

/// Group an amount with Indian-system thousands separators.
///
/// The last three digits form one group and the remaining digits are
/// grouped in pairs: `500000` → `5,00,000`, `12345678` → `1,23,45,678`.
pub fn group_rupees(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let sign = if amount < 0 { "-" } else { "" };

    if digits.len() <= 3 {
        return format!("{sign}{digits}");
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    let head_bytes = head.as_bytes();
    let mut index = head_bytes.len();
    while index > 0 {
        let start = index.saturating_sub(2);
        groups.push(&head[start..index]);
        index = start;
    }
    groups.reverse();

    format!("{sign}{},{tail}", groups.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn notification() -> AssignmentNotification {
        AssignmentNotification {
            lead_id: Uuid::new_v4(),
            lead_name: "Asha Rao".to_string(),
            lead_phone: "9876543210".to_string(),
            lead_email: None,
            assigned_to: Uuid::new_v4(),
            assigned_by: None,
            assigned_at: Utc::now(),
            priority: None,
            loan_amount: None,
            loan_type: None,
        }
    }

    #[test]
    fn rupee_grouping_uses_indian_system() {
        assert_eq!(group_rupees(0), "0");
        assert_eq!(group_rupees(100), "100");
        assert_eq!(group_rupees(1_000), "1,000");
        assert_eq!(group_rupees(99_999), "99,999");
        assert_eq!(group_rupees(200_000), "2,00,000");
        assert_eq!(group_rupees(500_000), "5,00,000");
        assert_eq!(group_rupees(12_345_678), "1,23,45,678");
        assert_eq!(group_rupees(1_00_00_00_000), "1,00,00,00,000");
    }

    #[test]
    fn suffix_empty_without_details() {
        assert_eq!(lead_detail_suffix(&notification()), "");
    }

    #[test]
    fn suffix_omits_medium_priority() {
        let mut n = notification();
        n.priority = Some("medium".to_string());
        assert_eq!(lead_detail_suffix(&n), "");
    }

    #[test]
    fn suffix_includes_uppercased_priority() {
        let mut n = notification();
        n.priority = Some("high".to_string());
        assert_eq!(lead_detail_suffix(&n), " (Priority: HIGH)");
    }

    #[test]
    fn suffix_includes_grouped_amount() {
        let mut n = notification();
        n.loan_amount = Some(500_000);
        assert_eq!(lead_detail_suffix(&n), " (Amount: ₹5,00,000)");
    }

    #[test]
    fn suffix_omits_zero_amount() {
        let mut n = notification();
        n.loan_amount = Some(0);
        assert_eq!(lead_detail_suffix(&n), "");
    }

    #[test]
    fn body_with_all_details() {
        let mut n = notification();
        n.priority = Some("high".to_string());
        n.loan_amount = Some(200_000);
        n.loan_type = Some("Personal".to_string());
        assert_eq!(
            assignment_body(&n),
            "Asha Rao has been assigned to you (Priority: HIGH, Amount: ₹2,00,000, Type: Personal)"
        );
    }

    #[test]
    fn history_message_has_no_suffix() {
        let mut n = notification();
        n.priority = Some("high".to_string());
        assert_eq!(assignment_message(&n), "Asha Rao has been assigned to you");
    }

    #[test]
    fn bulk_texts_reference_the_count() {
        assert_eq!(bulk_assignment_title(3), "🎯 3 New Leads Assigned");
        assert_eq!(bulk_assignment_body(3), "3 leads have been assigned to you");
    }

    #[test]
    fn assignment_tag_embeds_lead_id() {
        let id = Uuid::new_v4();
        assert_eq!(assignment_tag(id), format!("lead-assignment-{id}"));
    }
}
