use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;

use super::text_column;

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

text_column!(LeaveStatus);

impl LeaveStatus {
    pub fn is_pending(self) -> bool {
        self == LeaveStatus::Pending
    }

    /// Accepts exactly `"Approved"` or `"Rejected"`; matching is case-sensitive.
    pub fn parse_decision(raw: &str) -> Option<Self> {
        match raw.parse::<LeaveStatus>() {
            Ok(LeaveStatus::Pending) | Err(_) => None,
            Ok(decided) => Some(decided),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(example = json!({
    "id": 1,
    "owner_id": 12,
    "start_date": "2024-06-01",
    "end_date": "2024-06-05",
    "leave_type": "leave",
    "reason": "vacation",
    "status": "Pending",
    "created_at": "2024-05-20T08:30:00Z",
    "updated_at": "2024-05-20T08:30:00Z"
}))]
pub struct LeaveRequest {
    pub id: u64,
    /// user who filed the request
    pub owner_id: u64,
    #[schema(example = "2024-06-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2024-06-05", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = "leave")]
    pub leave_type: String,
    pub reason: String,
    pub status: LeaveStatus,
    #[schema(format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
    #[schema(format = "date-time", value_type = String)]
    pub updated_at: DateTime<Utc>,
}

/// Create payload. Every field is optional at the wire level so that a missing
/// field produces a readable validation message instead of a decoder error.
/// Any `status` sent by the client is ignored.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct LeaveDraft {
    #[schema(example = "2024-06-01", format = "date", value_type = String)]
    pub start_date: Option<NaiveDate>,
    #[schema(example = "2024-06-05", format = "date", value_type = String)]
    pub end_date: Option<NaiveDate>,
    #[schema(example = "leave")]
    pub leave_type: Option<String>,
    #[schema(example = "vacation")]
    pub reason: Option<String>,
}

/// Modify payload; omitted or blank fields keep their stored value.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct LeavePatch {
    #[schema(example = "2024-06-02", format = "date", value_type = String)]
    pub start_date: Option<NaiveDate>,
    #[schema(example = "2024-06-06", format = "date", value_type = String)]
    pub end_date: Option<NaiveDate>,
    #[schema(example = "permission")]
    pub leave_type: Option<String>,
    pub reason: Option<String>,
}

/// Validated insert.
#[derive(Debug, Clone)]
pub struct NewLeave {
    pub owner_id: u64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub leave_type: String,
    pub reason: String,
}

/// Full set of editable fields after merging a [`LeavePatch`] onto a stored request.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaveChanges {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub leave_type: String,
    pub reason: String,
}

impl LeavePatch {
    pub fn merge_onto(self, current: &LeaveRequest) -> LeaveChanges {
        LeaveChanges {
            start_date: self.start_date.unwrap_or(current.start_date),
            end_date: self.end_date.unwrap_or(current.end_date),
            leave_type: non_blank(self.leave_type).unwrap_or_else(|| current.leave_type.clone()),
            reason: non_blank(self.reason).unwrap_or_else(|| current.reason.clone()),
        }
    }
}

pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored() -> LeaveRequest {
        LeaveRequest {
            id: 7,
            owner_id: 3,
            start_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 6, 5).unwrap(),
            leave_type: "leave".into(),
            reason: "vacation".into(),
            status: LeaveStatus::Pending,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn decision_parsing_is_exact() {
        assert_eq!(LeaveStatus::parse_decision("Approved"), Some(LeaveStatus::Approved));
        assert_eq!(LeaveStatus::parse_decision("Rejected"), Some(LeaveStatus::Rejected));
        assert_eq!(LeaveStatus::parse_decision("approved"), None);
        assert_eq!(LeaveStatus::parse_decision("Pending"), None);
        assert_eq!(LeaveStatus::parse_decision(""), None);
    }

    #[test]
    fn patch_keeps_omitted_and_blank_fields() {
        let patch = LeavePatch {
            end_date: NaiveDate::from_ymd_opt(2024, 6, 9),
            leave_type: Some("   ".into()),
            ..Default::default()
        };
        let merged = patch.merge_onto(&stored());
        assert_eq!(merged.start_date, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert_eq!(merged.end_date, NaiveDate::from_ymd_opt(2024, 6, 9).unwrap());
        assert_eq!(merged.leave_type, "leave");
        assert_eq!(merged.reason, "vacation");
    }

    #[test]
    fn status_serializes_with_capitalised_names() {
        assert_eq!(
            serde_json::to_value(LeaveStatus::Pending).unwrap(),
            serde_json::json!("Pending")
        );
    }
}
