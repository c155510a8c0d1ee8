use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::HrNotifyPolicy;
use crate::model::{
    leave_request::{LeaveRequest, LeaveStatus},
    notification::{NewNotification, NotificationMatch},
};
use crate::store::{NotificationSink, UserDirectory};

/// Owner's request list in the UI.
pub const OWNER_REQUESTS_LINK: &str = "/dashboard/mes-demandes";
/// HR review queue in the UI.
pub const HR_REVIEW_LINK: &str = "/rh-dashboard/conges";
/// Substring identifying the owner's submission confirmation.
pub const SUBMISSION_MARKER: &str = "Your leave request has been submitted";

const DATE_FORMAT: &str = "%d/%m/%Y";

fn period(leave: &LeaveRequest) -> String {
    format!(
        "from {} to {}",
        leave.start_date.format(DATE_FORMAT),
        leave.end_date.format(DATE_FORMAT)
    )
}

/// Identifies one request's submission confirmation, stable across modifications.
fn submission_reference(leave: &LeaveRequest) -> String {
    format!("{SUBMISSION_MARKER} successfully (request #{},", leave.id)
}

fn linked(recipient_id: u64, message: String, link: &str) -> NewNotification {
    NewNotification {
        recipient_id,
        message,
        link: Some(link.to_string()),
    }
}

/// Notices for a newly filed request: one per HR recipient, then the owner's.
pub fn submission_notices(hr: &[u64], requester: &str, leave: &LeaveRequest) -> Vec<NewNotification> {
    let mut notices: Vec<_> = hr
        .iter()
        .map(|&id| {
            linked(
                id,
                format!(
                    "New {} request from {requester} {}.",
                    leave.leave_type,
                    period(leave)
                ),
                HR_REVIEW_LINK,
            )
        })
        .collect();
    notices.push(linked(
        leave.owner_id,
        format!("✅ {} {}).", submission_reference(leave), period(leave)),
        OWNER_REQUESTS_LINK,
    ));
    notices
}

/// Notices for a modified pending request: one per HR recipient, then the owner's.
pub fn modification_notices(
    hr: &[u64],
    requester: &str,
    leave: &LeaveRequest,
) -> Vec<NewNotification> {
    let mut notices: Vec<_> = hr
        .iter()
        .map(|&id| {
            linked(
                id,
                format!(
                    "{requester} modified a {} request, now {}.",
                    leave.leave_type,
                    period(leave)
                ),
                HR_REVIEW_LINK,
            )
        })
        .collect();
    notices.push(linked(
        leave.owner_id,
        format!("Your leave request has been updated ({}).", period(leave)),
        OWNER_REQUESTS_LINK,
    ));
    notices
}

/// Adjudication notices carry no link.
pub fn decision_notices(
    adjudicator_id: u64,
    owner_name: &str,
    leave: &LeaveRequest,
) -> Vec<NewNotification> {
    let outcome = match leave.status {
        LeaveStatus::Approved => "approved",
        LeaveStatus::Rejected => "rejected",
        LeaveStatus::Pending => "left pending",
    };
    vec![
        NewNotification {
            recipient_id: adjudicator_id,
            message: format!(
                "You responded to {owner_name} for a {} request ({}).",
                leave.leave_type, leave.status
            ),
            link: None,
        },
        NewNotification {
            recipient_id: leave.owner_id,
            message: format!(
                "Your {} request {} has been {outcome}.",
                leave.leave_type,
                period(leave)
            ),
            link: None,
        },
    ]
}

/// Best-effort fan-out. Failures are logged and never reach the caller.
#[derive(Clone)]
pub struct Notifier {
    sink: Arc<dyn NotificationSink>,
    directory: Arc<dyn UserDirectory>,
    policy: HrNotifyPolicy,
}

impl Notifier {
    pub fn new(
        sink: Arc<dyn NotificationSink>,
        directory: Arc<dyn UserDirectory>,
        policy: HrNotifyPolicy,
    ) -> Self {
        Self {
            sink,
            directory,
            policy,
        }
    }

    async fn hr_recipients(&self) -> Vec<u64> {
        match self.directory.hr_recipients(self.policy).await {
            Ok(ids) => ids,
            Err(e) => {
                warn!(error = %e, "HR lookup failed; skipping HR notification");
                Vec::new()
            }
        }
    }

    /// Display name of `user_id`, or `fallback` when the profile is unavailable.
    pub async fn name_of(&self, user_id: u64, fallback: &str) -> String {
        match self.directory.find_user(user_id).await {
            Ok(Some(profile)) => profile.display_name(),
            Ok(None) => fallback.to_string(),
            Err(e) => {
                warn!(error = %e, user_id, "profile lookup failed");
                fallback.to_string()
            }
        }
    }

    pub async fn deliver(&self, notices: Vec<NewNotification>) {
        for notice in notices {
            let recipient_id = notice.recipient_id;
            match self.sink.append(notice).await {
                Ok(n) => debug!(notification_id = n.id, recipient_id, "notification stored"),
                Err(e) => warn!(error = %e, recipient_id, "notification not stored"),
            }
        }
    }

    pub async fn leave_submitted(&self, requester: &str, leave: &LeaveRequest) {
        let hr = self.hr_recipients().await;
        self.deliver(submission_notices(&hr, requester, leave)).await;
    }

    pub async fn leave_modified(&self, requester: &str, leave: &LeaveRequest) {
        let hr = self.hr_recipients().await;
        self.deliver(modification_notices(&hr, requester, leave)).await;
    }

    pub async fn leave_decided(&self, adjudicator_id: u64, leave: &LeaveRequest) {
        let owner_name = self.name_of(leave.owner_id, "an employee").await;
        self.deliver(decision_notices(adjudicator_id, &owner_name, leave))
            .await;
    }

    /// Removes the cancelled request's submission confirmation.
    pub async fn clear_submission(&self, leave: &LeaveRequest) {
        let filter = NotificationMatch {
            recipient_id: leave.owner_id,
            link: OWNER_REQUESTS_LINK.to_string(),
            message_contains: submission_reference(leave),
        };
        match self.sink.delete_matching(filter).await {
            Ok(removed) => debug!(leave_id = leave.id, removed, "submission notices cleared"),
            Err(e) => warn!(error = %e, leave_id = leave.id, "submission notice clean-up failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn leave(status: LeaveStatus) -> LeaveRequest {
        LeaveRequest {
            id: 9,
            owner_id: 5,
            start_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 6, 5).unwrap(),
            leave_type: "leave".into(),
            reason: "vacation".into(),
            status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn submission_notices_are_linked_and_end_with_the_owner() {
        let notices = submission_notices(&[2, 3], "Ada Lovelace", &leave(LeaveStatus::Pending));
        assert_eq!(notices.len(), 3);
        assert!(notices.iter().all(|n| n.link.is_some()));
        assert_eq!(notices[0].link.as_deref(), Some(HR_REVIEW_LINK));
        assert!(notices[0].message.contains("Ada Lovelace"));
        assert!(notices[0].message.contains("01/06/2024"));

        let owner = notices.last().unwrap();
        assert_eq!(owner.recipient_id, 5);
        assert_eq!(owner.link.as_deref(), Some(OWNER_REQUESTS_LINK));
        assert!(owner.message.contains(SUBMISSION_MARKER));
        assert!(owner.message.starts_with("✅ Your leave request has been submitted successfully (request #9, from 01/06/2024"));
    }

    #[test]
    fn without_hr_only_the_owner_is_notified() {
        let notices = modification_notices(&[], "Ada", &leave(LeaveStatus::Pending));
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].recipient_id, 5);
        assert!(!notices[0].message.contains(SUBMISSION_MARKER));
    }

    #[test]
    fn decision_notices_have_no_link() {
        let notices = decision_notices(2, "Ada Lovelace", &leave(LeaveStatus::Rejected));
        assert_eq!(notices.len(), 2);
        assert!(notices.iter().all(|n| n.link.is_none()));
        assert_eq!(notices[0].recipient_id, 2);
        assert!(notices[0].message.contains("Ada Lovelace"));
        assert!(notices[1].message.contains("rejected"));
    }
}
