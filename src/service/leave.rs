use std::sync::Arc;

use tracing::info;

use crate::auth::auth::AuthUser;
use crate::auth::capability::{Action, authorize, require_role};
use crate::error::AppError;
use crate::model::leave_request::{
    LeaveChanges, LeaveDraft, LeavePatch, LeaveRequest, LeaveStatus, NewLeave, non_blank,
};
use crate::model::{LEAVE_TYPE_MAX, TEXT_MAX, check_len};
use crate::service::notify::Notifier;
use crate::store::LeaveStore;

const ENTITY: &str = "Leave request";

const NOT_PENDING_MODIFY: &str = "only pending requests may be modified";
const NOT_PENDING_CANCEL: &str = "only pending requests may be cancelled";
const NOT_PENDING_DECIDE: &str = "only pending requests may be adjudicated";

/// Owns every leave-request transition and the notices each one produces.
#[derive(Clone)]
pub struct LeaveService {
    leaves: Arc<dyn LeaveStore>,
    notifier: Notifier,
}

fn check_range(start: chrono::NaiveDate, end: chrono::NaiveDate) -> Result<(), AppError> {
    if end < start {
        return Err(AppError::validation("end_date must not be before start_date"));
    }
    Ok(())
}

fn check_text(leave_type: &str, reason: &str) -> Result<(), AppError> {
    check_len("leave_type", leave_type, LEAVE_TYPE_MAX)?;
    check_len("reason", reason, TEXT_MAX)
}

impl LeaveService {
    pub fn new(leaves: Arc<dyn LeaveStore>, notifier: Notifier) -> Self {
        Self { leaves, notifier }
    }

    /// Loads the request and checks that `principal` owns it.
    async fn owned(&self, principal: &AuthUser, id: u64) -> Result<LeaveRequest, AppError> {
        let leave = self.leaves.find(id).await?;
        authorize(principal, Action::ManageOwnLeave, leave.as_ref(), ENTITY)?;
        leave.ok_or(AppError::NotFound(ENTITY))
    }

    async fn requester_name(&self, principal: &AuthUser) -> String {
        self.notifier
            .name_of(principal.user_id, principal.label())
            .await
    }

    pub async fn create(
        &self,
        principal: &AuthUser,
        draft: LeaveDraft,
    ) -> Result<LeaveRequest, AppError> {
        let (Some(start_date), Some(end_date), Some(leave_type), Some(reason)) = (
            draft.start_date,
            draft.end_date,
            non_blank(draft.leave_type),
            non_blank(draft.reason),
        ) else {
            return Err(AppError::validation(
                "start_date, end_date, leave_type and reason are required",
            ));
        };
        check_range(start_date, end_date)?;
        check_text(&leave_type, &reason)?;

        let leave = self
            .leaves
            .insert(NewLeave {
                owner_id: principal.user_id,
                start_date,
                end_date,
                leave_type,
                reason,
            })
            .await?;
        info!(leave_id = leave.id, user_id = principal.user_id, "leave request created");

        let requester = self.requester_name(principal).await;
        self.notifier.leave_submitted(&requester, &leave).await;
        Ok(leave)
    }

    pub async fn get(&self, principal: &AuthUser, id: u64) -> Result<LeaveRequest, AppError> {
        self.owned(principal, id).await
    }

    pub async fn modify(
        &self,
        principal: &AuthUser,
        id: u64,
        patch: LeavePatch,
    ) -> Result<LeaveRequest, AppError> {
        let current = self.owned(principal, id).await?;
        if !current.status.is_pending() {
            return Err(AppError::state(NOT_PENDING_MODIFY));
        }

        let changes: LeaveChanges = patch.merge_onto(&current);
        check_range(changes.start_date, changes.end_date)?;
        check_text(&changes.leave_type, &changes.reason)?;

        // decided between the read and this write
        let leave = self
            .leaves
            .update_if_pending(id, changes)
            .await?
            .ok_or_else(|| AppError::state(NOT_PENDING_MODIFY))?;
        info!(leave_id = id, user_id = principal.user_id, "leave request modified");

        let requester = self.requester_name(principal).await;
        self.notifier.leave_modified(&requester, &leave).await;
        Ok(leave)
    }

    pub async fn cancel(&self, principal: &AuthUser, id: u64) -> Result<(), AppError> {
        let current = self.owned(principal, id).await?;
        if !current.status.is_pending() {
            return Err(AppError::state(NOT_PENDING_CANCEL));
        }

        if !self.leaves.delete_if_pending(id).await? {
            return Err(AppError::state(NOT_PENDING_CANCEL));
        }
        info!(leave_id = id, user_id = principal.user_id, "leave request cancelled");

        self.notifier.clear_submission(&current).await;
        Ok(())
    }

    pub async fn adjudicate(
        &self,
        principal: &AuthUser,
        id: u64,
        decision: Option<&str>,
    ) -> Result<LeaveRequest, AppError> {
        require_role(principal, Action::AdjudicateLeave)?;

        let decision = decision
            .and_then(LeaveStatus::parse_decision)
            .ok_or_else(|| AppError::validation("status must be \"Approved\" or \"Rejected\""))?;

        let current = self
            .leaves
            .find(id)
            .await?
            .ok_or(AppError::NotFound(ENTITY))?;
        if !current.status.is_pending() {
            return Err(AppError::state(NOT_PENDING_DECIDE));
        }

        let leave = self
            .leaves
            .decide_if_pending(id, decision)
            .await?
            .ok_or_else(|| AppError::state(NOT_PENDING_DECIDE))?;
        info!(
            leave_id = id,
            adjudicator_id = principal.user_id,
            status = %leave.status,
            "leave request adjudicated"
        );

        self.notifier.leave_decided(principal.user_id, &leave).await;
        Ok(leave)
    }

    pub async fn list_pending(&self, principal: &AuthUser) -> Result<Vec<LeaveRequest>, AppError> {
        require_role(principal, Action::ViewAll)?;
        Ok(self.leaves.list_by_status(LeaveStatus::Pending).await?)
    }

    pub async fn list_own(&self, principal: &AuthUser) -> Result<Vec<LeaveRequest>, AppError> {
        Ok(self.leaves.list_by_owner(principal.user_id).await?)
    }
}
