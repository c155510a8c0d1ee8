use crate::auth::auth::AuthUser;
use crate::error::AppError;
use crate::model::{leave_request::LeaveRequest, notification::Notification};

/// Everything a principal may attempt against a protected resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Read, modify or cancel one's own leave request.
    ManageOwnLeave,
    /// Approve or reject anyone's leave request.
    AdjudicateLeave,
    /// See the HR-wide views (pending leaves, every attendance/payroll/notification).
    ViewAll,
    /// Write a notification to an arbitrary user.
    AuthorNotification,
    /// Read or acknowledge one's own notification.
    ReadOwnNotification,
    /// Record attendance or payroll for any employee and settle payrolls.
    ManageStaffRecords,
}

/// A resource with a single owning user.
pub trait Owned {
    fn owner_id(&self) -> u64;
}

impl Owned for LeaveRequest {
    fn owner_id(&self) -> u64 {
        self.owner_id
    }
}

impl Owned for Notification {
    fn owner_id(&self) -> u64 {
        self.recipient_id
    }
}

/// Role-gated actions fail with `Forbidden`. Ownership failures, including a
/// missing resource, fail with `NotFound` so callers cannot discover ids.
pub fn authorize<R: Owned>(
    principal: &AuthUser,
    action: Action,
    resource: Option<&R>,
    entity: &'static str,
) -> Result<(), AppError> {
    match action {
        Action::ManageOwnLeave | Action::ReadOwnNotification => match resource {
            Some(r) if r.owner_id() == principal.user_id => Ok(()),
            _ => Err(AppError::NotFound(entity)),
        },
        Action::AdjudicateLeave
        | Action::ViewAll
        | Action::AuthorNotification
        | Action::ManageStaffRecords => {
            if principal.role.is_hr_or_admin() {
                Ok(())
            } else {
                Err(AppError::Forbidden)
            }
        }
    }
}

/// Role-only check for actions that have no single target resource.
pub fn require_role(principal: &AuthUser, action: Action) -> Result<(), AppError> {
    authorize::<LeaveRequest>(principal, action, None, "Resource")
}
