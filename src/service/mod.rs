//! Business rules that sit between the HTTP handlers and the stores.

pub mod leave;
pub mod notify;
pub mod payroll;

use crate::auth::auth::AuthUser;
use crate::auth::capability::{Action, require_role};
use crate::config::Config;
use crate::error::AppError;
use crate::store::{Stores, UserDirectory};

pub use leave::LeaveService;
pub use notify::Notifier;
pub use payroll::PayrollService;

pub const EMPLOYEE: &str = "Employee";

/// Employee record a staff write applies to. Without `requested` it is the
/// caller's own; another employee's record needs HR or admin and must exist.
pub async fn target_employee(
    directory: &dyn UserDirectory,
    principal: &AuthUser,
    requested: Option<u64>,
) -> Result<u64, AppError> {
    match requested {
        None => principal.employee_id.ok_or(AppError::NotFound(EMPLOYEE)),
        Some(id) if principal.employee_id == Some(id) => Ok(id),
        Some(id) => {
            require_role(principal, Action::ManageStaffRecords)?;
            directory
                .find_employee(id)
                .await?
                .map(|_| id)
                .ok_or(AppError::NotFound(EMPLOYEE))
        }
    }
}

/// Services registered as app data alongside [`Stores`].
#[derive(Clone)]
pub struct Services {
    pub leave: LeaveService,
    pub payroll: PayrollService,
}

impl Services {
    pub fn new(stores: &Stores, config: &Config) -> Self {
        let notifier = Notifier::new(
            stores.notifications.clone(),
            stores.directory.clone(),
            config.hr_notify_policy,
        );
        Self {
            leave: LeaveService::new(stores.leaves.clone(), notifier),
            payroll: PayrollService::new(
                stores.payroll.clone(),
                stores.attendance.clone(),
                stores.directory.clone(),
            ),
        }
    }
}
