use std::sync::Arc;

use chrono::{Datelike, Months, NaiveDate, Utc};
use tracing::info;

use crate::auth::auth::AuthUser;
use crate::auth::capability::{Action, require_role};
use crate::error::AppError;
use crate::model::payroll::{NewPayroll, Payroll, PayrollStatus};
use crate::service::target_employee;
use crate::store::{AttendanceStore, PayrollStore, UserDirectory};

const ENTITY: &str = "Payroll";
const ALREADY_PAID: &str = "payroll is already paid";

/// Share of base salary earned per present day, normalised to a 30-day month.
const PRESENCE_RATE: f64 = 0.05;
/// Share of base salary lost per absent day, normalised to a 30-day month.
const ABSENCE_RATE: f64 = 0.02;

/// Attendance incentive. Never negative.
pub fn estimate_bonus(base_salary: f64, present: u32, absent: u32, days_in_month: u32) -> f64 {
    if days_in_month == 0 {
        return 0.0;
    }
    let days = f64::from(days_in_month);
    let earned = base_salary * PRESENCE_RATE * f64::from(present) / days * 30.0;
    let lost = base_salary * ABSENCE_RATE * f64::from(absent) / days * 30.0;
    (earned - lost).max(0.0)
}

/// First day of `date`'s month and first day of the following month.
pub fn month_bounds(date: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
    let first = date.with_day(1)?;
    let next = first.checked_add_months(Months::new(1))?;
    Some((first, next))
}

#[derive(Clone)]
pub struct PayrollService {
    payroll: Arc<dyn PayrollStore>,
    attendance: Arc<dyn AttendanceStore>,
    directory: Arc<dyn UserDirectory>,
}

impl PayrollService {
    pub fn new(
        payroll: Arc<dyn PayrollStore>,
        attendance: Arc<dyn AttendanceStore>,
        directory: Arc<dyn UserDirectory>,
    ) -> Self {
        Self {
            payroll,
            attendance,
            directory,
        }
    }

    /// Files a payroll for `employee_id` (the caller's own record when `None`),
    /// computing the bonus from that month's attendance.
    pub async fn submit(
        &self,
        principal: &AuthUser,
        employee_id: Option<u64>,
        month: NaiveDate,
        base_salary: f64,
        deductions: f64,
    ) -> Result<Payroll, AppError> {
        let employee_id = target_employee(self.directory.as_ref(), principal, employee_id).await?;

        if !base_salary.is_finite() || base_salary <= 0.0 {
            return Err(AppError::validation("base_salary must be greater than zero"));
        }
        if !deductions.is_finite() || deductions < 0.0 {
            return Err(AppError::validation("deductions must not be negative"));
        }

        let (first, next) =
            month_bounds(month).ok_or_else(|| AppError::validation("month is out of range"))?;
        let days_in_month = (next - first).num_days() as u32;

        let tally = self.attendance.tally(employee_id, first, next).await?;
        let bonus = estimate_bonus(base_salary, tally.present, tally.absent, days_in_month);

        let payroll = self
            .payroll
            .insert(NewPayroll {
                employee_id,
                month: first,
                base_salary,
                bonus,
                deductions,
            })
            .await?;
        info!(
            payroll_id = payroll.id,
            employee_id,
            present = tally.present,
            absent = tally.absent,
            bonus,
            "payroll submitted"
        );
        Ok(payroll)
    }

    /// HR settlement: `Pending` to `Paid`, dated `paid_on` or today.
    pub async fn mark_paid(
        &self,
        principal: &AuthUser,
        id: u64,
        paid_on: Option<NaiveDate>,
    ) -> Result<Payroll, AppError> {
        require_role(principal, Action::ManageStaffRecords)?;

        let current = self.payroll.find(id).await?.ok_or(AppError::NotFound(ENTITY))?;
        if current.status != PayrollStatus::Pending {
            return Err(AppError::state(ALREADY_PAID));
        }

        let paid_on = paid_on.unwrap_or_else(|| Utc::now().date_naive());
        let payroll = self
            .payroll
            .mark_paid_if_pending(id, paid_on)
            .await?
            .ok_or_else(|| AppError::state(ALREADY_PAID))?;
        info!(payroll_id = id, user_id = principal.user_id, %paid_on, "payroll paid");
        Ok(payroll)
    }

    pub async fn list_own(&self, principal: &AuthUser) -> Result<Vec<Payroll>, AppError> {
        match principal.employee_id {
            Some(employee_id) => Ok(self.payroll.list_for_employee(employee_id).await?),
            None => Ok(Vec::new()),
        }
    }

    pub async fn list_all(&self) -> Result<Vec<Payroll>, AppError> {
        Ok(self.payroll.list_all().await?)
    }
}
