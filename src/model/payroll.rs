use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;

use super::text_column;

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
pub enum PayrollStatus {
    Pending,
    Paid,
}

text_column!(PayrollStatus);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Payroll {
    pub id: u64,
    pub employee_id: u64,
    /// first day of the paid month
    #[schema(example = "2024-06-01", format = "date", value_type = String)]
    pub month: NaiveDate,
    #[schema(example = 3000.0)]
    pub base_salary: f64,
    #[schema(example = 150.0)]
    pub bonus: f64,
    #[schema(example = 0.0)]
    pub deductions: f64,
    #[schema(example = 3150.0)]
    pub net_salary: f64,
    pub status: PayrollStatus,
    /// set when HR settles the payroll
    #[schema(example = "2024-07-05", format = "date", value_type = Option<String>)]
    pub paid_on: Option<NaiveDate>,
    #[schema(format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPayroll {
    pub employee_id: u64,
    pub month: NaiveDate,
    pub base_salary: f64,
    pub bonus: f64,
    pub deductions: f64,
}

impl NewPayroll {
    pub fn net_salary(&self) -> f64 {
        self.base_salary + self.bonus - self.deductions
    }
}
