use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;

use super::text_column;

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
pub enum AttendanceStatus {
    Present,
    Absent,
    AbsentSansJustification,
}

text_column!(AttendanceStatus);

impl AttendanceStatus {
    /// Both absence kinds are penalised by the payroll estimator.
    pub fn is_absence(self) -> bool {
        matches!(
            self,
            AttendanceStatus::Absent | AttendanceStatus::AbsentSansJustification
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Attendance {
    pub id: u64,
    pub employee_id: u64,
    #[schema(example = "2024-06-03", format = "date", value_type = String)]
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    #[schema(example = "08:30:00", value_type = Option<String>)]
    pub arrival: Option<NaiveTime>,
    #[schema(example = "17:00:00", value_type = Option<String>)]
    pub departure: Option<NaiveTime>,
    #[schema(format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAttendance {
    pub employee_id: u64,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub arrival: Option<NaiveTime>,
    pub departure: Option<NaiveTime>,
}

/// Day counts over one month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttendanceTally {
    pub present: u32,
    pub absent: u32,
}

impl AttendanceTally {
    pub fn record(&mut self, status: AttendanceStatus, days: u32) {
        if status == AttendanceStatus::Present {
            self.present += days;
        } else if status.is_absence() {
            self.absent += days;
        }
    }
}
