use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;

use super::text_column;

/// Account role, stored and transmitted as `employe`, `rh` or `admin`.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
pub enum Role {
    #[serde(rename = "employe")]
    #[strum(serialize = "employe")]
    Employee,
    #[serde(rename = "rh")]
    #[strum(serialize = "rh")]
    Hr,
    #[serde(rename = "admin")]
    #[strum(serialize = "admin")]
    Admin,
}

text_column!(Role);

impl Role {
    pub fn is_hr_or_admin(self) -> bool {
        matches!(self, Role::Hr | Role::Admin)
    }
}
