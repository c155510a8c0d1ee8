use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::role::Role;

#[derive(Deserialize, ToSchema)]
pub struct RegisterReq {
    #[schema(example = "Marie")]
    pub first_name: Option<String>,
    #[schema(example = "Curie")]
    pub last_name: Option<String>,
    #[schema(example = "marie.curie@example.org")]
    pub email: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginReqDto {
    #[schema(example = "marie.curie@example.org")]
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct TokenResponse {
    pub message: String,
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: u64,
    /// account email
    pub sub: String,
    pub role: Role,
    /// display name shown in notification text
    pub name: Option<String>,
    /// Present only if this user is linked to an employee record
    pub employee_id: Option<u64>,
    pub exp: usize,
    pub jti: String,
}
