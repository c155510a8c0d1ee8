use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::auth::AuthUser;
use crate::auth::capability::{Action, require_role};
use crate::error::AppError;
use crate::model::payroll::Payroll;
use crate::service::Services;

#[derive(Deserialize, ToSchema)]
pub struct PayrollReq {
    /// HR/admin only; defaults to the caller's own record
    #[schema(example = 12)]
    pub employee_id: Option<u64>,
    /// any day of the paid month
    #[schema(example = "2024-06-01", format = "date", value_type = String)]
    pub month: Option<NaiveDate>,
    #[schema(example = 3000.0)]
    pub base_salary: Option<f64>,
    #[schema(example = 0.0)]
    pub deductions: Option<f64>,
}

#[derive(Serialize, ToSchema)]
pub struct PayrollListResponse {
    pub data: Vec<Payroll>,
}

#[derive(Deserialize, ToSchema)]
pub struct PaymentReq {
    /// defaults to today
    #[schema(example = "2024-07-05", format = "date", value_type = Option<String>)]
    pub paid_on: Option<NaiveDate>,
}

/// Create payroll endpoint; the bonus is derived from the month's attendance
#[utoipa::path(
    post,
    path = "/api/payroll",
    request_body = PayrollReq,
    responses(
        (status = 201, description = "Payroll created", body = Payroll),
        (status = 400, description = "Missing month or non-positive base salary"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Filing for another employee needs HR or admin"),
        (status = 404, description = "Employee not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Payroll"
)]
pub async fn create_payroll(
    auth: AuthUser,
    services: web::Data<Services>,
    payload: web::Json<PayrollReq>,
) -> Result<HttpResponse, AppError> {
    let PayrollReq {
        employee_id,
        month,
        base_salary,
        deductions,
    } = payload.into_inner();

    let (Some(month), Some(base_salary)) = (month, base_salary) else {
        return Err(AppError::validation("month and base_salary are required"));
    };

    let payroll = services
        .payroll
        .submit(&auth, employee_id, month, base_salary, deductions.unwrap_or(0.0))
        .await?;

    Ok(HttpResponse::Created().json(payroll))
}

/// HR settlement of a pending payroll
#[utoipa::path(
    patch,
    path = "/api/payroll/{payroll_id}/paid",
    params(
        ("payroll_id" = u64, Path, description = "ID of the payroll to settle")
    ),
    request_body = PaymentReq,
    responses(
        (status = 200, description = "Payroll marked as paid", body = Payroll),
        (status = 400, description = "Payroll already paid"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Payroll not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Payroll"
)]
pub async fn mark_payroll_paid(
    auth: AuthUser,
    services: web::Data<Services>,
    path: web::Path<u64>,
    payload: web::Json<PaymentReq>,
) -> Result<HttpResponse, AppError> {
    let payroll = services
        .payroll
        .mark_paid(&auth, path.into_inner(), payload.into_inner().paid_on)
        .await?;

    Ok(HttpResponse::Ok().json(payroll))
}

#[utoipa::path(
    get,
    path = "/api/payroll",
    responses(
        (status = 200, description = "Caller's payrolls, newest month first", body = PayrollListResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Payroll"
)]
pub async fn list_own_payrolls(
    auth: AuthUser,
    services: web::Data<Services>,
) -> Result<HttpResponse, AppError> {
    let data = services.payroll.list_own(&auth).await?;

    Ok(HttpResponse::Ok().json(PayrollListResponse { data }))
}

#[utoipa::path(
    get,
    path = "/api/payroll/all",
    responses(
        (status = 200, description = "Every payroll", body = PayrollListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Payroll"
)]
pub async fn list_all_payrolls(
    auth: AuthUser,
    services: web::Data<Services>,
) -> Result<HttpResponse, AppError> {
    require_role(&auth, Action::ViewAll)?;
    let data = services.payroll.list_all().await?;

    Ok(HttpResponse::Ok().json(PayrollListResponse { data }))
}
