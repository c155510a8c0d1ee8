use actix_web::{HttpResponse, web};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::auth::AuthUser;
use crate::auth::capability::{Action, require_role};
use crate::error::AppError;
use crate::model::attendance::{Attendance, AttendanceStatus, NewAttendance};
use crate::service::target_employee;
use crate::store::Stores;

#[derive(Deserialize, ToSchema)]
pub struct AttendanceReq {
    /// HR/admin only; defaults to the caller's own record
    #[schema(example = 12)]
    pub employee_id: Option<u64>,
    #[schema(example = "2024-06-03", format = "date", value_type = String)]
    pub date: Option<NaiveDate>,
    pub status: Option<AttendanceStatus>,
    /// only with `Present`
    #[schema(example = "08:30:00", value_type = Option<String>)]
    pub arrival: Option<NaiveTime>,
    /// only with `Present`
    #[schema(example = "17:00:00", value_type = Option<String>)]
    pub departure: Option<NaiveTime>,
}

#[derive(Serialize, ToSchema)]
pub struct AttendanceListResponse {
    pub data: Vec<Attendance>,
}

fn validate(employee_id: u64, req: AttendanceReq) -> Result<NewAttendance, AppError> {
    let (Some(date), Some(status)) = (req.date, req.status) else {
        return Err(AppError::validation("date and status are required"));
    };

    if status != AttendanceStatus::Present && (req.arrival.is_some() || req.departure.is_some()) {
        return Err(AppError::validation(
            "arrival and departure are only allowed when Present",
        ));
    }
    if let (Some(arrival), Some(departure)) = (req.arrival, req.departure) {
        if departure < arrival {
            return Err(AppError::validation("departure must not be before arrival"));
        }
    }

    Ok(NewAttendance {
        employee_id,
        date,
        status,
        arrival: req.arrival,
        departure: req.departure,
    })
}

/// Record one day of attendance, the caller's own unless HR names an `employee_id`
#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body = AttendanceReq,
    responses(
        (status = 201, description = "Attendance recorded", body = Attendance),
        (status = 400, description = "Missing or inconsistent fields"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Recording for another employee needs HR or admin"),
        (status = 404, description = "Employee not found"),
        (status = 409, description = "Attendance already recorded for this date")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn record_attendance(
    auth: AuthUser,
    stores: web::Data<Stores>,
    payload: web::Json<AttendanceReq>,
) -> Result<HttpResponse, AppError> {
    let req = payload.into_inner();
    let employee_id = target_employee(stores.directory.as_ref(), &auth, req.employee_id).await?;
    let new = validate(employee_id, req)?;

    let record = stores.attendance.insert(new).await?;
    tracing::info!(
        attendance_id = record.id,
        employee_id,
        recorded_by = auth.user_id,
        status = %record.status,
        "attendance recorded"
    );

    Ok(HttpResponse::Created().json(record))
}

#[utoipa::path(
    get,
    path = "/api/attendance",
    responses(
        (status = 200, description = "Caller's attendance, newest date first", body = AttendanceListResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn list_own_attendance(
    auth: AuthUser,
    stores: web::Data<Stores>,
) -> Result<HttpResponse, AppError> {
    let data = match auth.employee_id {
        Some(employee_id) => stores.attendance.list_for_employee(employee_id).await?,
        None => Vec::new(),
    };

    Ok(HttpResponse::Ok().json(AttendanceListResponse { data }))
}

#[utoipa::path(
    get,
    path = "/api/attendance/all",
    responses(
        (status = 200, description = "Every attendance record", body = AttendanceListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn list_all_attendance(
    auth: AuthUser,
    stores: web::Data<Stores>,
) -> Result<HttpResponse, AppError> {
    require_role(&auth, Action::ViewAll)?;
    let data = stores.attendance.list_all().await?;

    Ok(HttpResponse::Ok().json(AttendanceListResponse { data }))
}
