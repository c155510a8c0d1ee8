use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::auth::auth::AuthUser;
use crate::error::AppError;
use crate::model::leave_request::{LeaveDraft, LeavePatch, LeaveRequest};
use crate::service::Services;

#[derive(Serialize, ToSchema)]
pub struct LeaveListResponse {
    pub data: Vec<LeaveRequest>,
}

#[derive(Serialize, ToSchema)]
pub struct LeaveResponse {
    pub leave: LeaveRequest,
}

#[derive(Serialize, ToSchema)]
pub struct LeaveMessageResponse {
    #[schema(example = "Leave request submitted")]
    pub message: String,
    pub leave: LeaveRequest,
}

#[derive(Deserialize, ToSchema)]
pub struct AdjudicationReq {
    /// exactly "Approved" or "Rejected"
    #[schema(example = "Approved")]
    pub status: Option<String>,
}

fn with_message(message: &str, leave: LeaveRequest) -> LeaveMessageResponse {
    LeaveMessageResponse {
        message: message.to_string(),
        leave,
    }
}

/* =========================
Create leave request
========================= */
#[utoipa::path(
    post,
    path = "/api/leave",
    request_body(
        content = LeaveDraft,
        description = "Leave request payload; any status field is ignored",
        content_type = "application/json"
    ),
    responses(
        (status = 201, description = "Leave request submitted", body = LeaveMessageResponse),
        (status = 400, description = "Missing field or end date before start date"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn create_leave(
    auth: AuthUser,
    services: web::Data<Services>,
    payload: web::Json<LeaveDraft>,
) -> Result<HttpResponse, AppError> {
    let leave = services.leave.create(&auth, payload.into_inner()).await?;

    Ok(HttpResponse::Created().json(with_message("Leave request submitted", leave)))
}

/* =========================
Own leave requests
========================= */
#[utoipa::path(
    get,
    path = "/api/leave",
    responses(
        (status = 200, description = "Caller's requests, newest first", body = LeaveListResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn list_own_leaves(
    auth: AuthUser,
    services: web::Data<Services>,
) -> Result<HttpResponse, AppError> {
    let data = services.leave.list_own(&auth).await?;

    Ok(HttpResponse::Ok().json(LeaveListResponse { data }))
}

/* =========================
Pending queue (HR/Admin)
========================= */
#[utoipa::path(
    get,
    path = "/api/leave/pending",
    responses(
        (status = 200, description = "Pending requests, newest first", body = LeaveListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn list_pending_leaves(
    auth: AuthUser,
    services: web::Data<Services>,
) -> Result<HttpResponse, AppError> {
    let data = services.leave.list_pending(&auth).await?;

    Ok(HttpResponse::Ok().json(LeaveListResponse { data }))
}

#[utoipa::path(
    get,
    path = "/api/leave/{leave_id}",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to fetch")
    ),
    responses(
        (status = 200, description = "Leave request found", body = LeaveResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Leave request not found", body = Object, example = json!({
            "error": "Leave request not found"
        }))
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn get_leave(
    auth: AuthUser,
    services: web::Data<Services>,
    path: web::Path<u64>,
) -> Result<HttpResponse, AppError> {
    let leave = services.leave.get(&auth, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(LeaveResponse { leave }))
}

#[utoipa::path(
    put,
    path = "/api/leave/{leave_id}",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to modify")
    ),
    request_body = LeavePatch,
    responses(
        (status = 200, description = "Leave request updated", body = LeaveMessageResponse),
        (status = 400, description = "Request is no longer pending", body = Object, example = json!({
            "error": "only pending requests may be modified"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Leave request not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn modify_leave(
    auth: AuthUser,
    services: web::Data<Services>,
    path: web::Path<u64>,
    payload: web::Json<LeavePatch>,
) -> Result<HttpResponse, AppError> {
    let leave = services
        .leave
        .modify(&auth, path.into_inner(), payload.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(with_message("Leave request updated", leave)))
}

#[utoipa::path(
    delete,
    path = "/api/leave/{leave_id}",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to cancel")
    ),
    responses(
        (status = 200, description = "Leave request cancelled", body = Object, example = json!({
            "message": "Leave request cancelled"
        })),
        (status = 400, description = "Request is no longer pending"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Leave request not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn cancel_leave(
    auth: AuthUser,
    services: web::Data<Services>,
    path: web::Path<u64>,
) -> Result<HttpResponse, AppError> {
    services.leave.cancel(&auth, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Leave request cancelled"
    })))
}

/* =========================
Approve / reject (HR/Admin)
========================= */
#[utoipa::path(
    patch,
    path = "/api/leave/{leave_id}/status",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to adjudicate")
    ),
    request_body = AdjudicationReq,
    responses(
        (status = 200, description = "Decision recorded", body = LeaveMessageResponse),
        (status = 400, description = "Invalid decision or request already processed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave request not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn adjudicate_leave(
    auth: AuthUser,
    services: web::Data<Services>,
    path: web::Path<u64>,
    payload: web::Json<AdjudicationReq>,
) -> Result<HttpResponse, AppError> {
    let leave = services
        .leave
        .adjudicate(&auth, path.into_inner(), payload.status.as_deref())
        .await?;

    let message = format!("Leave request {}", leave.status.to_string().to_lowercase());
    Ok(HttpResponse::Ok().json(with_message(&message, leave)))
}
