use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::auth::AuthUser;
use crate::auth::capability::{Action, authorize, require_role};
use crate::error::AppError;
use crate::model::{
    LINK_MAX, TEXT_MAX, check_len,
    leave_request::non_blank,
    notification::{NewNotification, Notification},
};
use crate::store::Stores;

const ENTITY: &str = "Notification";

#[derive(Deserialize, ToSchema)]
pub struct NotificationReq {
    #[schema(example = 12)]
    pub recipient_id: Option<u64>,
    #[schema(example = "Team meeting moved to 14:00")]
    pub message: Option<String>,
    #[schema(example = "/dashboard")]
    pub link: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct NotificationListResponse {
    pub data: Vec<Notification>,
}

/// Caller's inbox
#[utoipa::path(
    get,
    path = "/api/notifications",
    responses(
        (status = 200, description = "Caller's notifications, newest first", body = NotificationListResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Notifications"
)]
pub async fn list_own_notifications(
    auth: AuthUser,
    stores: web::Data<Stores>,
) -> Result<HttpResponse, AppError> {
    let data = stores.notifications.list_for(auth.user_id).await?;

    Ok(HttpResponse::Ok().json(NotificationListResponse { data }))
}

#[utoipa::path(
    patch,
    path = "/api/notifications/{notification_id}/read",
    params(
        ("notification_id" = u64, Path, description = "ID of the notification to acknowledge")
    ),
    responses(
        (status = 200, description = "Marked as read", body = Notification),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Notification not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Notifications"
)]
pub async fn mark_notification_read(
    auth: AuthUser,
    stores: web::Data<Stores>,
    path: web::Path<u64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let existing = stores.notifications.find(id).await?;
    authorize(&auth, Action::ReadOwnNotification, existing.as_ref(), ENTITY)?;

    let updated = stores
        .notifications
        .mark_read(id)
        .await?
        .ok_or(AppError::NotFound(ENTITY))?;

    Ok(HttpResponse::Ok().json(updated))
}

/// HR/Admin authoring endpoint
#[utoipa::path(
    post,
    path = "/api/notifications",
    request_body = NotificationReq,
    responses(
        (status = 201, description = "Notification created", body = Notification),
        (status = 400, description = "Missing recipient or message, or an over-long field"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Recipient not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Notifications"
)]
pub async fn create_notification(
    auth: AuthUser,
    stores: web::Data<Stores>,
    payload: web::Json<NotificationReq>,
) -> Result<HttpResponse, AppError> {
    require_role(&auth, Action::AuthorNotification)?;

    let req = payload.into_inner();
    let (Some(recipient_id), Some(message)) = (req.recipient_id, non_blank(req.message)) else {
        return Err(AppError::validation("recipient_id and message are required"));
    };
    let link = non_blank(req.link);
    check_len("message", &message, TEXT_MAX)?;
    if let Some(link) = &link {
        check_len("link", link, LINK_MAX)?;
    }
    stores
        .directory
        .find_user(recipient_id)
        .await?
        .ok_or(AppError::NotFound("Recipient"))?;

    let created = stores
        .notifications
        .append(NewNotification {
            recipient_id,
            message,
            link,
        })
        .await?;
    tracing::info!(
        notification_id = created.id,
        author_id = auth.user_id,
        recipient_id,
        "notification authored"
    );

    Ok(HttpResponse::Created().json(created))
}

#[utoipa::path(
    get,
    path = "/api/notifications/all",
    responses(
        (status = 200, description = "Every notification, newest first", body = NotificationListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Notifications"
)]
pub async fn list_all_notifications(
    auth: AuthUser,
    stores: web::Data<Stores>,
) -> Result<HttpResponse, AppError> {
    require_role(&auth, Action::ViewAll)?;
    let data = stores.notifications.list_all().await?;

    Ok(HttpResponse::Ok().json(NotificationListResponse { data }))
}
