use actix_web::middleware::Next;
use actix_web::{
    Error, HttpMessage, ResponseError,
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
};

use crate::auth::auth::authenticate;

/// Verifies the bearer token once for the whole protected scope and stores the
/// resulting [`AuthUser`](crate::auth::auth::AuthUser) in request extensions.
pub async fn auth_middleware(
    req: ServiceRequest,
    next: Next<BoxBody>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let auth_user = match authenticate(req.request()) {
        Ok(user) => user,
        Err(e) => {
            tracing::debug!(path = %req.path(), "unauthenticated request");
            let resp = e.error_response();
            return Ok(req.into_response(resp));
        }
    };

    tracing::debug!(user_id = auth_user.user_id, role = %auth_user.role, "authenticated");
    req.extensions_mut().insert(auth_user);

    next.call(req).await
}
