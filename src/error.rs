use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

/// Every failure a handler can surface. Each variant maps onto one HTTP status.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing, malformed or expired bearer token.
    #[error("Unauthorized")]
    Unauthenticated,

    /// Valid token, insufficient role.
    #[error("Access denied")]
    Forbidden,

    #[error("{0}")]
    Validation(String),

    /// The operation is not allowed in the resource's current status.
    #[error("{0}")]
    State(String),

    /// Absent, or not owned by the caller. The two cases are reported identically.
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    /// Detail is logged, never returned.
    #[error("Internal Server Error")]
    Internal(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into())
    }

    pub fn state(message: impl Into<String>) -> Self {
        AppError::State(message.into())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Validation(_) | AppError::State(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate(what) => AppError::Conflict(format!("{what} already exists")),
            other => {
                tracing::error!(error = %other, "store operation failed");
                AppError::Internal(other.to_string())
            }
        }
    }
}
