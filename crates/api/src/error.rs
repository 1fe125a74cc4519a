//! HTTP error mapping

use crate::handlers::ApiResponse;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bankdesk_business::BusinessError;

/// Errors a handler can return
#[derive(Debug)]
pub enum ApiError {
    Unauthorized(String),
    BadRequest(String),
    /// An extractor refused the request; keeps axum's status
    Rejected(StatusCode, String),
    Business(BusinessError),
}

impl From<BusinessError> for ApiError {
    fn from(err: BusinessError) -> Self {
        Self::Business(err)
    }
}

pub fn status_for(err: &BusinessError) -> StatusCode {
    match err {
        BusinessError::InvalidAmount(_)
        | BusinessError::InvalidEntryType(_)
        | BusinessError::Validation(_)
        | BusinessError::InsufficientBalance { .. }
        | BusinessError::SameAccountTransfer => StatusCode::BAD_REQUEST,
        BusinessError::NotOwner { .. } | BusinessError::Forbidden(_) => StatusCode::FORBIDDEN,
        BusinessError::NotFound { .. } => StatusCode::NOT_FOUND,
        BusinessError::AlreadyExists { .. } | BusinessError::Conflict(_) => StatusCode::CONFLICT,
        BusinessError::AlreadyCommitted | BusinessError::Internal(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Rejected(status, msg) => (status, msg),
            ApiError::Business(err) => {
                let status = status_for(&err);
                if status == StatusCode::INTERNAL_SERVER_ERROR {
                    tracing::error!(error = %err, "request failed");
                    (status, "internal server error".to_string())
                } else {
                    (status, err.to_string())
                }
            }
        };
        (status, ApiResponse::<()>::error(message)).into_response()
    }
}
