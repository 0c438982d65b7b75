//! Mapping from domain errors to HTTP responses.
//!
//! Every failure carries a stable machine-readable `code` so clients can
//! branch on the category instead of the message text.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::types::ErrorResponse;
use crate::auth::AuthError;
use crate::chat::{ChatError, CHAT_UNAVAILABLE_MESSAGE};
use crate::task::{StoreError, ValidationError};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    #[error(transparent)]
    NotSupported(#[from] StoreError),

    #[error(transparent)]
    Chat(#[from] ChatError),

    #[error("{0}")]
    Internal(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(ValidationError::MalformedBody(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::InvalidFilter(rejection.body_text())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Auth(AuthError::Signing(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
            ApiError::Validation(_) | ApiError::InvalidFilter(_) => StatusCode::BAD_REQUEST,
            ApiError::NotSupported(_) => StatusCode::NOT_IMPLEMENTED,
            ApiError::Chat(ChatError::EmptyMessage) => StatusCode::BAD_REQUEST,
            ApiError::Chat(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Auth(AuthError::Unauthenticated) => "UNAUTHENTICATED",
            ApiError::Auth(AuthError::InvalidToken) => "INVALID_TOKEN",
            ApiError::Auth(AuthError::InvalidCredentials) => "INVALID_CREDENTIALS",
            ApiError::Auth(AuthError::Signing(_)) => "INTERNAL_ERROR",
            ApiError::Validation(ValidationError::MissingName) => "MISSING_NAME",
            ApiError::Validation(ValidationError::InvalidStatus(_)) => "INVALID_STATUS",
            ApiError::Validation(ValidationError::InvalidDueDate(_)) => "INVALID_DUE_DATE",
            ApiError::Validation(ValidationError::MalformedBody(_)) => "MALFORMED_BODY",
            ApiError::InvalidFilter(_) => "INVALID_FILTER",
            ApiError::NotSupported(_) => "NOT_IMPLEMENTED",
            ApiError::Chat(ChatError::EmptyMessage) => "EMPTY_MESSAGE",
            ApiError::Chat(_) => "CHAT_UNAVAILABLE",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Message safe to show the caller. Internal detail stays in the log.
    fn public_message(&self) -> String {
        match self {
            ApiError::Auth(AuthError::Signing(_)) | ApiError::Internal(_) => {
                "Internal Server Error".to_string()
            }
            ApiError::Chat(ChatError::EmptyMessage) => self.to_string(),
            ApiError::Chat(_) => CHAT_UNAVAILABLE_MESSAGE.to_string(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Auth(AuthError::Signing(_)) | ApiError::Internal(_) => {
                tracing::error!("Internal error: {}", self);
            }
            ApiError::Chat(ChatError::EmptyMessage) => {}
            ApiError::Chat(e) => tracing::warn!("Chat assistant unavailable: {}", e),
            ApiError::Auth(e) => tracing::debug!("Rejected request: {}", e),
            _ => {}
        }

        let body = ErrorResponse {
            error: self.public_message(),
            code: self.code().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::from(AuthError::Unauthenticated).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::from(AuthError::InvalidToken).code(),
            "INVALID_TOKEN"
        );
        assert_eq!(
            ApiError::from(ValidationError::MissingName).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(StoreError::NotSupported("deleting tasks")).status(),
            StatusCode::NOT_IMPLEMENTED
        );
        assert_eq!(
            ApiError::from(ChatError::Transport("refused".to_string())).status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_internal_detail_hidden() {
        let err = ApiError::Internal("lock poisoned at store.rs:42".to_string());
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "Internal Server Error");

        let err = ApiError::from(ChatError::Upstream {
            status: 500,
            body: "Traceback ...".to_string(),
        });
        assert_eq!(err.public_message(), CHAT_UNAVAILABLE_MESSAGE);
    }
}
