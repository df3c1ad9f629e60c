//! Custom error types for the API service

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::{
    jwt::TokenError,
    services::ServiceError,
    validation::FieldError,
};

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed input, with the offending fields
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    /// Missing or malformed credentials
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Token has expired")]
    TokenExpired,

    #[error("Invalid token")]
    TokenInvalid,

    /// Authenticated but lacking the required role or ownership
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl ApiError {
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        ApiError::Validation(vec![FieldError {
            field: field.to_string(),
            message: message.into(),
        }])
    }

    /// Status code, machine-readable code and client-safe message
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            ApiError::Validation(_) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_failed",
                "Failed to validate request".to_string(),
            ),
            ApiError::Unauthenticated(msg) => {
                (StatusCode::UNAUTHORIZED, "unauthenticated", msg.clone())
            }
            ApiError::TokenExpired => (
                StatusCode::UNAUTHORIZED,
                "token_expired",
                "Token has expired".to_string(),
            ),
            ApiError::TokenInvalid => (
                StatusCode::UNAUTHORIZED,
                "token_invalid",
                "Invalid token".to_string(),
            ),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg.clone()),
            ApiError::Service(err) => match err {
                ServiceError::JointNotFound => {
                    (StatusCode::NOT_FOUND, "not_found", "Joint not found".to_string())
                }
                ServiceError::ComplaintNotFound => (
                    StatusCode::NOT_FOUND,
                    "not_found",
                    "Complaint not found".to_string(),
                ),
                ServiceError::AlreadyExists(entity) => (
                    StatusCode::CONFLICT,
                    "already_exists",
                    format!("{} already exists", entity),
                ),
                ServiceError::InvalidCredentials => (
                    StatusCode::UNAUTHORIZED,
                    "invalid_credentials",
                    "Invalid credentials".to_string(),
                ),
                ServiceError::RadiusExceeded { max, .. } => (
                    StatusCode::BAD_REQUEST,
                    "radius_exceeded",
                    format!("Maximum search radius of {} meters exceeded", max),
                ),
                ServiceError::ComplaintAlreadyResolved => (
                    StatusCode::CONFLICT,
                    "conflict",
                    "Complaint is already resolved".to_string(),
                ),
                ServiceError::Persistence(_) | ServiceError::Internal(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal server error".to_string(),
                ),
            },
        }
    }

    pub fn status(&self) -> StatusCode {
        self.parts().0
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => ApiError::TokenExpired,
            TokenError::Invalid => ApiError::TokenInvalid,
        }
    }
}

impl From<Vec<FieldError>> for ApiError {
    fn from(errors: Vec<FieldError>) -> Self {
        ApiError::Validation(errors)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::field("body", rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::field("query", rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::field("id", rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        if status.is_server_error() {
            error!("Request failed: {}", self);
        }

        let body = match self {
            ApiError::Validation(detail) => Json(json!({
                "error": message,
                "code": code,
                "detail": detail,
            })),
            _ => Json(json!({
                "error": message,
                "code": code,
            })),
        };

        (status, body).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
