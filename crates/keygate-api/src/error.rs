use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use keygate_core::error::DomainError;

use crate::response::ApiResponse;

const INTERNAL_MESSAGE: &str = "An internal error occurred";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    TokenExpired,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Email already exists")]
    EmailExists,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidCredentials
            | ApiError::InvalidToken(_)
            | ApiError::TokenExpired
            | ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::EmailExists => StatusCode::CONFLICT,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidCredentials => "INVALID_CREDENTIALS",
            ApiError::InvalidToken(_) => "INVALID_TOKEN",
            ApiError::TokenExpired => "TOKEN_EXPIRED",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::EmailExists => "EMAIL_EXISTS",
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Text safe to hand to the client
    fn public_message(&self) -> String {
        match self {
            ApiError::InternalError(_) => INTERNAL_MESSAGE.to_string(),
            ApiError::InvalidToken(_) => "Invalid token".to_string(),
            ApiError::Unauthorized(msg)
            | ApiError::NotFound(msg)
            | ApiError::Validation(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidCredentials => ApiError::InvalidCredentials,
            DomainError::InvalidToken(msg) => ApiError::InvalidToken(msg),
            DomainError::TokenExpired => ApiError::TokenExpired,
            DomainError::Unauthorized(msg) => ApiError::Unauthorized(msg),
            DomainError::UserNotFound => ApiError::NotFound("User not found".into()),
            DomainError::EmailAlreadyExists(_) => ApiError::EmailExists,
            DomainError::ValidationError(msg) => ApiError::Validation(msg),
            internal => ApiError::InternalError(internal.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::InternalError(msg) => tracing::error!("Internal error: {}", msg),
            ApiError::InvalidToken(msg) => tracing::warn!("Invalid token: {}", msg),
            other => tracing::debug!("Request rejected: {}", other),
        }

        let body = ApiResponse::<()>::error(self.code(), &self.public_message());
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keygate_core::error::SessionStoreError;
    use std::time::Duration;

    #[test]
    fn test_domain_mapping() {
        let cases = [
            (DomainError::InvalidCredentials, StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS"),
            (DomainError::InvalidToken("x".into()), StatusCode::UNAUTHORIZED, "INVALID_TOKEN"),
            (DomainError::TokenExpired, StatusCode::UNAUTHORIZED, "TOKEN_EXPIRED"),
            (DomainError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            (DomainError::UserNotFound, StatusCode::NOT_FOUND, "NOT_FOUND"),
            (DomainError::EmailAlreadyExists("a@b.c".into()), StatusCode::CONFLICT, "EMAIL_EXISTS"),
            (DomainError::ValidationError("x".into()), StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        ];

        for (domain, status, code) in cases {
            let api = ApiError::from(domain);
            assert_eq!(api.status(), status);
            assert_eq!(api.code(), code);
        }
    }

    #[test]
    fn test_store_failure_is_500_not_401() {
        let api = ApiError::from(DomainError::from(SessionStoreError::Timeout(Duration::from_secs(2))));

        assert_eq!(api.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.public_message(), INTERNAL_MESSAGE);
    }
}
