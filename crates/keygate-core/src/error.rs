//! Domain errors

use std::time::Duration;

use thiserror::Error;

/// Failures of the session key-value store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionStoreError {
    #[error("Session store unavailable: {0}")]
    Unavailable(String),

    #[error("Session store timed out after {0:?}")]
    Timeout(Duration),
}

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    TokenExpired,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("User not found")]
    UserNotFound,

    #[error("Email already exists: {0}")]
    EmailAlreadyExists(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Password hash error: {0}")]
    PasswordHashError(String),

    #[error("Token generation error: {0}")]
    TokenGenerationError(String),

    #[error(transparent)]
    SessionStore(#[from] SessionStoreError),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Infrastructure failures that are not the caller's fault
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            DomainError::PasswordHashError(_)
                | DomainError::TokenGenerationError(_)
                | DomainError::SessionStore(_)
                | DomainError::DatabaseError(_)
                | DomainError::InternalError(_)
        )
    }
}
