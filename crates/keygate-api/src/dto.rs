//! Request and response payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use keygate_core::domain::{LoginResult, RefreshResult, User};

const BEARER: &str = "Bearer";

/// Login request payload
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RefreshRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Either token of the session may be presented
#[derive(Debug, Deserialize, Validate)]
pub struct LogoutRequest {
    #[serde(alias = "token")]
    #[validate(length(min = 1, message = "Token is required"))]
    pub refresh_token: String,
}

/// Register request payload
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub last_name: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    /// Access token expiry, unix seconds
    pub expires_at: i64,
}

impl From<LoginResult> for TokenResponse {
    fn from(result: LoginResult) -> Self {
        Self {
            access_token: result.access_token,
            refresh_token: result.refresh_token,
            token_type: BEARER,
            expires_at: result.expires_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_at: i64,
}

impl From<RefreshResult> for RefreshResponse {
    fn from(result: RefreshResult) -> Self {
        Self {
            access_token: result.access_token,
            token_type: BEARER,
            expires_at: result.expires_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub success: bool,
}

/// User DTO for responses
#[derive(Debug, Serialize)]
pub struct UserDto {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            full_name: user.full_name(),
            active: user.is_active,
            created_at: user.created_at,
            updated_at: user.modified_at,
        }
    }
}
