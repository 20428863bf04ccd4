//! Session and token results handed back to callers

use serde::Serialize;
use uuid::Uuid;

/// Identity derived from a verified access token, attached per request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticatedIdentity {
    pub user_id: Uuid,
    pub session_id: String,
}

/// Result of successful login
#[derive(Debug, Clone)]
pub struct LoginResult {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token expiry, unix seconds
    pub expires_at: i64,
}

/// Result of successful refresh
#[derive(Debug, Clone)]
pub struct RefreshResult {
    pub access_token: String,
    pub expires_at: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogoutResult {
    pub success: bool,
}
