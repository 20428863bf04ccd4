// ============================================================================
// Keygate API - Auth Handlers
// File: crates/keygate-api/src/handlers/auth.rs
// ============================================================================
//! Authentication HTTP handlers (login, refresh, logout, register)

use axum::{extract::State, http::StatusCode, Json};

use crate::dto::{
    LoginRequest, LogoutRequest, LogoutResponse, RefreshRequest, RefreshResponse, RegisterRequest,
    TokenResponse, UserDto,
};
use crate::error::ApiError;
use crate::extract::ValidatedJson;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Login handler - POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<TokenResponse>>, ApiError> {
    let result = state.auth.login(&payload.email, &payload.password).await?;
    Ok(Json(ApiResponse::success(result.into())))
}

/// Refresh token handler - POST /api/v1/auth/refresh
pub async fn refresh_token(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RefreshRequest>,
) -> Result<Json<ApiResponse<RefreshResponse>>, ApiError> {
    let result = state.auth.refresh_token(&payload.refresh_token).await?;
    Ok(Json(ApiResponse::success(result.into())))
}

/// Logout handler - POST /api/v1/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LogoutRequest>,
) -> Result<Json<ApiResponse<LogoutResponse>>, ApiError> {
    let result = state.auth.logout(&payload.refresh_token).await?;
    Ok(Json(ApiResponse::success(LogoutResponse {
        success: result.success,
    })))
}

/// Register handler - POST /api/v1/auth/register
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserDto>>), ApiError> {
    let user = state
        .auth
        .register(
            &payload.email,
            &payload.password,
            &payload.first_name,
            &payload.last_name,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(UserDto::from(&user)))))
}
