//! Protected user endpoints

use axum::{extract::State, Extension, Json};

use keygate_core::domain::AuthenticatedIdentity;

use crate::dto::UserDto;
use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Current user - GET /api/v1/users/me
pub async fn me(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthenticatedIdentity>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let user = state.auth.current_user(&identity.user_id).await?;
    Ok(Json(ApiResponse::success(UserDto::from(&user))))
}
