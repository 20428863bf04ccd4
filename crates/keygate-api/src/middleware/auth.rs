//! Bearer token authentication for protected routes

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

/// Pull the token out of `Authorization: Bearer <token>`.
///
/// The header must split on a single space into exactly two parts, with the
/// scheme matched case-insensitively and a non-empty token.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| ApiError::Unauthorized("Authorization header is missing".into()))?
        .to_str()
        .map_err(|_| ApiError::Unauthorized("Authorization header is not valid text".into()))?;

    let parts: Vec<&str> = value.split(' ').collect();
    match parts.as_slice() {
        [scheme, token] if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() => Ok(token),
        _ => Err(ApiError::Unauthorized("Invalid authorization header format".into())),
    }
}

/// Rejects the request unless its bearer token is the live token of its session
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(request.headers())?.to_owned();
    let identity = state.guard.authorize(&token).await?;

    debug!("Authenticated user {}", identity.user_id);
    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}
