//! Per-request access token check against the session store

use std::sync::Arc;

use tracing::{debug, error};

use keygate_security::{constant_time_eq, TokenCodec, TokenError, TokenKind};

use crate::domain::AuthenticatedIdentity;
use crate::error::DomainError;
use crate::repositories::SessionStore;

/// Accepts an access token only while it is the one recorded for its session.
#[derive(Clone)]
pub struct SessionGuard {
    codec: Arc<TokenCodec>,
    sessions: Arc<dyn SessionStore>,
}

impl SessionGuard {
    pub fn new(codec: Arc<TokenCodec>, sessions: Arc<dyn SessionStore>) -> Self {
        Self { codec, sessions }
    }

    pub async fn authorize(&self, token: &str) -> Result<AuthenticatedIdentity, DomainError> {
        let claims = self.codec.verify(token).map_err(|e| {
            debug!("Access token rejected: {}", e);
            match e {
                TokenError::Expired => DomainError::Unauthorized("Token expired".into()),
                _ => DomainError::Unauthorized("Invalid or expired token".into()),
            }
        })?;

        if claims.token_type != TokenKind::Access {
            return Err(DomainError::Unauthorized("Access token required".into()));
        }
        if claims.sid.is_empty() {
            return Err(DomainError::Unauthorized("Session ID is missing from token".into()));
        }
        let user_id = claims
            .user_id()
            .map_err(|_| DomainError::Unauthorized("Invalid token subject".into()))?;

        let stored = self
            .sessions
            .get(&claims.sid)
            .await
            .map_err(|e| {
                error!("Session lookup failed: {}", e);
                DomainError::from(e)
            })?
            .ok_or_else(|| DomainError::Unauthorized("Session is invalid or expired".into()))?;

        if !constant_time_eq(&stored, token) {
            debug!("Token superseded for session of user {}", user_id);
            return Err(DomainError::Unauthorized("Token does not match session".into()));
        }

        Ok(AuthenticatedIdentity {
            user_id,
            session_id: claims.sid,
        })
    }
}
