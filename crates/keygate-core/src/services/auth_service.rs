// ============================================================================
// Keygate Core - Authentication Service
// File: crates/keygate-core/src/services/auth_service.rs
// ============================================================================
//! Login, refresh, logout and registration flows

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::OnceCell;
use tracing::{error, info, warn};
use uuid::Uuid;

use keygate_security::{
    generate_session_id, PasswordError, PasswordHasher, TokenCodec, TokenError, TokenKind,
};
use keygate_shared::constants::{MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH};
use keygate_shared::utils::{mask_email, normalize_email};

use crate::domain::{LoginResult, LogoutResult, RefreshResult, User};
use crate::error::DomainError;
use crate::repositories::{SessionStore, UserRepository};

/// Verified against when the email is unknown so both failure paths cost a hash check
const TIMING_EQUALIZER_PASSWORD: &str = "keygate-timing-equalizer";

/// Authentication service owning the session lifecycle
pub struct AuthService {
    user_repo: Arc<dyn UserRepository>,
    sessions: Arc<dyn SessionStore>,
    hasher: Arc<dyn PasswordHasher>,
    codec: Arc<TokenCodec>,
    session_ttl: Duration,
    timing_hash: OnceCell<Option<String>>,
}

impl AuthService {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        sessions: Arc<dyn SessionStore>,
        hasher: Arc<dyn PasswordHasher>,
        codec: Arc<TokenCodec>,
    ) -> Self {
        // The session entry lives exactly as long as the access token it holds
        let session_ttl = Duration::from_secs(codec.access_ttl().num_seconds().max(0) as u64);

        Self {
            user_repo,
            sessions,
            hasher,
            codec,
            session_ttl,
            timing_hash: OnceCell::new(),
        }
    }

    /// Login with email and password
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResult, DomainError> {
        let masked = mask_email(email);
        info!("Login attempt for email: {}", masked);

        // 1. Find user by email
        let user = match self.user_repo.find_by_email(&normalize_email(email)).await? {
            Some(user) => user,
            None => {
                self.equalize_timing(password).await;
                warn!("Login failed: email not found: {}", masked);
                return Err(DomainError::InvalidCredentials);
            }
        };

        // 2. Verify password before the account state so both cost the same
        let password_valid = self
            .verify_password(password, &user.password_hash)
            .await?
            .unwrap_or_else(|e| {
                error!("Stored password hash unusable for user {}: {}", user.id, e);
                false
            });

        if !password_valid {
            warn!("Login failed: invalid password for: {}", masked);
            return Err(DomainError::InvalidCredentials);
        }

        // 3. Check if user can login
        if !user.can_login() {
            warn!("Login failed: account disabled for: {}", masked);
            return Err(DomainError::InvalidCredentials);
        }

        // 4. Generate tokens bound to a fresh session
        let session_id = generate_session_id();
        let access = self
            .codec
            .issue_access_token(&user.id, &session_id)
            .map_err(|e| DomainError::TokenGenerationError(e.to_string()))?;
        let refresh = self
            .codec
            .issue_refresh_token(&user.id, &session_id)
            .map_err(|e| DomainError::TokenGenerationError(e.to_string()))?;

        // 5. Record the session
        if let Err(e) = self.sessions.put(&session_id, &access.token, self.session_ttl).await {
            error!("Failed to store session for user {}: {}", user.id, e);
            // A timed out write may still have landed
            if let Err(cleanup) = self.sessions.delete(&session_id).await {
                warn!("Session cleanup after failed login also failed: {}", cleanup);
            }
            return Err(e.into());
        }

        info!("Login successful for: {}", masked);

        Ok(LoginResult {
            access_token: access.token,
            refresh_token: refresh.token,
            expires_at: access.expires_at,
        })
    }

    /// Exchange a refresh token for a new access token in the same session.
    ///
    /// The refresh token itself is not rotated; it stays usable until it
    /// expires or the session is logged out.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<RefreshResult, DomainError> {
        let claims = self.codec.verify(refresh_token).map_err(|e| match e {
            TokenError::Expired => DomainError::TokenExpired,
            other => DomainError::InvalidToken(other.to_string()),
        })?;

        if claims.token_type != TokenKind::Refresh {
            return Err(DomainError::InvalidToken("Not a refresh token".into()));
        }
        if claims.sid.is_empty() {
            return Err(DomainError::InvalidToken("Session ID is missing from token".into()));
        }
        let user_id = claims
            .user_id()
            .map_err(|e| DomainError::InvalidToken(e.to_string()))?;

        let access = self
            .codec
            .issue_access_token(&user_id, &claims.sid)
            .map_err(|e| DomainError::TokenGenerationError(e.to_string()))?;

        let replaced = self
            .sessions
            .replace(&claims.sid, &access.token, self.session_ttl)
            .await
            .map_err(|e| {
                error!("Failed to update session for user {}: {}", user_id, e);
                DomainError::from(e)
            })?;

        if !replaced {
            warn!("Refresh rejected: session no longer active for user {}", user_id);
            return Err(DomainError::InvalidToken("Session is no longer active".into()));
        }

        info!("Access token refreshed for user {}", user_id);

        Ok(RefreshResult {
            access_token: access.token,
            expires_at: access.expires_at,
        })
    }

    /// End the session named by an access or refresh token. Idempotent.
    pub async fn logout(&self, token: &str) -> Result<LogoutResult, DomainError> {
        let claims = self
            .codec
            .verify(token)
            .map_err(|e| DomainError::InvalidToken(e.to_string()))?;

        if claims.sid.is_empty() {
            return Err(DomainError::InvalidToken("Session ID is missing from token".into()));
        }

        self.sessions.delete(&claims.sid).await.map_err(|e| {
            error!("Failed to delete session for user {}: {}", claims.sub, e);
            DomainError::from(e)
        })?;

        info!("Logout successful for user {}", claims.sub);
        Ok(LogoutResult { success: true })
    }

    /// Register a new user
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<User, DomainError> {
        let email = normalize_email(email);
        let masked = mask_email(&email);
        info!("Registration attempt for email: {}", masked);

        let password_len = password.chars().count();
        if password_len < MIN_PASSWORD_LENGTH {
            return Err(DomainError::ValidationError(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }
        if password_len > MAX_PASSWORD_LENGTH {
            return Err(DomainError::ValidationError(format!(
                "Password must be at most {} characters",
                MAX_PASSWORD_LENGTH
            )));
        }

        // 1. Check if email already exists
        if self.user_repo.find_by_email(&email).await?.is_some() {
            warn!("Registration failed: email already exists: {}", masked);
            return Err(DomainError::EmailAlreadyExists(email));
        }

        // 2. Hash password
        let password_hash = self
            .hash_password(password)
            .await?
            .map_err(|e| DomainError::PasswordHashError(e.to_string()))?;

        // 3. Create user entity
        let user = User::new(
            email,
            password_hash,
            first_name.to_string(),
            last_name.to_string(),
        )
        .map_err(|e| DomainError::ValidationError(e.to_string()))?;

        // 4. Save to database
        let created = self.user_repo.create(&user).await?;

        info!("Registration successful for: {}", masked);
        Ok(created)
    }

    /// Profile of the authenticated caller
    pub async fn current_user(&self, user_id: &Uuid) -> Result<User, DomainError> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .filter(|user| !user.is_deleted())
            .ok_or(DomainError::UserNotFound)
    }

    /// Password hashing and verification both run on the blocking pool
    async fn hash_password(&self, password: &str) -> Result<Result<String, PasswordError>, DomainError> {
        let hasher = self.hasher.clone();
        let password = password.to_owned();

        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| DomainError::InternalError(format!("Password hashing task failed: {}", e)))
    }

    async fn verify_password(&self, password: &str, hash: &str) -> Result<Result<bool, PasswordError>, DomainError> {
        let hasher = self.hasher.clone();
        let (password, hash) = (password.to_owned(), hash.to_owned());

        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| DomainError::InternalError(format!("Password verification task failed: {}", e)))
    }

    async fn equalize_timing(&self, password: &str) {
        let dummy = self
            .timing_hash
            .get_or_init(|| async { self.hash_password(TIMING_EQUALIZER_PASSWORD).await.ok()?.ok() })
            .await;

        if let Some(hash) = dummy {
            if let Err(e) = self.verify_password(password, hash).await {
                warn!("Timing equalizer verification failed: {}", e);
            }
        }
    }
}
