//! JWT token handling

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use keygate_shared::config::JwtSettings;
use keygate_shared::constants::{TOKEN_TYPE_ACCESS, TOKEN_TYPE_REFRESH};

const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token is malformed")]
    Malformed,
    #[error("Token signature is invalid")]
    InvalidSignature,
    #[error("Token expired")]
    Expired,
    #[error("Signing secret must not be empty")]
    InvalidSecret,
    #[error("Token creation failed: {0}")]
    Signing(String),
}

/// Distinguishes short-lived access tokens from refresh tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => TOKEN_TYPE_ACCESS,
            TokenKind::Refresh => TOKEN_TYPE_REFRESH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    /// Session id; empty when the token carries none
    #[serde(default)]
    pub sid: String,
    pub iat: i64,
    pub exp: i64,
    #[serde(default)]
    pub jti: String,
    pub token_type: TokenKind,
}

impl Claims {
    pub fn user_id(&self) -> Result<Uuid, TokenError> {
        Uuid::parse_str(&self.sub).map_err(|_| TokenError::Malformed)
    }
}

/// A freshly signed token and its expiry (unix seconds)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: i64,
}

/// Signs and verifies HS256 tokens with a process-wide secret.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenCodec {
    pub fn new(secret: &str, access_ttl_secs: i64, refresh_ttl_secs: i64) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::InvalidSecret);
        }

        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            access_ttl: Duration::seconds(access_ttl_secs),
            refresh_ttl: Duration::seconds(refresh_ttl_secs),
        })
    }

    pub fn from_settings(settings: &JwtSettings) -> Result<Self, TokenError> {
        Self::new(
            &settings.secret,
            settings.access_token_expiry,
            settings.refresh_token_expiry,
        )
    }

    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    pub fn issue_access_token(&self, user_id: &Uuid, session_id: &str) -> Result<IssuedToken, TokenError> {
        self.issue_at(user_id, session_id, TokenKind::Access, Utc::now())
    }

    pub fn issue_refresh_token(&self, user_id: &Uuid, session_id: &str) -> Result<IssuedToken, TokenError> {
        self.issue_at(user_id, session_id, TokenKind::Refresh, Utc::now())
    }

    /// Issue a token as if it had been signed at `issued_at`.
    pub fn issue_at(
        &self,
        user_id: &Uuid,
        session_id: &str,
        kind: TokenKind,
        issued_at: DateTime<Utc>,
    ) -> Result<IssuedToken, TokenError> {
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };
        let expires_at = (issued_at + ttl).timestamp();

        let claims = Claims {
            sub: user_id.to_string(),
            sid: session_id.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at,
            jti: Uuid::new_v4().simple().to_string(),
            token_type: kind,
        };

        let token = encode(&Header::new(SIGNING_ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Check signature, algorithm and expiry, returning the embedded claims.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature
                | ErrorKind::InvalidAlgorithm
                | ErrorKind::InvalidAlgorithmName => TokenError::InvalidSignature,
                _ => TokenError::Malformed,
            })
    }
}
