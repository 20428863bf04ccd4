//! Session store trait (port)
//!
//! Maps a session id to the access token currently valid for it. Every
//! operation is atomic per key; there are no cross-key transactions.

use std::time::Duration;

use async_trait::async_trait;
use crate::error::SessionStoreError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Upsert `session_id -> access_token`, expiring after `ttl`
    async fn put(&self, session_id: &str, access_token: &str, ttl: Duration) -> Result<(), SessionStoreError>;

    /// Overwrite the entry only if a live one exists. Returns `false` when the
    /// session is absent or expired, in which case nothing is written.
    async fn replace(&self, session_id: &str, access_token: &str, ttl: Duration) -> Result<bool, SessionStoreError>;

    /// `None` for absent and expired entries alike
    async fn get(&self, session_id: &str) -> Result<Option<String>, SessionStoreError>;

    /// Idempotent
    async fn delete(&self, session_id: &str) -> Result<(), SessionStoreError>;

    async fn ping(&self) -> Result<(), SessionStoreError>;
}
