// ============================================================================
// Keygate Infrastructure - Redis Session Store
// File: crates/keygate-infrastructure/src/cache/redis_store.rs
// ============================================================================
//! Session entries as plain Redis strings: `{prefix}{session_id} -> token`,
//! expiring through the key TTL.

use std::time::Duration;

use async_trait::async_trait;
use deadpool_redis::redis::{self, FromRedisValue};
use deadpool_redis::{Config, Pool, PoolConfig, Runtime};
use tokio::time::timeout;
use tracing::{debug, warn};

use keygate_core::error::SessionStoreError;
use keygate_core::repositories::SessionStore;
use keygate_shared::config::RedisSettings;

/// Build the connection pool; no connection is opened until first use.
pub fn create_redis_pool(settings: &RedisSettings) -> Result<Pool, SessionStoreError> {
    let mut cfg = Config::from_url(settings.url.clone());
    cfg.pool = Some(PoolConfig::new(settings.max_connections));

    cfg.create_pool(Some(Runtime::Tokio1))
        .map_err(|e| SessionStoreError::Unavailable(e.to_string()))
}

pub struct RedisSessionStore {
    pool: Pool,
    key_prefix: String,
    op_timeout: Duration,
}

impl RedisSessionStore {
    pub fn new(pool: Pool, key_prefix: impl Into<String>, op_timeout: Duration) -> Self {
        Self {
            pool,
            key_prefix: key_prefix.into(),
            op_timeout,
        }
    }

    pub fn from_settings(pool: Pool, settings: &RedisSettings) -> Self {
        Self::new(
            pool,
            settings.key_prefix.clone(),
            Duration::from_millis(settings.timeout_ms),
        )
    }

    fn key(&self, session_id: &str) -> String {
        format!("{}{}", self.key_prefix, session_id)
    }

    /// Run one command with the per-operation deadline covering pool checkout too
    async fn exec<T>(&self, cmd: redis::Cmd) -> Result<T, SessionStoreError>
    where
        T: FromRedisValue + Send,
    {
        let op = async {
            let mut conn = self.pool.get().await.map_err(|e| {
                warn!("Redis pool checkout failed: {}", e);
                SessionStoreError::Unavailable(e.to_string())
            })?;

            cmd.query_async::<T>(&mut conn).await.map_err(|e| {
                warn!("Redis command failed: {}", e);
                SessionStoreError::Unavailable(e.to_string())
            })
        };

        match timeout(self.op_timeout, op).await {
            Ok(result) => result,
            Err(_) => {
                warn!("Redis operation exceeded {:?}", self.op_timeout);
                Err(SessionStoreError::Timeout(self.op_timeout))
            }
        }
    }
}

/// Redis `EX` takes whole seconds; never round a live entry down to zero
fn ttl_secs(ttl: Duration) -> u64 {
    let secs = ttl.as_secs() + u64::from(ttl.subsec_nanos() > 0);
    secs.max(1)
}

fn set_cmd(key: &str, value: &str, ttl: Duration, only_existing: bool) -> redis::Cmd {
    let mut cmd = redis::cmd("SET");
    cmd.arg(key).arg(value);
    if only_existing {
        cmd.arg("XX");
    }
    cmd.arg("EX").arg(ttl_secs(ttl));
    cmd
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn put(&self, session_id: &str, access_token: &str, ttl: Duration) -> Result<(), SessionStoreError> {
        let reply: Option<String> = self
            .exec(set_cmd(&self.key(session_id), access_token, ttl, false))
            .await?;
        debug!("Session stored ({:?})", reply);
        Ok(())
    }

    async fn replace(&self, session_id: &str, access_token: &str, ttl: Duration) -> Result<bool, SessionStoreError> {
        // SET .. XX replies nil when the key is gone
        let reply: Option<String> = self
            .exec(set_cmd(&self.key(session_id), access_token, ttl, true))
            .await?;
        Ok(reply.is_some())
    }

    async fn get(&self, session_id: &str) -> Result<Option<String>, SessionStoreError> {
        let mut cmd = redis::cmd("GET");
        cmd.arg(self.key(session_id));
        self.exec(cmd).await
    }

    async fn delete(&self, session_id: &str) -> Result<(), SessionStoreError> {
        let mut cmd = redis::cmd("DEL");
        cmd.arg(self.key(session_id));
        let removed: i64 = self.exec(cmd).await?;
        debug!("Session delete removed {} key(s)", removed);
        Ok(())
    }

    async fn ping(&self) -> Result<(), SessionStoreError> {
        let _: String = self.exec(redis::cmd("PING")).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_for(url: &str, timeout_ms: u64) -> RedisSessionStore {
        let settings = RedisSettings {
            url: url.to_string(),
            max_connections: 2,
            timeout_ms,
            key_prefix: "test-session:".to_string(),
        };
        let pool = create_redis_pool(&settings).unwrap();
        RedisSessionStore::from_settings(pool, &settings)
    }

    #[test]
    fn test_ttl_rounds_up_to_whole_seconds() {
        assert_eq!(ttl_secs(Duration::from_secs(86_400)), 86_400);
        assert_eq!(ttl_secs(Duration::from_millis(1_500)), 2);
        assert_eq!(ttl_secs(Duration::from_millis(1)), 1);
        assert_eq!(ttl_secs(Duration::ZERO), 1);
    }

    #[test]
    fn test_set_command_shape() {
        let plain = set_cmd("session:abc", "tok", Duration::from_secs(60), false);
        let guarded = set_cmd("session:abc", "tok", Duration::from_secs(60), true);

        let args = |cmd: &redis::Cmd| {
            cmd.args_iter()
                .map(|a| match a {
                    redis::Arg::Simple(bytes) => String::from_utf8_lossy(bytes).into_owned(),
                    redis::Arg::Cursor => "<cursor>".to_string(),
                })
                .collect::<Vec<_>>()
        };

        assert_eq!(args(&plain), ["SET", "session:abc", "tok", "EX", "60"]);
        assert_eq!(args(&guarded), ["SET", "session:abc", "tok", "XX", "EX", "60"]);
    }

    #[tokio::test]
    async fn test_unreachable_server_reports_store_error() {
        // Nothing listens on port 1
        let store = store_for("redis://127.0.0.1:1", 500);

        let err = store.get("abc").await.unwrap_err();
        assert!(matches!(
            err,
            SessionStoreError::Unavailable(_) | SessionStoreError::Timeout(_)
        ));
        assert!(store.ping().await.is_err());
    }

    /// Needs a live server: `REDIS_URL=redis://127.0.0.1:6379 cargo test -- --ignored`
    #[tokio::test]
    #[ignore]
    async fn test_session_lifecycle_against_redis() {
        let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".into());
        let store = store_for(&url, 2_000);
        let sid = uuid::Uuid::new_v4().to_string();
        let ttl = Duration::from_secs(30);

        store.ping().await.unwrap();
        assert!(!store.replace(&sid, "t0", ttl).await.unwrap());
        assert_eq!(store.get(&sid).await.unwrap(), None);

        store.put(&sid, "t1", ttl).await.unwrap();
        assert_eq!(store.get(&sid).await.unwrap().as_deref(), Some("t1"));

        assert!(store.replace(&sid, "t2", ttl).await.unwrap());
        assert_eq!(store.get(&sid).await.unwrap().as_deref(), Some("t2"));

        store.delete(&sid).await.unwrap();
        store.delete(&sid).await.unwrap();
        assert_eq!(store.get(&sid).await.unwrap(), None);
    }
}
