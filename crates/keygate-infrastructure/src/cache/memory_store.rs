//! In-process session store for single-node and development deployments.
//!
//! Entries expire lazily on access; `purge_expired` sweeps the rest.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

use keygate_core::error::SessionStoreError;
use keygate_core::repositories::SessionStore;

struct Entry {
    token: String,
    expires_at: Instant,
}

impl Entry {
    fn new(token: &str, ttl: Duration) -> Self {
        Self {
            token: token.to_string(),
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

#[derive(Default)]
pub struct MemorySessionStore {
    map: DashMap<String, Entry>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Drop every expired entry, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.map.len();
        self.map.retain(|_, e| !e.is_expired(now));
        before.saturating_sub(self.map.len())
    }

    /// Sweep expired entries every `interval` until the task is aborted
    pub fn spawn_purge_task(self: Arc<Self>, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                let purged = self.purge_expired();
                if purged > 0 {
                    debug!("Purged {} expired session(s)", purged);
                }
            }
        })
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn put(&self, session_id: &str, access_token: &str, ttl: Duration) -> Result<(), SessionStoreError> {
        self.map.insert(session_id.to_string(), Entry::new(access_token, ttl));
        Ok(())
    }

    async fn replace(&self, session_id: &str, access_token: &str, ttl: Duration) -> Result<bool, SessionStoreError> {
        let now = Instant::now();
        let replaced = match self.map.get_mut(session_id) {
            Some(mut entry) if !entry.is_expired(now) => {
                *entry = Entry::new(access_token, ttl);
                true
            }
            _ => false,
        };

        if !replaced {
            self.map.remove_if(session_id, |_, e| e.is_expired(now));
        }
        Ok(replaced)
    }

    async fn get(&self, session_id: &str) -> Result<Option<String>, SessionStoreError> {
        let now = Instant::now();
        match self.map.get(session_id) {
            Some(entry) if !entry.is_expired(now) => return Ok(Some(entry.token.clone())),
            Some(_) => {}
            None => return Ok(None),
        }

        // Read guard must be gone before removing from the same shard
        self.map.remove_if(session_id, |_, e| e.is_expired(now));
        Ok(None)
    }

    async fn delete(&self, session_id: &str) -> Result<(), SessionStoreError> {
        self.map.remove(session_id);
        Ok(())
    }

    async fn ping(&self) -> Result<(), SessionStoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(60);

    #[tokio::test(start_paused = true)]
    async fn test_put_get_delete() {
        let store = MemorySessionStore::new();

        store.put("s1", "t1", TTL).await.unwrap();
        assert_eq!(store.get("s1").await.unwrap().as_deref(), Some("t1"));

        store.delete("s1").await.unwrap();
        store.delete("s1").await.unwrap();
        assert_eq!(store.get("s1").await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_ttl() {
        let store = MemorySessionStore::new();
        store.put("s1", "t1", TTL).await.unwrap();

        tokio::time::advance(Duration::from_secs(59)).await;
        assert!(store.get("s1").await.unwrap().is_some());

        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(store.get("s1").await.unwrap(), None);
        assert!(store.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_replace_requires_live_entry() {
        let store = MemorySessionStore::new();

        assert!(!store.replace("missing", "t", TTL).await.unwrap());
        assert!(store.is_empty());

        store.put("s1", "t1", TTL).await.unwrap();
        tokio::time::advance(Duration::from_secs(30)).await;
        assert!(store.replace("s1", "t2", TTL).await.unwrap());
        assert_eq!(store.get("s1").await.unwrap().as_deref(), Some("t2"));

        // replace restarts the TTL
        tokio::time::advance(Duration::from_secs(45)).await;
        assert!(store.get("s1").await.unwrap().is_some());

        tokio::time::advance(Duration::from_secs(60)).await;
        assert!(!store.replace("s1", "t3", TTL).await.unwrap());
        assert!(store.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_expired() {
        let store = MemorySessionStore::new();
        store.put("short", "a", Duration::from_secs(5)).await.unwrap();
        store.put("long", "b", TTL).await.unwrap();

        tokio::time::advance(Duration::from_secs(10)).await;

        assert_eq!(store.purge_expired(), 1);
        assert_eq!(store.len(), 1);
        assert!(store.get("long").await.unwrap().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_task_sweeps_in_background() {
        let store = Arc::new(MemorySessionStore::new());
        store.put("s1", "t1", Duration::from_secs(5)).await.unwrap();

        let handle = store.clone().spawn_purge_task(Duration::from_secs(10));
        tokio::time::sleep(Duration::from_secs(11)).await;

        assert!(store.is_empty());
        handle.abort();
    }
}
