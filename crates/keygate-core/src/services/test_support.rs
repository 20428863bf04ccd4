//! In-memory fakes shared by the service tests

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use keygate_security::{PasswordError, PasswordHasher, TokenCodec};
use uuid::Uuid;

use crate::domain::User;
use crate::error::{DomainError, SessionStoreError};
use crate::repositories::{SessionStore, UserRepository};
use crate::services::{AuthService, SessionGuard};

pub const SECRET: &str = "core-test-secret-long-enough-for-hs256";
pub const PASSWORD: &str = "secret-password";

#[derive(Default)]
pub struct FakeUsers {
    users: Mutex<HashMap<String, User>>,
}

impl FakeUsers {
    pub fn insert(&self, user: User) {
        self.users.lock().unwrap().insert(user.email.clone(), user);
    }
}

#[async_trait]
impl UserRepository for FakeUsers {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        Ok(self.users.lock().unwrap().get(&email.to_lowercase()).cloned())
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<User>, DomainError> {
        Ok(self.users.lock().unwrap().values().find(|u| u.id == *id).cloned())
    }

    async fn create(&self, user: &User) -> Result<User, DomainError> {
        self.insert(user.clone());
        Ok(user.clone())
    }
}

/// Ignores TTLs; expiry is covered by the real stores' own tests
#[derive(Default)]
pub struct FakeSessions {
    entries: Mutex<HashMap<String, String>>,
}

impl FakeSessions {
    pub fn raw_get(&self, session_id: &str) -> Option<String> {
        self.entries.lock().unwrap().get(session_id).cloned()
    }

    pub fn raw_put(&self, session_id: &str, token: &str) {
        self.entries.lock().unwrap().insert(session_id.to_string(), token.to_string());
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}

#[async_trait]
impl SessionStore for FakeSessions {
    async fn put(&self, session_id: &str, access_token: &str, _ttl: Duration) -> Result<(), SessionStoreError> {
        self.raw_put(session_id, access_token);
        Ok(())
    }

    async fn replace(&self, session_id: &str, access_token: &str, _ttl: Duration) -> Result<bool, SessionStoreError> {
        let mut entries = self.entries.lock().unwrap();
        match entries.get_mut(session_id) {
            Some(current) => {
                *current = access_token.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn get(&self, session_id: &str) -> Result<Option<String>, SessionStoreError> {
        Ok(self.raw_get(session_id))
    }

    async fn delete(&self, session_id: &str) -> Result<(), SessionStoreError> {
        self.entries.lock().unwrap().remove(session_id);
        Ok(())
    }

    async fn ping(&self) -> Result<(), SessionStoreError> {
        Ok(())
    }
}

/// Cheap reversible "hash" so tests don't pay for Argon2
pub struct PlainHasher;

impl PasswordHasher for PlainHasher {
    fn hash(&self, password: &str) -> Result<String, PasswordError> {
        Ok(format!("plain${}", password))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        match hash.strip_prefix("plain$") {
            Some(stored) => Ok(stored == password),
            None => Err(PasswordError::HashError("unknown hash format".into())),
        }
    }
}

pub fn codec() -> Arc<TokenCodec> {
    Arc::new(TokenCodec::new(SECRET, 24 * 3600, 7 * 24 * 3600).unwrap())
}

pub fn user(email: &str) -> User {
    User::new(
        email.to_string(),
        PlainHasher.hash(PASSWORD).unwrap(),
        "Test".to_string(),
        "User".to_string(),
    )
    .unwrap()
}

pub struct Harness {
    pub users: Arc<FakeUsers>,
    pub sessions: Arc<FakeSessions>,
    pub codec: Arc<TokenCodec>,
    pub auth: AuthService,
    pub guard: SessionGuard,
}

impl Harness {
    pub fn new() -> Self {
        let users = Arc::new(FakeUsers::default());
        let sessions = Arc::new(FakeSessions::default());
        let codec = codec();
        let auth = AuthService::new(
            users.clone(),
            sessions.clone(),
            Arc::new(PlainHasher),
            codec.clone(),
        );
        let guard = SessionGuard::new(codec.clone(), sessions.clone());
        Self { users, sessions, codec, auth, guard }
    }

    /// Harness with one registered user
    pub fn with_user(email: &str) -> (Self, User) {
        let harness = Self::new();
        let user = user(email);
        harness.users.insert(user.clone());
        (harness, user)
    }
}
