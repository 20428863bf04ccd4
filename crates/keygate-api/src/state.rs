use std::sync::Arc;

use keygate_core::repositories::SessionStore;
use keygate_core::services::{AuthService, SessionGuard};

/// Shared handler state; every field is cheap to clone
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub guard: SessionGuard,
    pub sessions: Arc<dyn SessionStore>,
}

impl AppState {
    pub fn new(auth: Arc<AuthService>, guard: SessionGuard, sessions: Arc<dyn SessionStore>) -> Self {
        Self { auth, guard, sessions }
    }
}
