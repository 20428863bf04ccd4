//! # Keygate Core
//! 
//! Domain entities, ports and the session/token lifecycle services.

pub mod domain;
pub mod services;
pub mod repositories;
pub mod error;

// Re-export domain entities
pub use domain::*;
pub use error::{DomainError, SessionStoreError};
pub use services::{AuthService, SessionGuard};
