//! # Keygate Core - Domain Module
//! 
//! Domain entities for the Keygate service.

pub mod user;
pub mod session;

pub use user::User;
pub use session::{AuthenticatedIdentity, LoginResult, LogoutResult, RefreshResult};
