//! Domain services (business logic)

pub mod auth_service;
pub mod session_guard;

#[cfg(test)]
mod test_support;

pub use auth_service::AuthService;
pub use session_guard::SessionGuard;
