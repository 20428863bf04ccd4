//! Repository and store traits (ports)

pub mod user_repository;
pub mod session_store;

pub use user_repository::UserRepository;
pub use session_store::SessionStore;

#[cfg(test)]
pub use user_repository::MockUserRepository;
#[cfg(test)]
pub use session_store::MockSessionStore;
