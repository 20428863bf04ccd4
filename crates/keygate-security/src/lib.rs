//! # Keygate Security
//! 
//! Security primitives: token codec, password hashing, session ids and
//! constant-time comparison.

pub mod jwt;
pub mod password;
pub mod session;
pub mod compare;

pub use jwt::{Claims, IssuedToken, TokenCodec, TokenError, TokenKind};
pub use password::{PasswordError, PasswordHasher, PasswordService};
pub use session::generate_session_id;
pub use compare::constant_time_eq;
