//! Application-wide constants

pub const TOKEN_TYPE_ACCESS: &str = "access";
pub const TOKEN_TYPE_REFRESH: &str = "refresh";

/// Access token lifetime in seconds (24 hours)
pub const DEFAULT_ACCESS_TOKEN_EXPIRY: i64 = 86_400;

/// Refresh token lifetime in seconds (7 days)
pub const DEFAULT_REFRESH_TOKEN_EXPIRY: i64 = 604_800;

pub const DEFAULT_SESSION_KEY_PREFIX: &str = "session:";
pub const DEFAULT_REDIS_TIMEOUT_MS: u64 = 2_000;
pub const DEFAULT_SESSION_PURGE_INTERVAL_SECS: u64 = 300;

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Secrets shorter than this are accepted but logged as weak
pub const RECOMMENDED_SECRET_LENGTH: usize = 32;
