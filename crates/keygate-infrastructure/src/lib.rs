//! # Keygate Infrastructure
//! 
//! Database and session store implementations (adapters).

pub mod database;
pub mod cache;

pub use database::{create_pool, run_migrations, PgUserRepository};
pub use cache::{create_redis_pool, MemorySessionStore, RedisSessionStore};
