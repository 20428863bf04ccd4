//! # Keygate Shared
//! 
//! Shared configuration, constants, telemetry and helpers for the Keygate workspace.

pub mod constants;
pub mod types;
pub mod utils;
pub mod telemetry;
pub mod config;
pub mod error;

pub use types::*;
pub use error::AppError;
