//! Common utilities shared by the connector and the bootstrap binary.
//!
//! This crate provides:
//! - Error types for cache operations and connection establishment
//! - Cache settings loaded from the environment

pub mod config;
pub mod error;

pub use config::{environment_mode, CacheSettings, ENV_PROFILE_VAR};
pub use error::{
    AppError, AppResult, CacheError, CacheResult, ConnectionEstablishmentError, Interrupted,
};
