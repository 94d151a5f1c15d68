//! Unified error handling for the cache bootstrap.
//!
//! - `CacheError`: a single cache client failure
//! - `ConnectionEstablishmentError`: the fatal outcome of establishing a connection
//! - `AppError`: what the bootstrap binary reports before exiting

use domain::DomainError;
use thiserror::Error;

/// Cache client errors.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("{0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid cache configuration: {0}")]
    InvalidConfig(String),

    #[error("Cache unavailable: {0}")]
    Unavailable(String),
}

impl CacheError {
    /// Error kind name shown in diagnostics.
    pub fn kind(&self) -> String {
        match self {
            CacheError::Redis(e) => format!("{:?}", e.kind()),
            CacheError::Serialization(_) => "Serialization".to_string(),
            CacheError::InvalidConfig(_) => "InvalidConfig".to_string(),
            CacheError::Unavailable(_) => "Unavailable".to_string(),
        }
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        CacheError::Unavailable(msg.into())
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        CacheError::InvalidConfig(msg.into())
    }
}

impl From<DomainError> for CacheError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => CacheError::InvalidConfig(msg),
        }
    }
}

/// Result type alias for cache operations
pub type CacheResult<T> = Result<T, CacheError>;

/// A blocking backoff sleep was cut short.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Backoff sleep was interrupted")]
pub struct Interrupted;

/// Establishing the cache connection failed for good.
///
/// The bootstrap must treat this as fatal and abort startup.
#[derive(Error, Debug)]
pub enum ConnectionEstablishmentError {
    #[error(
        "Cache connection failed after {attempts} attempts; check that the cache service is running and the configuration is correct"
    )]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: CacheError,
    },

    #[error("Cache connection retry was interrupted during attempt {attempt}")]
    Interrupted {
        attempt: u32,
        #[source]
        source: Interrupted,
    },
}

impl ConnectionEstablishmentError {
    /// The last cache error observed, if retries ran out.
    pub fn last_error(&self) -> Option<&CacheError> {
        match self {
            ConnectionEstablishmentError::RetriesExhausted { source, .. } => Some(source),
            ConnectionEstablishmentError::Interrupted { .. } => None,
        }
    }
}

/// Bootstrap binary errors.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] DomainError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Establishment(#[from] ConnectionEstablishmentError),

    #[error("Cache connection was interrupted")]
    Interrupted(#[from] Interrupted),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;
