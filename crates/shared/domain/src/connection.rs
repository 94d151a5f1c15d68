//! Cache connection settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CACHE_DATABASE, DEFAULT_CACHE_HOST, DEFAULT_CACHE_PORT, DEFAULT_CACHE_TIMEOUT_MS,
    DEFAULT_MAX_RETRIES, PASSWORD_EMPTY, PASSWORD_MASK,
};
use crate::error::{DomainError, DomainResult};

/// Connection parameters for the remote cache.
///
/// Read once from external configuration and never mutated afterwards.
/// The password is skipped when serializing and redacted in `Debug`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub database: u32,
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Attempt ceiling used by `ConnectionEstablisher::connect`
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_port() -> u16 {
    DEFAULT_CACHE_PORT
}

fn default_timeout_ms() -> u64 {
    DEFAULT_CACHE_TIMEOUT_MS
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_CACHE_HOST.to_string(),
            port: DEFAULT_CACHE_PORT,
            database: DEFAULT_CACHE_DATABASE,
            password: None,
            timeout_ms: DEFAULT_CACHE_TIMEOUT_MS,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl std::fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("password", &self.password_display())
            .field("timeout_ms", &self.timeout_ms)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

impl ConnectionConfig {
    /// Create a config for `host` with every other field defaulted.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Self::default()
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_database(mut self, database: u32) -> Self {
        self.database = database;
        self
    }

    /// Set the password. An empty string means no password.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        let password = password.into();
        self.password = (!password.is_empty()).then_some(password);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Connect/read/write timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Check if a non-empty password is configured
    pub fn has_password(&self) -> bool {
        self.password.as_deref().is_some_and(|p| !p.is_empty())
    }

    /// Password as it may appear in logs: masked or `(empty)`.
    pub fn password_display(&self) -> &'static str {
        if self.has_password() {
            PASSWORD_MASK
        } else {
            PASSWORD_EMPTY
        }
    }

    /// `host:port` for log lines.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Reject settings no cache client could connect with.
    pub fn validate(&self) -> DomainResult<()> {
        if self.host.trim().is_empty() {
            return Err(DomainError::validation("cache host must not be empty"));
        }
        if self.port == 0 {
            return Err(DomainError::validation("cache port must not be 0"));
        }
        if self.timeout_ms == 0 {
            return Err(DomainError::validation("cache timeout must be positive"));
        }
        Ok(())
    }
}
