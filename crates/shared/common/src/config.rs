//! Cache settings loaded from environment variables.

use std::env;
use std::str::FromStr;

use domain::{
    ConnectionConfig, EnvironmentMode, DEFAULT_CACHE_DATABASE, DEFAULT_CACHE_HOST,
    DEFAULT_CACHE_PORT, DEFAULT_CACHE_TIMEOUT_MS, DEFAULT_MAX_RETRIES,
};
use serde::{Deserialize, Serialize};

/// Environment variable holding the process profile
pub const ENV_PROFILE_VAR: &str = "ENV_PROFILE";

/// Cache settings for the host application.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CacheSettings {
    /// When false the cache is skipped entirely
    pub enabled: bool,
    pub connection: ConnectionConfig,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            connection: ConnectionConfig::default(),
        }
    }
}

impl CacheSettings {
    /// Load settings from the process environment (and `.env`, if present).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load settings through `lookup`. Unparseable values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        // Only an unset value or "true" keeps the cache on
        let enabled = lookup("REDIS_ENABLED")
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(true);

        let mut connection = ConnectionConfig {
            host: lookup("REDIS_HOST")
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_CACHE_HOST.to_string()),
            port: parse_var(&lookup, "REDIS_PORT").unwrap_or(DEFAULT_CACHE_PORT),
            database: parse_var(&lookup, "REDIS_DATABASE").unwrap_or(DEFAULT_CACHE_DATABASE),
            password: None,
            timeout_ms: parse_var(&lookup, "REDIS_TIMEOUT_MS").unwrap_or(DEFAULT_CACHE_TIMEOUT_MS),
            max_retries: parse_var(&lookup, "REDIS_MAX_RETRIES").unwrap_or(DEFAULT_MAX_RETRIES),
        };
        if let Some(password) = lookup("REDIS_PASSWORD") {
            connection = connection.with_password(password);
        }

        Self {
            enabled,
            connection,
        }
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|v| v.trim().parse().ok())
}

/// Read the environment mode from the process environment.
///
/// Called at establishment time rather than cached, so the current value
/// of `ENV_PROFILE` is always used.
pub fn environment_mode() -> EnvironmentMode {
    let profile = env::var(ENV_PROFILE_VAR).ok();
    let mode = EnvironmentMode::from_profile(profile.as_deref());
    tracing::debug!(profile = ?profile, mode = %mode, "Environment mode resolved");
    mode
}
