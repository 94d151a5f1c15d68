//! Domain-level constants.
//!
//! Defaults for the cache connection and the retry policy applied while
//! establishing it.

// =============================================================================
// Connection Defaults
// =============================================================================

/// Default cache host
pub const DEFAULT_CACHE_HOST: &str = "localhost";

/// Default cache port
pub const DEFAULT_CACHE_PORT: u16 = 6379;

/// Default logical database index
pub const DEFAULT_CACHE_DATABASE: u32 = 0;

/// Default connect/read/write timeout in milliseconds
pub const DEFAULT_CACHE_TIMEOUT_MS: u64 = 2000;

// =============================================================================
// Retry Policy
// =============================================================================

/// Default number of connection attempts before giving up
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Backoff increment per attempt in milliseconds (1s, 2s, 3s, ...)
pub const BACKOFF_STEP_MS: u64 = 1000;

// =============================================================================
// Diagnostics
// =============================================================================

/// Shown in place of a configured password
pub const PASSWORD_MASK: &str = "******";

/// Shown when no password is configured
pub const PASSWORD_EMPTY: &str = "(empty)";

// =============================================================================
// Environment
// =============================================================================

/// Development profile value
pub const PROFILE_DEVELOPMENT: &str = "development";

/// Short development profile value
pub const PROFILE_DEV: &str = "dev";

/// Production profile value
pub const PROFILE_PRODUCTION: &str = "production";
