//! Connection seam between the establisher and a concrete cache client.

use std::time::Duration;

use common::CacheResult;
use domain::ConnectionConfig;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// A single connection to the remote cache.
///
/// Values cross this boundary already serialized; `CacheHandle` owns the
/// codec.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait CacheConnection: Send + Sync {
    /// Minimal round trip used only to confirm connectivity
    fn ping(&self) -> CacheResult<()>;

    fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Store `value`, expiring after `ttl` when given
    fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> CacheResult<()>;

    /// Returns true if a key was removed
    fn delete(&self, key: &str) -> CacheResult<bool>;
}

/// Builds candidate connections from configuration.
///
/// `create` must not perform network I/O; the first round trip happens on
/// the first `ping`.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ConnectionFactory: Send + Sync {
    fn create(&self, config: &ConnectionConfig) -> CacheResult<Box<dyn CacheConnection>>;
}
