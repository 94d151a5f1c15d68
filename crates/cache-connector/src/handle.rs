//! Cache handle returned to the host application.

use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use common::CacheResult;

use crate::codec::CacheCodec;
use crate::connection::CacheConnection;

enum Backend {
    Live(Box<dyn CacheConnection>),
    Placeholder,
}

/// Handle to the cache, either live or a placeholder.
///
/// A placeholder carries the same codec as a live handle but no connection.
/// Its operations never reach a network: reads miss, writes and deletes are
/// dropped, and `ping` reports that no server was reached.
///
/// The handle is `Send + Sync`; share it behind an `Arc`. Release it with
/// `close` on shutdown.
pub struct CacheHandle {
    backend: Backend,
    codec: CacheCodec,
}

impl std::fmt::Debug for CacheHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let backend = match self.backend {
            Backend::Live(_) => "live",
            Backend::Placeholder => "placeholder",
        };
        f.debug_struct("CacheHandle")
            .field("backend", &backend)
            .field("codec", &self.codec)
            .finish()
    }
}

impl CacheHandle {
    /// Wrap a verified connection.
    pub fn live(connection: Box<dyn CacheConnection>, codec: CacheCodec) -> Self {
        Self {
            backend: Backend::Live(connection),
            codec,
        }
    }

    /// Handle backed by no connection.
    pub fn placeholder(codec: CacheCodec) -> Self {
        Self {
            backend: Backend::Placeholder,
            codec,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self.backend, Backend::Placeholder)
    }

    pub fn codec(&self) -> &CacheCodec {
        &self.codec
    }

    /// Round trip to the server.
    ///
    /// Returns `Ok(true)` when the server answered and `Ok(false)` for a
    /// placeholder.
    pub fn ping(&self) -> CacheResult<bool> {
        match &self.backend {
            Backend::Live(conn) => conn.ping().map(|()| true),
            Backend::Placeholder => Ok(false),
        }
    }

    /// Get a value from cache.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> CacheResult<Option<T>> {
        let Backend::Live(conn) = &self.backend else {
            debug!(key = %key, "Cache disabled, get skipped");
            return Ok(None);
        };

        let key = self.codec.key(key);
        match conn.get(&key)? {
            Some(raw) => Ok(Some(self.codec.decode(&raw)?)),
            None => Ok(None),
        }
    }

    /// Set a value in cache without expiry.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> CacheResult<()> {
        self.store(key, value, None)
    }

    /// Set a value in cache with a TTL.
    pub fn set_with_ttl<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> CacheResult<()> {
        self.store(key, value, Some(ttl))
    }

    /// Delete a value. Returns true if a key was removed.
    pub fn delete(&self, key: &str) -> CacheResult<bool> {
        match &self.backend {
            Backend::Live(conn) => conn.delete(&self.codec.key(key)),
            Backend::Placeholder => {
                debug!(key = %key, "Cache disabled, delete skipped");
                Ok(false)
            }
        }
    }

    /// Release the handle.
    pub fn close(self) {
        match self.backend {
            Backend::Live(conn) => {
                drop(conn);
                debug!("Cache connection closed");
            }
            Backend::Placeholder => debug!("Placeholder cache handle released"),
        }
    }

    fn store<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        ttl: Option<Duration>,
    ) -> CacheResult<()> {
        // Encode even for placeholders so serialization bugs surface the same way.
        let raw = self.codec.encode(value)?;
        match &self.backend {
            Backend::Live(conn) => conn.set(&self.codec.key(key), &raw, ttl).map_err(|e| {
                warn!(key = %key, error = %e, "Cache set failed");
                e
            }),
            Backend::Placeholder => {
                debug!(key = %key, "Cache disabled, set skipped");
                Ok(())
            }
        }
    }
}
