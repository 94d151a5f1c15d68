//! Resilient cache connection bootstrap.
//!
//! Establishes a connection to a remote cache with bounded linear-backoff
//! retries. When the cache stays unreachable the outcome depends on the
//! environment mode: development gets a placeholder handle so the host can
//! keep starting, production gets a fatal error.
//!
//! # Modules
//!
//! - **establisher**: retry loop and fail-or-degrade decision
//! - **backoff**: blocking, optionally interruptible pauses between attempts
//! - **connection**: traits a cache client implements
//! - **redis_client**: blocking Redis implementation
//! - **handle**: live or placeholder handle returned to the host
//! - **codec**: string key and JSON value serializers
//! - **diagnostics**: report logged when attempts run out
//! - **keys**: deterministic cache-key builder
//!
//! # Example
//!
//! ```no_run
//! use cache_connector::ConnectionEstablisher;
//! use domain::ConnectionConfig;
//!
//! let config = ConnectionConfig::new("localhost");
//! let handle = ConnectionEstablisher::redis().establish(&config, 3)?;
//! handle.set("greeting", "hello")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod backoff;
pub mod codec;
pub mod connection;
pub mod diagnostics;
pub mod establisher;
pub mod handle;
pub mod keys;
pub mod redis_client;

pub use backoff::{
    backoff_delay, InterruptibleSleeper, RetryState, SleepInterrupter, Sleeper, ThreadSleeper,
};
pub use codec::CacheCodec;
pub use connection::{CacheConnection, ConnectionFactory};
pub use diagnostics::{DiagnosticReport, REPORT_HEADER};
pub use establisher::{ConnectionEstablisher, ProbeOutcome};
pub use handle::CacheHandle;
pub use keys::{build_key, KeyGenerator};
pub use redis_client::{RedisConnection, RedisConnectionFactory};

#[cfg(any(test, feature = "test-utils"))]
pub use backoff::MockSleeper;
#[cfg(any(test, feature = "test-utils"))]
pub use connection::{MockCacheConnection, MockConnectionFactory};
