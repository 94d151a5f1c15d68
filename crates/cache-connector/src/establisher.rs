//! Cache connection establishment with bounded retry and graceful degradation.
//!
//! `connect_with_retry` probes a candidate connection up to `max_retries`
//! times with linear backoff and reports one of two outcomes: connected or
//! exhausted. `establish` turns an exhausted outcome into either a fatal
//! error (production) or a placeholder handle (development).

use std::time::Duration;

use tracing::{error, info, warn};

use common::{environment_mode, CacheError, ConnectionEstablishmentError};
use domain::{ConnectionConfig, EnvironmentMode};

use crate::backoff::{RetryState, Sleeper, ThreadSleeper};
use crate::codec::CacheCodec;
use crate::connection::{CacheConnection, ConnectionFactory};
use crate::diagnostics::DiagnosticReport;
use crate::handle::CacheHandle;
use crate::redis_client::RedisConnectionFactory;

/// Result of probing a candidate connection.
pub enum ProbeOutcome {
    /// A probe succeeded
    Connected(Box<dyn CacheConnection>),
    /// Every attempt failed
    Exhausted {
        /// Probes issued; 0 if the candidate could not be built
        attempts: u32,
        last_error: CacheError,
    },
}

impl std::fmt::Debug for ProbeOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbeOutcome::Connected(_) => f.write_str("Connected"),
            ProbeOutcome::Exhausted {
                attempts,
                last_error,
            } => f
                .debug_struct("Exhausted")
                .field("attempts", attempts)
                .field("last_error", last_error)
                .finish(),
        }
    }
}

/// Produces a usable cache handle from configuration.
pub struct ConnectionEstablisher<F, S> {
    factory: F,
    sleeper: S,
    codec: CacheCodec,
    mode: Option<EnvironmentMode>,
}

impl ConnectionEstablisher<RedisConnectionFactory, ThreadSleeper> {
    /// Redis client with plain thread sleeps.
    pub fn redis() -> Self {
        Self::new(RedisConnectionFactory, ThreadSleeper)
    }
}

impl<F, S> ConnectionEstablisher<F, S>
where
    F: ConnectionFactory,
    S: Sleeper,
{
    pub fn new(factory: F, sleeper: S) -> Self {
        Self {
            factory,
            sleeper,
            codec: CacheCodec::default(),
            mode: None,
        }
    }

    /// Codec given to the returned handle, live or placeholder.
    pub fn with_codec(mut self, codec: CacheCodec) -> Self {
        self.codec = codec;
        self
    }

    /// Pin the environment mode instead of reading `ENV_PROFILE` per call.
    pub fn with_mode(mut self, mode: EnvironmentMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Establish using `config.max_retries` as the attempt ceiling.
    pub fn connect(
        &self,
        config: &ConnectionConfig,
    ) -> Result<CacheHandle, ConnectionEstablishmentError> {
        self.establish(config, config.max_retries)
    }

    /// Establish a cache handle.
    ///
    /// Returns a live handle as soon as a probe succeeds. When every attempt
    /// fails, logs a diagnostic report and then returns a placeholder handle
    /// in development mode or `RetriesExhausted` in production mode. An
    /// interrupted backoff is always an error.
    ///
    /// A config the factory rejects is never probed: it takes the exhausted
    /// path at once with `attempts == 0`.
    pub fn establish(
        &self,
        config: &ConnectionConfig,
        max_retries: u32,
    ) -> Result<CacheHandle, ConnectionEstablishmentError> {
        match self.connect_with_retry(config, max_retries)? {
            ProbeOutcome::Connected(connection) => {
                info!(address = %config.address(), "Cache connection configured");
                Ok(CacheHandle::live(connection, self.codec.clone()))
            }
            ProbeOutcome::Exhausted {
                attempts,
                last_error,
            } => {
                error!(
                    error_kind = %last_error.kind(),
                    error = %last_error,
                    "Cache connection configuration failed"
                );
                error!("\n{}", DiagnosticReport::new(config, attempts, &last_error));

                let mode = self.mode.unwrap_or_else(environment_mode);
                if mode.allows_degraded_cache() {
                    warn!(
                        mode = %mode,
                        "Cache unreachable in development mode; continuing with cache features disabled"
                    );
                    warn!("Created placeholder cache handle; cache operations will be skipped");
                    Ok(CacheHandle::placeholder(self.codec.clone()))
                } else {
                    Err(ConnectionEstablishmentError::RetriesExhausted {
                        attempts,
                        source: last_error,
                    })
                }
            }
        }
    }

    /// Build a candidate connection and probe it until it answers or the
    /// attempts run out.
    ///
    /// Sleeps `1000ms * attempt` between attempts on the calling thread.
    /// Only an interrupted sleep is returned as `Err`.
    pub fn connect_with_retry(
        &self,
        config: &ConnectionConfig,
        max_retries: u32,
    ) -> Result<ProbeOutcome, ConnectionEstablishmentError> {
        let connection = match self.factory.create(config) {
            Ok(connection) => connection,
            Err(last_error) => {
                warn!(error = %last_error, "Could not build cache connection");
                return Ok(ProbeOutcome::Exhausted {
                    attempts: 0,
                    last_error,
                });
            }
        };

        let mut state = RetryState::new(max_retries);
        loop {
            let attempt = state.attempt();
            info!(attempt, max_retries = state.max_retries(), "Connecting to cache");

            match connection.ping() {
                Ok(()) => {
                    info!(attempt, "Cache connection test succeeded");
                    return Ok(ProbeOutcome::Connected(connection));
                }
                Err(last_error) => {
                    warn!(
                        attempt,
                        max_retries = state.max_retries(),
                        error = %last_error,
                        "Cache connection attempt failed"
                    );

                    if state.is_final() {
                        return Ok(ProbeOutcome::Exhausted {
                            attempts: attempt,
                            last_error,
                        });
                    }

                    self.pause(state.delay(), attempt)?;
                    state.advance();
                }
            }
        }
    }

    fn pause(&self, delay: Duration, attempt: u32) -> Result<(), ConnectionEstablishmentError> {
        info!(
            attempt,
            delay_ms = delay.as_millis() as u64,
            "Retrying cache connection after delay"
        );
        self.sleeper.sleep(delay).map_err(|source| {
            error!(attempt, "Cache connection retry interrupted");
            ConnectionEstablishmentError::Interrupted { attempt, source }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use mockall::predicate::eq;
    use mockall::Sequence;

    use common::Interrupted;

    use super::*;
    use crate::backoff::MockSleeper;
    use crate::connection::{MockCacheConnection, MockConnectionFactory};

    fn refused() -> CacheError {
        CacheError::from(redis::RedisError::from((
            redis::ErrorKind::IoError,
            "Connection refused",
        )))
    }

    /// Connection whose first `failures` pings fail.
    fn flaky_connection(failures: u32, probes: Arc<AtomicU32>) -> MockCacheConnection {
        let mut conn = MockCacheConnection::new();
        conn.expect_ping().returning(move || {
            let n = probes.fetch_add(1, Ordering::SeqCst) + 1;
            if n <= failures {
                Err(refused())
            } else {
                Ok(())
            }
        });
        conn
    }

    fn factory_for(conn: MockCacheConnection) -> MockConnectionFactory {
        let mut factory = MockConnectionFactory::new();
        factory
            .expect_create()
            .times(1)
            .return_once(move |_| Ok(Box::new(conn) as Box<dyn CacheConnection>));
        factory
    }

    fn always_failing_factory(probes: Arc<AtomicU32>) -> MockConnectionFactory {
        factory_for(flaky_connection(u32::MAX, probes))
    }

    fn accepting_sleeper() -> MockSleeper {
        let mut sleeper = MockSleeper::new();
        sleeper.expect_sleep().returning(|_| Ok(()));
        sleeper
    }

    #[test]
    fn test_first_probe_success_short_circuits() {
        let probes = Arc::new(AtomicU32::new(0));
        let factory = factory_for(flaky_connection(0, probes.clone()));
        let mut sleeper = MockSleeper::new();
        sleeper.expect_sleep().never();

        let establisher = ConnectionEstablisher::new(factory, sleeper)
            .with_mode(EnvironmentMode::Production);
        let handle = establisher.establish(&ConnectionConfig::default(), 3).unwrap();

        assert!(!handle.is_placeholder());
        assert_eq!(probes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_success_on_attempt_k_probes_exactly_k_times() {
        for max_retries in 1..=5u32 {
            for k in 1..=max_retries {
                let probes = Arc::new(AtomicU32::new(0));
                let factory = factory_for(flaky_connection(k - 1, probes.clone()));
                let mut sleeper = MockSleeper::new();
                sleeper
                    .expect_sleep()
                    .times((k - 1) as usize)
                    .returning(|_| Ok(()));

                let establisher = ConnectionEstablisher::new(factory, sleeper)
                    .with_mode(EnvironmentMode::Production);
                let handle = establisher
                    .establish(&ConnectionConfig::default(), max_retries)
                    .unwrap();

                assert!(!handle.is_placeholder());
                assert_eq!(probes.load(Ordering::SeqCst), k, "max={max_retries} k={k}");
            }
        }
    }

    #[test]
    fn test_all_failures_sleep_linearly_in_order() {
        let max_retries = 4;
        let probes = Arc::new(AtomicU32::new(0));
        let factory = always_failing_factory(probes.clone());

        let mut seq = Sequence::new();
        let mut sleeper = MockSleeper::new();
        for attempt in 1..max_retries {
            sleeper
                .expect_sleep()
                .with(eq(Duration::from_millis(1000 * u64::from(attempt))))
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_| Ok(()));
        }

        let establisher = ConnectionEstablisher::new(factory, sleeper)
            .with_mode(EnvironmentMode::Development);
        let outcome = establisher
            .connect_with_retry(&ConnectionConfig::default(), max_retries)
            .unwrap();

        assert!(matches!(outcome, ProbeOutcome::Exhausted { attempts: 4, .. }));
        assert_eq!(probes.load(Ordering::SeqCst), max_retries);
    }

    #[test]
    fn test_production_exhaustion_is_fatal() {
        let probes = Arc::new(AtomicU32::new(0));
        let establisher =
            ConnectionEstablisher::new(always_failing_factory(probes.clone()), accepting_sleeper())
                .with_mode(EnvironmentMode::Production);

        let err = establisher
            .establish(&ConnectionConfig::default(), 3)
            .unwrap_err();

        match err {
            ConnectionEstablishmentError::RetriesExhausted { attempts, source } => {
                assert_eq!(attempts, 3);
                assert!(source.to_string().contains("Connection refused"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(probes.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_development_exhaustion_degrades() {
        let probes = Arc::new(AtomicU32::new(0));
        let establisher =
            ConnectionEstablisher::new(always_failing_factory(probes.clone()), accepting_sleeper())
                .with_mode(EnvironmentMode::Development)
                .with_codec(CacheCodec::new().with_namespace("loyalty:"));

        let handle = establisher.establish(&ConnectionConfig::default(), 3).unwrap();

        assert!(handle.is_placeholder());
        assert_eq!(handle.codec().namespace(), Some("loyalty:"));
        assert_eq!(handle.get::<String>("k").unwrap(), None);
        assert!(handle.set("k", "v").is_ok());
        // The dropped connection is never probed again.
        assert_eq!(probes.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_interrupted_backoff_is_fatal_in_development() {
        let probes = Arc::new(AtomicU32::new(0));
        let mut sleeper = MockSleeper::new();
        sleeper
            .expect_sleep()
            .times(1)
            .returning(|_| Err(Interrupted));

        let establisher =
            ConnectionEstablisher::new(always_failing_factory(probes.clone()), sleeper)
                .with_mode(EnvironmentMode::Development);
        let err = establisher
            .establish(&ConnectionConfig::default(), 3)
            .unwrap_err();

        assert!(matches!(
            err,
            ConnectionEstablishmentError::Interrupted { attempt: 1, .. }
        ));
        assert_eq!(probes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_factory_error_skips_probing() {
        let mut factory = MockConnectionFactory::new();
        factory
            .expect_create()
            .times(1)
            .returning(|_| Err(CacheError::invalid_config("cache port must not be 0")));
        let mut sleeper = MockSleeper::new();
        sleeper.expect_sleep().never();

        let establisher = ConnectionEstablisher::new(factory, sleeper)
            .with_mode(EnvironmentMode::Production);
        let err = establisher
            .establish(&ConnectionConfig::default().with_port(0), 3)
            .unwrap_err();

        assert!(matches!(
            err,
            ConnectionEstablishmentError::RetriesExhausted { attempts: 0, .. }
        ));
    }

    #[test]
    fn test_connect_uses_configured_ceiling() {
        let probes = Arc::new(AtomicU32::new(0));
        let establisher =
            ConnectionEstablisher::new(always_failing_factory(probes.clone()), accepting_sleeper())
                .with_mode(EnvironmentMode::Development);

        let config = ConnectionConfig::default().with_max_retries(5);
        let handle = establisher.connect(&config).unwrap();

        assert!(handle.is_placeholder());
        assert_eq!(probes.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn test_zero_retries_still_probes_once() {
        let probes = Arc::new(AtomicU32::new(0));
        let mut sleeper = MockSleeper::new();
        sleeper.expect_sleep().never();

        let establisher = ConnectionEstablisher::new(always_failing_factory(probes.clone()), sleeper)
            .with_mode(EnvironmentMode::Development);
        let handle = establisher.establish(&ConnectionConfig::default(), 0).unwrap();

        assert!(handle.is_placeholder());
        assert_eq!(probes.load(Ordering::SeqCst), 1);
    }
}
