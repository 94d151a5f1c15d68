//! Environment mode read from `ENV_PROFILE` at establishment time.
//!
//! Kept in its own test binary: it mutates the process environment.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use cache_connector::{CacheConnection, ConnectionEstablisher, ConnectionFactory, Sleeper};
use common::{CacheError, CacheResult, ConnectionEstablishmentError, Interrupted, ENV_PROFILE_VAR};
use domain::ConnectionConfig;

/// Connection that refuses every ping.
struct RefusingConnection {
    probes: Arc<AtomicU32>,
}

impl CacheConnection for RefusingConnection {
    fn ping(&self) -> CacheResult<()> {
        self.probes.fetch_add(1, Ordering::SeqCst);
        Err(CacheError::unavailable("connection refused"))
    }

    fn get(&self, _key: &str) -> CacheResult<Option<String>> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &str, _ttl: Option<Duration>) -> CacheResult<()> {
        Ok(())
    }

    fn delete(&self, _key: &str) -> CacheResult<bool> {
        Ok(false)
    }
}

struct RefusingFactory {
    probes: Arc<AtomicU32>,
}

impl ConnectionFactory for RefusingFactory {
    fn create(&self, _config: &ConnectionConfig) -> CacheResult<Box<dyn CacheConnection>> {
        Ok(Box::new(RefusingConnection {
            probes: self.probes.clone(),
        }))
    }
}

struct NoSleep;

impl Sleeper for NoSleep {
    fn sleep(&self, _delay: Duration) -> Result<(), Interrupted> {
        Ok(())
    }
}

#[test]
fn test_profile_from_environment_selects_failure_or_degradation() {
    let probes = Arc::new(AtomicU32::new(0));
    let establisher = ConnectionEstablisher::new(
        RefusingFactory {
            probes: probes.clone(),
        },
        NoSleep,
    );
    let config = ConnectionConfig::default();

    std::env::set_var(ENV_PROFILE_VAR, "prod");
    let err = establisher.establish(&config, 3).unwrap_err();
    assert!(matches!(
        err,
        ConnectionEstablishmentError::RetriesExhausted { attempts: 3, .. }
    ));
    assert_eq!(probes.load(Ordering::SeqCst), 3);

    // Same establisher, profile changed between calls
    std::env::set_var(ENV_PROFILE_VAR, "dev");
    let handle = establisher.establish(&config, 3).unwrap();
    assert!(handle.is_placeholder());
    assert_eq!(probes.load(Ordering::SeqCst), 6);

    std::env::remove_var(ENV_PROFILE_VAR);
}
