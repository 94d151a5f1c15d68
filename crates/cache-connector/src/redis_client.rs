//! Redis implementation of the connection seam.
//!
//! Uses the blocking `redis` API. The client is built without I/O; the TCP
//! connection is opened lazily on first use and reopened after I/O errors.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use redis::{Client, Commands, ConnectionAddr, ConnectionInfo, RedisConnectionInfo, RedisError};
use tracing::debug;

use common::{CacheError, CacheResult};
use domain::ConnectionConfig;

use crate::connection::{CacheConnection, ConnectionFactory};

/// Builds `RedisConnection`s from `ConnectionConfig`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RedisConnectionFactory;

impl ConnectionFactory for RedisConnectionFactory {
    fn create(&self, config: &ConnectionConfig) -> CacheResult<Box<dyn CacheConnection>> {
        config.validate()?;

        let info = ConnectionInfo {
            addr: ConnectionAddr::Tcp(config.host.clone(), config.port),
            redis: RedisConnectionInfo {
                db: i64::from(config.database),
                password: config.password.clone(),
                ..Default::default()
            },
        };
        let client = Client::open(info)?;
        debug!(address = %config.address(), db = config.database, "Redis client created");

        Ok(Box::new(RedisConnection::new(client, config.timeout())))
    }
}

/// Lazily opened blocking Redis connection.
pub struct RedisConnection {
    client: Client,
    timeout: Duration,
    conn: Mutex<Option<redis::Connection>>,
}

impl RedisConnection {
    pub fn new(client: Client, timeout: Duration) -> Self {
        Self {
            client,
            timeout,
            conn: Mutex::new(None),
        }
    }

    fn open(&self) -> Result<redis::Connection, RedisError> {
        let conn = self.client.get_connection_with_timeout(self.timeout)?;
        conn.set_read_timeout(Some(self.timeout))?;
        conn.set_write_timeout(Some(self.timeout))?;
        debug!("Redis connection opened");
        Ok(conn)
    }

    /// Run `f` on the shared connection, opening it first if needed.
    fn with_conn<T, F>(&self, f: F) -> CacheResult<T>
    where
        F: FnOnce(&mut redis::Connection) -> Result<T, RedisError>,
    {
        let mut slot = self.conn.lock().unwrap_or_else(PoisonError::into_inner);

        let mut conn = match slot.take() {
            Some(conn) => conn,
            None => self.open()?,
        };

        match f(&mut conn) {
            Ok(value) => {
                *slot = Some(conn);
                Ok(value)
            }
            Err(e) => {
                // A broken socket is dropped so the next call reconnects.
                if !(e.is_io_error() || e.is_connection_dropped() || e.is_timeout()) {
                    *slot = Some(conn);
                }
                Err(CacheError::from(e))
            }
        }
    }
}

impl CacheConnection for RedisConnection {
    fn ping(&self) -> CacheResult<()> {
        self.with_conn(|conn| redis::cmd("PING").query::<String>(conn))
            .map(|_| ())
    }

    fn get(&self, key: &str) -> CacheResult<Option<String>> {
        self.with_conn(|conn| conn.get(key))
    }

    fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> CacheResult<()> {
        self.with_conn(|conn| match ttl {
            // SETEX only takes whole seconds
            Some(ttl) => conn.set_ex(key, value, ttl.as_secs().max(1)),
            None => conn.set(key, value),
        })
    }

    fn delete(&self, key: &str) -> CacheResult<bool> {
        self.with_conn(|conn| conn.del::<_, i64>(key)).map(|n| n > 0)
    }
}
