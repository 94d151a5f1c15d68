//! Command implementations.
//!
//! Every command first establishes the cache handle through `open_handle`.

pub mod check;
pub mod ops;
pub mod selftest;

use tracing::{error, info, warn};

use cache_connector::{
    CacheCodec, CacheHandle, ConnectionEstablisher, ConnectionFactory, InterruptibleSleeper,
    RedisConnectionFactory,
};
use common::{environment_mode, AppError, AppResult, CacheSettings, Interrupted};
use domain::EnvironmentMode;

/// Settings shared by all commands.
#[derive(Debug, Clone)]
pub struct Context {
    pub settings: CacheSettings,
    /// Pinned mode from `--profile`; otherwise read per establishment
    pub mode: Option<EnvironmentMode>,
    pub namespace: Option<String>,
}

impl Context {
    /// Mode the establishment uses.
    pub fn effective_mode(&self) -> EnvironmentMode {
        self.mode.unwrap_or_else(environment_mode)
    }

    fn codec(&self) -> CacheCodec {
        match &self.namespace {
            Some(ns) => CacheCodec::new().with_namespace(ns.clone()),
            None => CacheCodec::new(),
        }
    }
}

/// Establish the cache handle on a blocking thread.
///
/// Ctrl-C during establishment is fatal. Once the handle is open, a later
/// Ctrl-C exits the process.
pub async fn open_handle(ctx: &Context) -> AppResult<CacheHandle> {
    let sleeper = InterruptibleSleeper::new();
    let interrupter = sleeper.interrupter();
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, aborting cache connection");
            interrupter.interrupt();
        }
    });

    let result = establish_handle(ctx, RedisConnectionFactory, sleeper).await;
    watcher.abort();

    // tokio keeps its SIGINT handler installed, so exit on the next interrupt
    tokio::spawn(async {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, exiting");
            std::process::exit(1);
        }
    });

    result
}

/// Run the establisher with `factory` and `sleeper`.
///
/// A disabled cache yields a placeholder without building a connection. An
/// interrupt raised on `sleeper` at any point of the establishment fails the
/// call, even when it arrived during a probe rather than a backoff.
pub async fn establish_handle<F>(
    ctx: &Context,
    factory: F,
    sleeper: InterruptibleSleeper,
) -> AppResult<CacheHandle>
where
    F: ConnectionFactory + 'static,
{
    let codec = ctx.codec();
    if !ctx.settings.enabled {
        info!("Cache disabled by configuration; using placeholder handle");
        return Ok(CacheHandle::placeholder(codec));
    }

    let interrupter = sleeper.interrupter();
    let mut establisher = ConnectionEstablisher::new(factory, sleeper).with_codec(codec);
    if let Some(mode) = ctx.mode {
        establisher = establisher.with_mode(mode);
    }

    let config = ctx.settings.connection.clone();
    let handle = tokio::task::spawn_blocking(move || establisher.connect(&config))
        .await
        .map_err(|e| AppError::internal(format!("Connection task failed: {}", e)))??;

    if interrupter.is_interrupted() {
        error!("Cache connection interrupted; aborting");
        handle.close();
        return Err(Interrupted.into());
    }

    Ok(handle)
}
