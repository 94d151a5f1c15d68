//! Linear backoff between connection attempts.
//!
//! The pause blocks the calling thread. `InterruptibleSleeper` lets another
//! thread cut a pause short, which the establisher treats as fatal.

use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::Duration;

use common::Interrupted;
use domain::BACKOFF_STEP_MS;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Delay after failed attempt `attempt` (1-based): 1s, 2s, 3s, ...
pub fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_millis(BACKOFF_STEP_MS.saturating_mul(u64::from(attempt)))
}

/// Blocking pause between attempts.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait Sleeper: Send + Sync {
    /// Block for `delay`, or return `Interrupted` if woken early.
    fn sleep(&self, delay: Duration) -> Result<(), Interrupted>;
}

/// Plain `std::thread::sleep`. Never interrupted.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, delay: Duration) -> Result<(), Interrupted> {
        std::thread::sleep(delay);
        Ok(())
    }
}

type Flag = Arc<(Mutex<bool>, Condvar)>;

/// Sleeper that can be woken by a `SleepInterrupter`.
///
/// Interruption is sticky: once interrupted, every later sleep fails
/// immediately.
#[derive(Debug, Clone, Default)]
pub struct InterruptibleSleeper {
    flag: Flag,
}

impl InterruptibleSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle that interrupts this sleeper from another thread.
    pub fn interrupter(&self) -> SleepInterrupter {
        SleepInterrupter {
            flag: self.flag.clone(),
        }
    }
}

impl Sleeper for InterruptibleSleeper {
    fn sleep(&self, delay: Duration) -> Result<(), Interrupted> {
        let (lock, cvar) = &*self.flag;
        let guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        let (guard, _) = cvar
            .wait_timeout_while(guard, delay, |interrupted| !*interrupted)
            .unwrap_or_else(PoisonError::into_inner);

        if *guard {
            Err(Interrupted)
        } else {
            Ok(())
        }
    }
}

/// Wakes an `InterruptibleSleeper`.
#[derive(Debug, Clone)]
pub struct SleepInterrupter {
    flag: Flag,
}

impl SleepInterrupter {
    pub fn interrupt(&self) {
        let (lock, cvar) = &*self.flag;
        *lock.lock().unwrap_or_else(PoisonError::into_inner) = true;
        cvar.notify_all();
        tracing::debug!("Backoff sleep interrupted");
    }

    pub fn is_interrupted(&self) -> bool {
        *self.flag.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Attempt counter for one establishment call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryState {
    attempt: u32,
    max_retries: u32,
}

impl RetryState {
    /// Start at attempt 1. A ceiling below 1 still allows one attempt.
    pub fn new(max_retries: u32) -> Self {
        Self {
            attempt: 1,
            max_retries: max_retries.max(1),
        }
    }

    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Check if the current attempt is the last one allowed
    pub fn is_final(&self) -> bool {
        self.attempt >= self.max_retries
    }

    /// Delay to wait before the next attempt.
    pub fn delay(&self) -> Duration {
        backoff_delay(self.attempt)
    }

    pub fn advance(&mut self) {
        self.attempt += 1;
    }
}
