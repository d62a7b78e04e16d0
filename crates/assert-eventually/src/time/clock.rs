//! Time sources and waiting primitives used by the polling loop
//!
//! Both collaborators are small traits so the engine can be driven by a
//! virtual clock in tests (see [`crate::testing::VirtualTime`]).

use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::{Duration, Instant};

use thiserror::Error;

/// Source of the current instant
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// A wait between attempts was interrupted from outside
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("sleep was interrupted")]
pub struct Interrupted;

/// Suspends the calling thread between attempts
pub trait Sleeper: Send + Sync {
    /// Block for `duration`, or until interrupted
    fn sleep(&self, duration: Duration) -> Result<(), Interrupted>;
}

/// The monotonic system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Blocking sleep on the current thread; never interrupted
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) -> Result<(), Interrupted> {
        std::thread::sleep(duration);
        Ok(())
    }
}

/// Shared flag used to interrupt an [`InterruptibleSleeper`] from another thread
///
/// Once set the flag stays set, so the owner can still observe the
/// interruption after the assertion has returned. Call [`clear`](Self::clear)
/// to reuse the handle.
#[derive(Debug, Clone, Default)]
pub struct InterruptHandle {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl InterruptHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the flag and wake any sleeper waiting on it
    pub fn interrupt(&self) {
        let (flag, wakeup) = &*self.inner;
        *flag.lock().unwrap_or_else(PoisonError::into_inner) = true;
        wakeup.notify_all();
    }

    pub fn is_interrupted(&self) -> bool {
        *self.inner.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn clear(&self) {
        *self.inner.0.lock().unwrap_or_else(PoisonError::into_inner) = false;
    }
}

/// A sleeper that returns early with [`Interrupted`] when its handle fires
#[derive(Debug, Clone, Default)]
pub struct InterruptibleSleeper {
    handle: InterruptHandle,
}

impl InterruptibleSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sleeper bound to an existing handle
    pub fn with_handle(handle: InterruptHandle) -> Self {
        Self { handle }
    }

    pub fn handle(&self) -> InterruptHandle {
        self.handle.clone()
    }
}

impl Sleeper for InterruptibleSleeper {
    fn sleep(&self, duration: Duration) -> Result<(), Interrupted> {
        let (flag, wakeup) = &*self.handle.inner;
        let guard = flag.lock().unwrap_or_else(PoisonError::into_inner);
        let (guard, _) = wakeup
            .wait_timeout_while(guard, duration, |interrupted| !*interrupted)
            .unwrap_or_else(PoisonError::into_inner);

        if *guard {
            Err(Interrupted)
        } else {
            Ok(())
        }
    }
}

/// `instant + duration`, clamped to the latest instant the platform can represent
pub fn saturating_add(instant: Instant, duration: Duration) -> Instant {
    let mut reached = instant;
    let mut remaining = duration;
    let mut step = duration;

    while !step.is_zero() {
        if step <= remaining {
            if let Some(next) = reached.checked_add(step) {
                reached = next;
                remaining -= step;
                continue;
            }
        }
        step /= 2;
    }

    reached
}

impl<T: Clock + ?Sized> Clock for Arc<T> {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

impl<T: Sleeper + ?Sized> Sleeper for Arc<T> {
    fn sleep(&self, duration: Duration) -> Result<(), Interrupted> {
        (**self).sleep(duration)
    }
}
