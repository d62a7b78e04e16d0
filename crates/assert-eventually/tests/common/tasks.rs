//! Tasks driven by a shared virtual timeline
//!
//! Each builder captures a clone of the [`VirtualTime`] the assertion sleeps
//! on, so the task changes behavior once enough virtual time has passed.

use std::error::Error;
use std::time::Duration;

use assert_eventually::task::{TaskFailure, TaskResult};
use assert_eventually::testing::VirtualTime;

/// Fails an assertion until `after` has elapsed, then succeeds
pub fn succeeds_after(time: &VirtualTime, after: Duration) -> impl FnMut() -> TaskResult {
    let time = time.clone();
    move || {
        if time.elapsed() < after {
            return Err(TaskFailure::assertion("not ready yet"));
        }
        Ok(())
    }
}

/// Raises `make()` until `after` has elapsed, then succeeds
pub fn errors_until_success<E, F>(
    time: &VirtualTime,
    after: Duration,
    mut make: F,
) -> impl FnMut() -> TaskResult
where
    E: Error + Send + Sync + 'static,
    F: FnMut() -> E,
{
    let time = time.clone();
    move || {
        if time.elapsed() < after {
            return Err(make().into());
        }
        Ok(())
    }
}

/// Succeeds until `after` has elapsed, then raises `make()` on every run
pub fn fails_after<E, F>(
    time: &VirtualTime,
    after: Duration,
    mut make: F,
) -> impl FnMut() -> TaskResult
where
    E: Error + Send + Sync + 'static,
    F: FnMut() -> E,
{
    let time = time.clone();
    move || {
        if time.elapsed() >= after {
            return Err(make().into());
        }
        Ok(())
    }
}

/// Seconds as a `Duration`, to keep scenarios readable
pub fn secs(seconds: u64) -> Duration {
    Duration::from_secs(seconds)
}
